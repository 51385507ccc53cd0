// src/handlers/tenants.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        tenancy::{CurrentActor, CurrentContext},
    },
    models::tenancy::{CreateTenantPayload, SwitchTenantPayload, Tenant},
};

#[utoipa::path(
    post,
    path = "/api/tenants",
    request_body = CreateTenantPayload,
    responses((status = 201, body = Tenant)),
    tag = "tenancy",
    security(("bearer_auth" = []))
)]
pub async fn create_tenant(
    State(app_state): State<AppState>,
    // Precisamos do usuário autenticado para o tornarmos admin da loja nova
    user: AuthenticatedUser,
    Json(payload): Json<CreateTenantPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let new_tenant = app_state
        .tenant_service
        .create_tenant_with_owner(&payload, user.0.id)
        .await?;

    Ok((StatusCode::CREATED, Json(new_tenant)))
}

#[utoipa::path(
    get,
    path = "/api/tenants",
    responses((status = 200, body = [crate::models::tenancy::TenantSummary])),
    tag = "tenancy",
    security(("bearer_auth" = []))
)]
pub async fn list_my_tenants(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let tenants = app_state.tenant_service.list_user_tenants(user.0.id).await?;
    Ok(Json(tenants))
}

#[utoipa::path(
    get,
    path = "/api/tenants/all",
    responses((status = 200, body = [Tenant])),
    tag = "tenancy",
    security(("bearer_auth" = []))
)]
pub async fn list_all_tenants(
    State(app_state): State<AppState>,
    actor: CurrentActor,
) -> Result<impl IntoResponse, AppError> {
    // A lista global é a válvula de escape sem escopo: só super-admin
    if !actor.0.can_access_all_tenants() {
        return Err(AppError::AccessDenied(
            "Apenas super-admins podem listar todos os estabelecimentos.".into(),
        ));
    }

    let tenants = app_state.tenant_service.list_all_tenants().await?;
    Ok(Json(tenants))
}

#[utoipa::path(
    post,
    path = "/api/tenants/switch",
    request_body = SwitchTenantPayload,
    responses((status = 200, body = Tenant), (status = 403)),
    tag = "tenancy",
    security(("bearer_auth" = []))
)]
pub async fn switch_tenant(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    CurrentContext(mut ctx): CurrentContext,
    Json(payload): Json<SwitchTenantPayload>,
) -> Result<impl IntoResponse, AppError> {
    let switched = app_state
        .tenancy
        .switch_tenant(&mut ctx, user.0.id, payload.tenant_id)
        .await?;

    if !switched {
        return Err(AppError::AccessDenied(
            "Você não tem acesso a esse estabelecimento.".into(),
        ));
    }

    // O contexto acabou de ser ativado; devolve o tenant efetivo
    let tenant = ctx.current().cloned().ok_or(AppError::NoTenantContext)?;
    Ok(Json(tenant))
}

#[utoipa::path(
    post,
    path = "/api/tenants/assume",
    request_body = SwitchTenantPayload,
    responses((status = 200, body = Tenant), (status = 403)),
    tag = "tenancy",
    security(("bearer_auth" = []))
)]
pub async fn assume_tenant(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    CurrentContext(mut ctx): CurrentContext,
    Json(payload): Json<SwitchTenantPayload>,
) -> Result<impl IntoResponse, AppError> {
    let assumed = app_state
        .tenancy
        .assume_tenant(&mut ctx, user.0.id, payload.tenant_id)
        .await?;

    if !assumed {
        return Err(AppError::AccessDenied(
            "Apenas super-admins podem assumir um estabelecimento sem vínculo.".into(),
        ));
    }

    let tenant = ctx.current().cloned().ok_or(AppError::NoTenantContext)?;
    Ok(Json(tenant))
}

#[utoipa::path(
    delete,
    path = "/api/tenants/current",
    responses((status = 204)),
    tag = "tenancy",
    security(("bearer_auth" = []))
)]
pub async fn clear_tenant(
    State(app_state): State<AppState>,
    CurrentContext(mut ctx): CurrentContext,
) -> Result<impl IntoResponse, AppError> {
    app_state.tenancy.clear(&mut ctx).await;
    Ok(StatusCode::NO_CONTENT)
}

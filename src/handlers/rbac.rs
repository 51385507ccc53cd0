// src/handlers/rbac.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        rbac::{PermManageRole, PermViewRole, RequirePermission},
        tenancy::ActiveTenant,
    },
    models::rbac::{CreateRolePayload, RoleResponse},
};

#[utoipa::path(
    post,
    path = "/api/roles",
    request_body = CreateRolePayload,
    responses((status = 201, body = RoleResponse)),
    tag = "rbac",
    security(("bearer_auth" = []))
)]
pub async fn create_role(
    _perm: RequirePermission<PermManageRole>,
    State(app_state): State<AppState>,
    tenant: ActiveTenant,
    Json(payload): Json<CreateRolePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    // O cargo nasce na partição do tenant ativo (explícita, nunca ambiente)
    let role = app_state
        .rbac_service
        .create_role_with_permissions(Some(tenant.0.id), &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(role)))
}

#[utoipa::path(
    get,
    path = "/api/roles",
    responses((status = 200, body = [crate::models::rbac::Role])),
    tag = "rbac",
    security(("bearer_auth" = []))
)]
pub async fn list_roles(
    _perm: RequirePermission<PermViewRole>,
    State(app_state): State<AppState>,
    tenant: ActiveTenant,
) -> Result<impl IntoResponse, AppError> {
    let roles = app_state.rbac_service.list_roles(Some(tenant.0.id)).await?;
    Ok(Json(roles))
}

#[utoipa::path(
    get,
    path = "/api/permissions",
    responses((status = 200, body = [crate::models::rbac::Permission])),
    tag = "rbac",
    security(("bearer_auth" = []))
)]
pub async fn list_permissions(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    // O catálogo é global (o frontend monta a tela de cargos com ele)
    let permissions = app_state.rbac_service.list_system_permissions().await?;
    Ok(Json(permissions))
}

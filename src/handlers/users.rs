// src/handlers/users.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermManageUser, PermViewUser, RequirePermission},
        tenancy::{ActiveTenant, CurrentActor},
    },
    services::user_service::UserWithRoles,
};

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
    // Cargos atribuídos na partição do tenant ativo
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    pub password: Option<String>,
    // Se presente, substitui os cargos (na partição do próprio usuário)
    pub roles: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct UserListQuery {
    pub search: Option<String>,
    pub role: Option<String>,
}

// ---
// Handlers
// ---

#[utoipa::path(
    get,
    path = "/api/users",
    params(UserListQuery),
    responses((status = 200, body = [UserWithRoles])),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    _perm: RequirePermission<PermViewUser>,
    State(app_state): State<AppState>,
    actor: CurrentActor,
    Query(query): Query<UserListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let users = app_state
        .user_service
        .list_users(&actor.0, query.search.as_deref(), query.role.as_deref())
        .await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    responses((status = 200, body = UserWithRoles)),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    _perm: RequirePermission<PermViewUser>,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.user_service.get_user(id).await?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserPayload,
    responses((status = 201, body = UserWithRoles)),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn create_user(
    _perm: RequirePermission<PermManageUser>,
    State(app_state): State<AppState>,
    tenant: ActiveTenant,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = app_state
        .user_service
        .create_user(
            tenant.0.id,
            &payload.name,
            &payload.email,
            &payload.password,
            &payload.roles,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    request_body = UpdateUserPayload,
    responses((status = 200, body = UserWithRoles)),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    _perm: RequirePermission<PermManageUser>,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = app_state
        .user_service
        .update_user(
            id,
            &payload.name,
            &payload.email,
            payload.password.as_deref(),
            payload.roles.as_deref(),
        )
        .await?;

    Ok(Json(user))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    responses((status = 204), (status = 409)),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    _perm: RequirePermission<PermManageUser>,
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.user_service.delete_user(user.0.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// src/handlers/outlets.rs

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
        rbac::{PermManageOutlet, PermViewOutlet, RequirePermission},
        tenancy::Scoped,
    },
    models::outlet::{CreateOutletPayload, CreateRegisterPayload, Outlet, Register, UpdateOutletPayload},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRegisterPayload {
    #[validate(length(min = 1, message = "O nome da caixa é obrigatório."))]
    pub name: String,
    pub printer_profile_id: Option<Uuid>,
    pub settings: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RegisterListQuery {
    pub outlet_id: Option<Uuid>,
}

// ---
// Outlets
// ---

#[utoipa::path(
    post,
    path = "/api/outlets",
    request_body = CreateOutletPayload,
    responses((status = 201, body = Outlet)),
    tag = "outlets",
    security(("bearer_auth" = []))
)]
pub async fn create_outlet(
    _perm: RequirePermission<PermManageOutlet>,
    State(app_state): State<AppState>,
    Scoped(scope): Scoped,
    Json(payload): Json<CreateOutletPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let outlet = app_state.outlet_service.create_outlet(&scope, &payload).await?;
    Ok((StatusCode::CREATED, Json(outlet)))
}

#[utoipa::path(
    get,
    path = "/api/outlets",
    responses((status = 200, body = [Outlet])),
    tag = "outlets",
    security(("bearer_auth" = []))
)]
pub async fn list_outlets(
    _perm: RequirePermission<PermViewOutlet>,
    State(app_state): State<AppState>,
    Scoped(scope): Scoped,
) -> Result<impl IntoResponse, AppError> {
    let outlets = app_state.outlet_service.list_outlets(&scope).await?;
    Ok(Json(outlets))
}

#[utoipa::path(
    get,
    path = "/api/outlets/{id}",
    responses((status = 200, body = Outlet), (status = 404)),
    tag = "outlets",
    security(("bearer_auth" = []))
)]
pub async fn get_outlet(
    _perm: RequirePermission<PermViewOutlet>,
    State(app_state): State<AppState>,
    Scoped(scope): Scoped,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let outlet = app_state.outlet_service.get_outlet(&scope, id).await?;
    Ok(Json(outlet))
}

#[utoipa::path(
    put,
    path = "/api/outlets/{id}",
    request_body = UpdateOutletPayload,
    responses((status = 200, body = Outlet)),
    tag = "outlets",
    security(("bearer_auth" = []))
)]
pub async fn update_outlet(
    _perm: RequirePermission<PermManageOutlet>,
    State(app_state): State<AppState>,
    Scoped(scope): Scoped,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOutletPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let outlet = app_state
        .outlet_service
        .update_outlet(&scope, id, &payload)
        .await?;
    Ok(Json(outlet))
}

#[utoipa::path(
    delete,
    path = "/api/outlets/{id}",
    responses((status = 204), (status = 409)),
    tag = "outlets",
    security(("bearer_auth" = []))
)]
pub async fn delete_outlet(
    _perm: RequirePermission<PermManageOutlet>,
    State(app_state): State<AppState>,
    Scoped(scope): Scoped,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.outlet_service.delete_outlet(&scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Registers
// ---

#[utoipa::path(
    post,
    path = "/api/registers",
    request_body = CreateRegisterPayload,
    responses((status = 201, body = Register)),
    tag = "outlets",
    security(("bearer_auth" = []))
)]
pub async fn create_register(
    _perm: RequirePermission<PermManageOutlet>,
    State(app_state): State<AppState>,
    Scoped(scope): Scoped,
    Json(payload): Json<CreateRegisterPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let register = app_state
        .outlet_service
        .create_register(&scope, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(register)))
}

#[utoipa::path(
    get,
    path = "/api/registers",
    params(RegisterListQuery),
    responses((status = 200, body = [Register])),
    tag = "outlets",
    security(("bearer_auth" = []))
)]
pub async fn list_registers(
    _perm: RequirePermission<PermViewOutlet>,
    State(app_state): State<AppState>,
    Scoped(scope): Scoped,
    Query(query): Query<RegisterListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let registers = app_state
        .outlet_service
        .list_registers(&scope, query.outlet_id)
        .await?;
    Ok(Json(registers))
}

#[utoipa::path(
    put,
    path = "/api/registers/{id}",
    request_body = UpdateRegisterPayload,
    responses((status = 200, body = Register)),
    tag = "outlets",
    security(("bearer_auth" = []))
)]
pub async fn update_register(
    _perm: RequirePermission<PermManageOutlet>,
    State(app_state): State<AppState>,
    Scoped(scope): Scoped,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRegisterPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let register = app_state
        .outlet_service
        .update_register(
            &scope,
            id,
            &payload.name,
            payload.printer_profile_id,
            payload.settings.as_ref(),
        )
        .await?;
    Ok(Json(register))
}

#[utoipa::path(
    delete,
    path = "/api/registers/{id}",
    responses((status = 204)),
    tag = "outlets",
    security(("bearer_auth" = []))
)]
pub async fn delete_register(
    _perm: RequirePermission<PermManageOutlet>,
    State(app_state): State<AppState>,
    Scoped(scope): Scoped,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.outlet_service.delete_register(&scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

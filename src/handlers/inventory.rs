// src/handlers/inventory.rs

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        rbac::{PermAdjustStock, PermViewInventory, RequirePermission},
        tenancy::{CurrentActor, Scoped},
    },
    models::inventory::{AdjustStockPayload, Inventory, SetSafetyStockPayload},
};

#[utoipa::path(
    post,
    path = "/api/inventory/adjust",
    request_body = AdjustStockPayload,
    responses((status = 200, body = Inventory), (status = 403)),
    tag = "inventory",
    security(("bearer_auth" = []))
)]
pub async fn adjust_stock(
    State(app_state): State<AppState>,
    Scoped(scope): Scoped,
    actor: CurrentActor,
    Json(payload): Json<AdjustStockPayload>,
) -> Result<impl IntoResponse, AppError> {
    // A permissão crua E os limites por cargo são avaliados pelo gate
    // adjust-stock dentro do serviço: a negação volta com a razão
    let level = app_state
        .inventory_service
        .adjust_stock(&scope, &actor.0, &payload)
        .await?;
    Ok(Json(level))
}

#[utoipa::path(
    put,
    path = "/api/inventory/safety-stock",
    request_body = SetSafetyStockPayload,
    responses((status = 200, body = Inventory)),
    tag = "inventory",
    security(("bearer_auth" = []))
)]
pub async fn set_safety_stock(
    _perm: RequirePermission<PermAdjustStock>,
    State(app_state): State<AppState>,
    Scoped(scope): Scoped,
    Json(payload): Json<SetSafetyStockPayload>,
) -> Result<impl IntoResponse, AppError> {
    let level = app_state
        .inventory_service
        .set_safety_stock(&scope, &payload)
        .await?;
    Ok(Json(level))
}

#[utoipa::path(
    get,
    path = "/api/inventory/outlet/{outlet_id}",
    responses((status = 200, body = [Inventory])),
    tag = "inventory",
    security(("bearer_auth" = []))
)]
pub async fn list_for_outlet(
    _perm: RequirePermission<PermViewInventory>,
    State(app_state): State<AppState>,
    Scoped(scope): Scoped,
    Path(outlet_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let levels = app_state
        .inventory_service
        .list_for_outlet(&scope, outlet_id)
        .await?;
    Ok(Json(levels))
}

#[utoipa::path(
    get,
    path = "/api/inventory/low-stock",
    responses((status = 200, body = [Inventory])),
    tag = "inventory",
    security(("bearer_auth" = []))
)]
pub async fn list_low_stock(
    _perm: RequirePermission<PermViewInventory>,
    State(app_state): State<AppState>,
    Scoped(scope): Scoped,
) -> Result<impl IntoResponse, AppError> {
    let levels = app_state.inventory_service.list_low_stock(&scope).await?;
    Ok(Json(levels))
}

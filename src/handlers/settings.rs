// src/handlers/settings.rs

use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{PermManageSettings, PermViewSettings, RequirePermission},
    policy::PosConfig,
};

// GET /api/settings/pos
#[utoipa::path(
    get,
    path = "/api/settings/pos",
    responses((status = 200, body = PosConfig)),
    tag = "settings",
    security(("bearer_auth" = []))
)]
pub async fn get_pos_config(
    _perm: RequirePermission<PermViewSettings>,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.policy.snapshot()))
}

// PUT /api/settings/pos: substitui a configuração em runtime. Os gates
// releem a cada avaliação, então o efeito é imediato na próxima checagem.
#[utoipa::path(
    put,
    path = "/api/settings/pos",
    request_body = PosConfig,
    responses((status = 200, body = PosConfig)),
    tag = "settings",
    security(("bearer_auth" = []))
)]
pub async fn update_pos_config(
    _perm: RequirePermission<PermManageSettings>,
    State(app_state): State<AppState>,
    Json(payload): Json<PosConfig>,
) -> Result<impl IntoResponse, AppError> {
    app_state.policy.replace(payload);
    Ok(Json(app_state.policy.snapshot()))
}

// POST /api/settings/pos/reload: relê as variáveis POS_* do ambiente
#[utoipa::path(
    post,
    path = "/api/settings/pos/reload",
    responses((status = 200, body = PosConfig)),
    tag = "settings",
    security(("bearer_auth" = []))
)]
pub async fn reload_pos_config(
    _perm: RequirePermission<PermManageSettings>,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    app_state.policy.replace(PosConfig::from_env());
    Ok(Json(app_state.policy.snapshot()))
}

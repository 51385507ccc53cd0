// src/handlers/policy.rs
//
// A superfície dos gates nomeados: o cliente POS pergunta "posso fazer X
// com esses parâmetros?" antes de tentar a operação. A resposta é sempre
// 200 com allowed + razão: negação de regra de negócio não é erro HTTP.

use axum::{extract::State, response::IntoResponse, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::tenancy::CurrentActor,
    policy::GateResult,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolicyCheckPayload {
    // Nome do gate, ex: "create-return"
    #[schema(example = "create-return")]
    pub gate: String,
    pub amount: Option<Decimal>,
    pub quantity: Option<i64>,
    pub percentage: Option<Decimal>,
    pub variance: Option<Decimal>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDecision {
    pub allowed: bool,
    pub reason: Option<String>,
}

impl From<GateResult> for PolicyDecision {
    fn from(result: GateResult) -> Self {
        let allowed = result.allowed();
        let reason = result.reason().map(|r| r.to_string());
        PolicyDecision { allowed, reason }
    }
}

#[utoipa::path(
    post,
    path = "/api/policy/check",
    request_body = PolicyCheckPayload,
    responses((status = 200, body = PolicyDecision), (status = 404)),
    tag = "policy",
    security(("bearer_auth" = []))
)]
pub async fn check_gate(
    State(app_state): State<AppState>,
    actor: CurrentActor,
    Json(payload): Json<PolicyCheckPayload>,
) -> Result<impl IntoResponse, AppError> {
    let engine = &app_state.policy;
    let actor = &actor.0;

    let amount = payload.amount.unwrap_or(Decimal::ZERO);
    let quantity = payload.quantity.unwrap_or(0);
    let percentage = payload.percentage.unwrap_or(Decimal::ZERO);
    let variance = payload.variance.unwrap_or(Decimal::ZERO);

    let result = match payload.gate.as_str() {
        "create-return" => engine.create_return(actor, amount),
        "adjust-stock" => engine.adjust_stock(actor, quantity),
        "approve-discount" => engine.approve_discount(actor, percentage),
        "void-sale" => engine.void_sale(actor),
        "requires-active-shift" => engine.requires_active_shift(actor),
        "business-hours-only" => engine.business_hours_only(actor),
        "supervisor-approval" => engine.supervisor_approval(actor, amount),
        "allow-negative-stock" => engine.allow_negative_stock(actor),
        "accept-cash-variance" => engine.accept_cash_variance(actor, variance),
        "requires-opening-float" => engine.requires_opening_float(actor),
        "can-process-sale" => engine.can_process_sale(actor, amount),
        _ => return Err(AppError::NotFound("Gate")),
    };

    Ok(Json(PolicyDecision::from(result)))
}

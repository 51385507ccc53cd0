// src/models/outlet.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// 1. Outlet (A "Loja")
// ---
// O local físico ou lógico de venda. Pertence a exatamente um tenant;
// o código é único dentro do tenant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Outlet {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    #[schema(example = "OUT-01")]
    pub code: String,

    #[schema(example = "Loja Centro")]
    pub name: String,

    pub address: Option<String>,

    // Armazenado como texto; o enum `OutletMode` fecha o conjunto na borda
    #[schema(example = "pos")]
    pub mode: String,

    pub settings: Option<serde_json::Value>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Outlet {
    pub fn mode(&self) -> Option<OutletMode> {
        OutletMode::from_str(&self.mode).ok()
    }
}

// Modo de operação da loja (conjunto fechado)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutletMode {
    Pos,
    Restaurant,
    Minimarket,
}

impl OutletMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutletMode::Pos => "pos",
            OutletMode::Restaurant => "restaurant",
            OutletMode::Minimarket => "minimarket",
        }
    }
}

impl FromStr for OutletMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pos" => Ok(OutletMode::Pos),
            "restaurant" => Ok(OutletMode::Restaurant),
            "minimarket" => Ok(OutletMode::Minimarket),
            _ => Err(()),
        }
    }
}

// ---
// 2. Register (A "Caixa Registadora")
// ---
// Pertence a exatamente uma loja (e transitivamente a um tenant).
// NÃO carrega tenant_id próprio: o escopo vem da loja.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Register {
    pub id: Uuid,
    pub outlet_id: Uuid,

    #[schema(example = "Caixa 1")]
    pub name: String,

    pub printer_profile_id: Option<Uuid>,
    pub settings: Option<serde_json::Value>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 3. Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOutletPayload {
    #[validate(length(min = 1, message = "O código da loja é obrigatório."))]
    pub code: String,
    #[validate(length(min = 1, message = "O nome da loja é obrigatório."))]
    pub name: String,
    pub address: Option<String>,
    pub mode: OutletMode,
    pub settings: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutletPayload {
    #[validate(length(min = 1, message = "O nome da loja é obrigatório."))]
    pub name: String,
    pub address: Option<String>,
    pub mode: OutletMode,
    pub settings: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegisterPayload {
    pub outlet_id: Uuid,
    #[validate(length(min = 1, message = "O nome da caixa é obrigatório."))]
    pub name: String,
    pub printer_profile_id: Option<Uuid>,
    pub settings: Option<serde_json::Value>,
}

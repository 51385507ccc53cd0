// src/models/tenancy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// 1. Tenant (O "Estabelecimento")
// ---
// A conta principal. Tudo que é dado de negócio pertence a exatamente um tenant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,

    #[schema(example = "TOKO-01")]
    pub code: String,

    #[schema(example = "Toko Berkah Jaya")]
    pub name: String,

    #[schema(example = "Asia/Jakarta")]
    pub timezone: String,

    // Mapa livre de configurações por tenant (estoque negativo,
    // arredondamento de caixa, preço com imposto incluso, alíquota padrão)
    pub settings: Option<serde_json::Value>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 2. TenantMembership (A "Ponte" Usuário-Tenant)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantMembership {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    // Recomenda-se exatamente um default por usuário; não é imposto como
    // constraint rígida
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Tenant + flag de default, como devolvido ao listar "meus estabelecimentos"
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantSummary {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub timezone: String,
    pub is_default: bool,
}

// ---
// 3. Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantPayload {
    #[validate(length(min = 1, message = "O código do estabelecimento é obrigatório."))]
    pub code: String,
    #[validate(length(min = 1, message = "O nome do estabelecimento é obrigatório."))]
    pub name: String,
    #[schema(example = "Asia/Jakarta")]
    pub timezone: Option<String>,
    pub settings: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwitchTenantPayload {
    pub tenant_id: Uuid,
}

// src/models/inventory.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Nível de estoque por (tenant, variação, loja): tripla única.
// Carrega tenant_id próprio (escopo independente do produto/variação),
// que DEVE concordar com o tenant implicado pela loja e pelo produto.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    pub variant_id: Uuid,
    pub outlet_id: Uuid,

    pub on_hand: i32,
    pub safety_stock: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Inventory {
    /// Estoque baixo: em cima ou abaixo do estoque de segurança.
    pub fn is_low_stock(&self) -> bool {
        self.on_hand <= self.safety_stock
    }

    /// Há saldo suficiente para a quantidade pedida?
    pub fn is_available(&self, quantity: i32) -> bool {
        self.on_hand >= quantity
    }
}

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdjustStockPayload {
    pub variant_id: Uuid,
    pub outlet_id: Uuid,
    // Quantidade com sinal: positiva entra, negativa sai
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetSafetyStockPayload {
    pub variant_id: Uuid,
    pub outlet_id: Uuid,
    pub safety_stock: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn level(on_hand: i32, safety_stock: i32) -> Inventory {
        Inventory {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            variant_id: Uuid::new_v4(),
            outlet_id: Uuid::new_v4(),
            on_hand,
            safety_stock,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn low_stock_is_at_or_below_safety_stock() {
        assert!(level(5, 5).is_low_stock());
        assert!(level(3, 5).is_low_stock());
        assert!(!level(6, 5).is_low_stock());
    }

    #[test]
    fn availability_compares_against_on_hand() {
        let l = level(4, 0);
        assert!(l.is_available(4));
        assert!(!l.is_available(5));
    }
}

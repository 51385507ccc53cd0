// src/services/inventory_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{scope::QueryScope, CatalogRepository, InventoryRepository, OutletRepository},
    models::inventory::{AdjustStockPayload, Inventory, SetSafetyStockPayload},
    policy::{Actor, PolicyEngine},
};

#[derive(Clone)]
pub struct InventoryService {
    inventory_repo: InventoryRepository,
    outlet_repo: OutletRepository,
    catalog_repo: CatalogRepository,
    policy: PolicyEngine,
    pool: PgPool,
}

impl InventoryService {
    pub fn new(
        inventory_repo: InventoryRepository,
        outlet_repo: OutletRepository,
        catalog_repo: CatalogRepository,
        policy: PolicyEngine,
        pool: PgPool,
    ) -> Self {
        Self {
            inventory_repo,
            outlet_repo,
            catalog_repo,
            policy,
            pool,
        }
    }

    /// Ajuste de estoque com sinal, guardado pelos gates adjust-stock e
    /// allow-negative-stock. Loja e variação são resolvidas pelo escopo
    /// antes de gravar: a linha de estoque nasce obrigatoriamente no mesmo
    /// tenant que elas.
    pub async fn adjust_stock(
        &self,
        scope: &QueryScope,
        actor: &Actor,
        payload: &AdjustStockPayload,
    ) -> Result<Inventory, AppError> {
        // 1. Gate de negócio (permissão + limite por cargo)
        let gate = self.policy.adjust_stock(actor, payload.quantity as i64);
        if let Some(reason) = gate.reason() {
            return Err(AppError::AccessDenied(reason.to_string()));
        }

        // 2. Loja e variação precisam ser visíveis no escopo ativo
        let outlet = self
            .outlet_repo
            .find_outlet(scope, payload.outlet_id)
            .await?
            .ok_or(AppError::NotFound("Loja"))?;
        let variant = self
            .catalog_repo
            .find_variant_scoped(scope, payload.variant_id)
            .await?
            .ok_or(AppError::NotFound("Variação"))?;

        // 3. Saldo negativo só com o flag de configuração ligado
        let current = self
            .inventory_repo
            .find_level(scope, variant.id, outlet.id)
            .await?
            .map(|level| level.on_hand)
            .unwrap_or(0);
        if current + payload.quantity < 0 {
            let gate = self.policy.allow_negative_stock(actor);
            if let Some(reason) = gate.reason() {
                return Err(AppError::AccessDenied(reason.to_string()));
            }
        }

        // 4. Grava: o tenant vem da loja resolvida, nunca do payload
        let mut tx = self.pool.begin().await?;
        let level = self
            .inventory_repo
            .adjust(
                &mut *tx,
                outlet.tenant_id,
                variant.id,
                outlet.id,
                payload.quantity,
            )
            .await?;
        tx.commit().await?;
        Ok(level)
    }

    pub async fn set_safety_stock(
        &self,
        scope: &QueryScope,
        payload: &SetSafetyStockPayload,
    ) -> Result<Inventory, AppError> {
        let outlet = self
            .outlet_repo
            .find_outlet(scope, payload.outlet_id)
            .await?
            .ok_or(AppError::NotFound("Loja"))?;
        let variant = self
            .catalog_repo
            .find_variant_scoped(scope, payload.variant_id)
            .await?
            .ok_or(AppError::NotFound("Variação"))?;

        let mut tx = self.pool.begin().await?;
        let level = self
            .inventory_repo
            .set_safety_stock(
                &mut *tx,
                outlet.tenant_id,
                variant.id,
                outlet.id,
                payload.safety_stock,
            )
            .await?;
        tx.commit().await?;
        Ok(level)
    }

    pub async fn list_for_outlet(
        &self,
        scope: &QueryScope,
        outlet_id: Uuid,
    ) -> Result<Vec<Inventory>, AppError> {
        // Valida a loja pelo escopo; a listagem em si também é filtrada
        self.outlet_repo
            .find_outlet(scope, outlet_id)
            .await?
            .ok_or(AppError::NotFound("Loja"))?;
        self.inventory_repo.list_for_outlet(scope, outlet_id).await
    }

    pub async fn list_low_stock(&self, scope: &QueryScope) -> Result<Vec<Inventory>, AppError> {
        self.inventory_repo.list_low_stock(scope).await
    }
}

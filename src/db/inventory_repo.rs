// src/db/inventory_repo.rs
//
// Níveis de estoque por (tenant, variação, loja). O serviço valida ANTES,
// via consultas escopadas, que loja e variação pertencem ao tenant que vai
// ser gravado aqui: o tenant da linha de estoque tem de concordar com o
// implicado por elas.

use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::db::scope::QueryScope;
use crate::models::inventory::Inventory;

#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Soma `delta` ao saldo, criando a linha se ainda não existe
    /// (UPSERT na tripla única).
    pub async fn adjust<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        variant_id: Uuid,
        outlet_id: Uuid,
        delta: i32,
    ) -> Result<Inventory, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let level = sqlx::query_as::<_, Inventory>(
            r#"
            INSERT INTO inventory (tenant_id, variant_id, outlet_id, on_hand, safety_stock)
            VALUES ($1, $2, $3, $4, 0)
            ON CONFLICT (tenant_id, variant_id, outlet_id)
            DO UPDATE SET on_hand = inventory.on_hand + EXCLUDED.on_hand, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(variant_id)
        .bind(outlet_id)
        .bind(delta)
        .fetch_one(executor)
        .await?;
        Ok(level)
    }

    pub async fn set_safety_stock<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        variant_id: Uuid,
        outlet_id: Uuid,
        safety_stock: i32,
    ) -> Result<Inventory, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let level = sqlx::query_as::<_, Inventory>(
            r#"
            INSERT INTO inventory (tenant_id, variant_id, outlet_id, on_hand, safety_stock)
            VALUES ($1, $2, $3, 0, $4)
            ON CONFLICT (tenant_id, variant_id, outlet_id)
            DO UPDATE SET safety_stock = EXCLUDED.safety_stock, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(variant_id)
        .bind(outlet_id)
        .bind(safety_stock)
        .fetch_one(executor)
        .await?;
        Ok(level)
    }

    pub async fn find_level(
        &self,
        scope: &QueryScope,
        variant_id: Uuid,
        outlet_id: Uuid,
    ) -> Result<Option<Inventory>, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT * FROM inventory WHERE inventory.variant_id = ");
        qb.push_bind(variant_id);
        qb.push(" AND inventory.outlet_id = ");
        qb.push_bind(outlet_id);
        scope.filter_and::<Inventory>(&mut qb);

        let level = qb
            .build_query_as::<Inventory>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(level)
    }

    pub async fn list_for_outlet(
        &self,
        scope: &QueryScope,
        outlet_id: Uuid,
    ) -> Result<Vec<Inventory>, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT * FROM inventory WHERE inventory.outlet_id = ");
        qb.push_bind(outlet_id);
        scope.filter_and::<Inventory>(&mut qb);
        qb.push(" ORDER BY inventory.created_at");

        let levels = qb
            .build_query_as::<Inventory>()
            .fetch_all(&self.pool)
            .await?;
        Ok(levels)
    }

    /// Linhas em (ou abaixo do) estoque de segurança.
    pub async fn list_low_stock(&self, scope: &QueryScope) -> Result<Vec<Inventory>, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT * FROM inventory WHERE inventory.on_hand <= inventory.safety_stock");
        scope.filter_and::<Inventory>(&mut qb);
        qb.push(" ORDER BY inventory.on_hand");

        let levels = qb
            .build_query_as::<Inventory>()
            .fetch_all(&self.pool)
            .await?;
        Ok(levels)
    }
}

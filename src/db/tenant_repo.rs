// src/db/tenant_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::tenancy::{Tenant, TenantSummary};

#[derive(Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_tenant<'e, E>(
        &self,
        executor: E,
        code: &str,
        name: &str,
        timezone: &str,
        settings: Option<&serde_json::Value>,
    ) -> Result<Tenant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (code, name, timezone, settings)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(code)
        .bind(name)
        .bind(timezone)
        .bind(settings)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation(
                        "Já existe um estabelecimento com esse código.".into(),
                    );
                }
            }
            e.into()
        })
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Tenant>, AppError> {
        let tenant = sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tenant)
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<Tenant>, AppError> {
        let tenant = sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tenant)
    }

    /// Todos os tenants: caminho exclusivo do super-admin.
    pub async fn list_all(&self) -> Result<Vec<Tenant>, AppError> {
        let tenants = sqlx::query_as::<_, Tenant>("SELECT * FROM tenants ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(tenants)
    }

    /// Os estabelecimentos do usuário, com o flag de default: o default
    /// vem primeiro, depois por ordem de vínculo.
    pub async fn tenants_for_user(&self, user_id: Uuid) -> Result<Vec<TenantSummary>, AppError> {
        let tenants = sqlx::query_as::<_, TenantSummary>(
            r#"
            SELECT t.id, t.code, t.name, t.timezone, ut.is_default
            FROM tenants t
            JOIN user_tenant ut ON ut.tenant_id = t.id
            WHERE ut.user_id = $1
            ORDER BY ut.is_default DESC, ut.created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tenants)
    }

    pub async fn add_member<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        user_id: Uuid,
        is_default: bool,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO user_tenant (user_id, tenant_id, is_default)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, tenant_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(tenant_id)
        .bind(is_default)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn is_member(&self, user_id: Uuid, tenant_id: Uuid) -> Result<bool, AppError> {
        let row: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM user_tenant
                WHERE user_id = $1 AND tenant_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }

    /// O tenant default do usuário (recomenda-se exatamente um; tolera zero
    /// ou vários).
    pub async fn default_tenant(&self, user_id: Uuid) -> Result<Option<Tenant>, AppError> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT t.* FROM tenants t
            JOIN user_tenant ut ON ut.tenant_id = t.id
            WHERE ut.user_id = $1 AND ut.is_default = TRUE
            ORDER BY ut.created_at
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(tenant)
    }

    pub async fn first_tenant(&self, user_id: Uuid) -> Result<Option<Tenant>, AppError> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT t.* FROM tenants t
            JOIN user_tenant ut ON ut.tenant_id = t.id
            WHERE ut.user_id = $1
            ORDER BY ut.created_at
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(tenant)
    }
}

// src/db/outlet_repo.rs
//
// Lojas e caixas. Toda leitura/gravação de Outlet passa pelo QueryScope;
// Register não tem tenant_id próprio e é escopado transitivamente via JOIN
// com a loja dona.

use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::db::scope::QueryScope;
use crate::models::outlet::{Outlet, Register};

#[derive(Clone)]
pub struct OutletRepository {
    pool: PgPool,
}

impl OutletRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Outlets
    // ---

    /// `explicit_tenant` só vem preenchido em fluxos privilegiados; caso
    /// contrário o hook de criação grava o tenant ativo do escopo.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_outlet<'e, E>(
        &self,
        executor: E,
        scope: &QueryScope,
        explicit_tenant: Option<Uuid>,
        code: &str,
        name: &str,
        address: Option<&str>,
        mode: &str,
        settings: Option<&serde_json::Value>,
    ) -> Result<Outlet, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Outlet>(
            r#"
            INSERT INTO outlets (tenant_id, code, name, address, mode, settings)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(scope.stamp(explicit_tenant))
        .bind(code)
        .bind(name)
        .bind(address)
        .bind(mode)
        .bind(settings)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation(
                        "Já existe uma loja com esse código neste estabelecimento.".into(),
                    );
                }
            }
            e.into()
        })
    }

    pub async fn find_outlet(
        &self,
        scope: &QueryScope,
        id: Uuid,
    ) -> Result<Option<Outlet>, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT * FROM outlets WHERE outlets.id = ");
        qb.push_bind(id);
        scope.filter_and::<Outlet>(&mut qb);

        let outlet = qb
            .build_query_as::<Outlet>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(outlet)
    }

    pub async fn list_outlets(&self, scope: &QueryScope) -> Result<Vec<Outlet>, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT * FROM outlets");
        scope.filter_where::<Outlet>(&mut qb);
        qb.push(" ORDER BY outlets.code");

        let outlets = qb.build_query_as::<Outlet>().fetch_all(&self.pool).await?;
        Ok(outlets)
    }

    pub async fn update_outlet(
        &self,
        scope: &QueryScope,
        id: Uuid,
        name: &str,
        address: Option<&str>,
        mode: &str,
        settings: Option<&serde_json::Value>,
    ) -> Result<Option<Outlet>, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE outlets SET name = ");
        qb.push_bind(name);
        qb.push(", address = ");
        qb.push_bind(address);
        qb.push(", mode = ");
        qb.push_bind(mode);
        qb.push(", settings = ");
        qb.push_bind(settings);
        qb.push(", updated_at = NOW() WHERE outlets.id = ");
        qb.push_bind(id);
        scope.filter_and::<Outlet>(&mut qb);
        qb.push(" RETURNING *");

        let outlet = qb
            .build_query_as::<Outlet>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(outlet)
    }

    pub async fn delete_outlet(&self, scope: &QueryScope, id: Uuid) -> Result<u64, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("DELETE FROM outlets WHERE outlets.id = ");
        qb.push_bind(id);
        scope.filter_and::<Outlet>(&mut qb);

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    pub async fn count_registers(&self, outlet_id: Uuid) -> Result<i64, AppError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM registers WHERE outlet_id = $1")
            .bind(outlet_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    // ---
    // Registers (escopo transitivo via loja)
    // ---

    pub async fn create_register<'e, E>(
        &self,
        executor: E,
        outlet_id: Uuid,
        name: &str,
        printer_profile_id: Option<Uuid>,
        settings: Option<&serde_json::Value>,
    ) -> Result<Register, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let register = sqlx::query_as::<_, Register>(
            r#"
            INSERT INTO registers (outlet_id, name, printer_profile_id, settings)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(outlet_id)
        .bind(name)
        .bind(printer_profile_id)
        .bind(settings)
        .fetch_one(executor)
        .await?;
        Ok(register)
    }

    pub async fn find_register(
        &self,
        scope: &QueryScope,
        id: Uuid,
    ) -> Result<Option<Register>, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            r#"SELECT registers.* FROM registers
               JOIN outlets ON outlets.id = registers.outlet_id
               WHERE registers.id = "#,
        );
        qb.push_bind(id);
        scope.filter_and::<Outlet>(&mut qb);

        let register = qb
            .build_query_as::<Register>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(register)
    }

    pub async fn list_registers(
        &self,
        scope: &QueryScope,
        outlet_id: Option<Uuid>,
    ) -> Result<Vec<Register>, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            r#"SELECT registers.* FROM registers
               JOIN outlets ON outlets.id = registers.outlet_id
               WHERE TRUE"#,
        );
        if let Some(outlet_id) = outlet_id {
            qb.push(" AND registers.outlet_id = ");
            qb.push_bind(outlet_id);
        }
        scope.filter_and::<Outlet>(&mut qb);
        qb.push(" ORDER BY registers.name");

        let registers = qb
            .build_query_as::<Register>()
            .fetch_all(&self.pool)
            .await?;
        Ok(registers)
    }

    pub async fn update_register(
        &self,
        scope: &QueryScope,
        id: Uuid,
        name: &str,
        printer_profile_id: Option<Uuid>,
        settings: Option<&serde_json::Value>,
    ) -> Result<Option<Register>, AppError> {
        // UPDATE com subconsulta escopada: só toca a caixa se a loja dona
        // pertencer ao tenant ativo
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE registers SET name = ");
        qb.push_bind(name);
        qb.push(", printer_profile_id = ");
        qb.push_bind(printer_profile_id);
        qb.push(", settings = ");
        qb.push_bind(settings);
        qb.push(", updated_at = NOW() WHERE registers.id = ");
        qb.push_bind(id);
        qb.push(
            r#" AND EXISTS (
                SELECT 1 FROM outlets
                WHERE outlets.id = registers.outlet_id"#,
        );
        scope.filter_and::<Outlet>(&mut qb);
        qb.push(") RETURNING *");

        let register = qb
            .build_query_as::<Register>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(register)
    }

    pub async fn delete_register(&self, scope: &QueryScope, id: Uuid) -> Result<u64, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("DELETE FROM registers WHERE registers.id = ");
        qb.push_bind(id);
        qb.push(
            r#" AND EXISTS (
                SELECT 1 FROM outlets
                WHERE outlets.id = registers.outlet_id"#,
        );
        scope.filter_and::<Outlet>(&mut qb);
        qb.push(")");

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

// src/db/rbac_repo.rs
//
// O grafo cargo/permissão, particionado por tenant. A partição é SEMPRE um
// parâmetro explícito (`Option<Uuid>`; `None` = partição global, onde vive
// apenas o super-admin): nunca um ponteiro ambiente a salvar/restaurar.

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::rbac::{Permission, Role, SUPER_ADMIN_ROLE};

#[derive(Clone)]
pub struct RbacRepository {
    pool: PgPool,
}

impl RbacRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 1. Criar o cargo na partição dada
    pub async fn create_role<'e, E>(
        &self,
        executor: E,
        partition: Option<Uuid>,
        name: &str,
    ) -> Result<Role, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (tenant_id, name)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(partition)
        .bind(name)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation(
                        "Já existe um cargo com esse nome neste estabelecimento.".into(),
                    );
                }
            }
            e.into()
        })
    }

    pub async fn find_role(
        &self,
        partition: Option<Uuid>,
        name: &str,
    ) -> Result<Option<Role>, AppError> {
        let role = sqlx::query_as::<_, Role>(
            "SELECT * FROM roles WHERE tenant_id IS NOT DISTINCT FROM $1 AND name = $2",
        )
        .bind(partition)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(role)
    }

    pub async fn list_roles(&self, partition: Option<Uuid>) -> Result<Vec<Role>, AppError> {
        let roles = sqlx::query_as::<_, Role>(
            "SELECT * FROM roles WHERE tenant_id IS NOT DISTINCT FROM $1 ORDER BY name",
        )
        .bind(partition)
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }

    // 2. Catálogo de permissões
    pub async fn list_all_permissions(&self) -> Result<Vec<Permission>, AppError> {
        let permissions =
            sqlx::query_as::<_, Permission>("SELECT * FROM permissions ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(permissions)
    }

    // Resolve nomes ("create_sale") para linhas da tabela permissions
    pub async fn find_permissions_by_names<'e, E>(
        &self,
        executor: E,
        names: &[String],
    ) -> Result<Vec<Permission>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // O SQLx lida bem com arrays usando ANY
        let permissions =
            sqlx::query_as::<_, Permission>("SELECT * FROM permissions WHERE name = ANY($1)")
                .bind(names)
                .fetch_all(executor)
                .await?;
        Ok(permissions)
    }

    pub async fn ensure_permission<'e, E>(
        &self,
        executor: E,
        name: &str,
        description: Option<&str>,
    ) -> Result<Permission, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let permission = sqlx::query_as::<_, Permission>(
            r#"
            INSERT INTO permissions (name, description)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET description = EXCLUDED.description
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(description)
        .fetch_one(executor)
        .await?;
        Ok(permission)
    }

    // 3. Vincular cargo <-> permissão (inserção em massa via UNNEST)
    pub async fn assign_permissions<'e, E>(
        &self,
        executor: E,
        role_id: Uuid,
        permission_ids: &[Uuid],
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_id, permission_id)
            SELECT $1, unnest($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(role_id)
        .bind(permission_ids)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn role_permission_names(&self, role_id: Uuid) -> Result<Vec<String>, AppError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT p.name FROM permissions p
            JOIN role_permissions rp ON rp.permission_id = p.id
            WHERE rp.role_id = $1
            ORDER BY p.name
            "#,
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    // 4. Vincular usuário <-> cargo
    pub async fn assign_role<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        role_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(role_id)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Remove TODOS os cargos do usuário na partição dada, e somente nela.
    /// Metade da operação de sync; a outra metade re-insere o conjunto novo.
    pub async fn clear_roles_in_partition<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        partition: Option<Uuid>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            DELETE FROM user_roles ur
            USING roles r
            WHERE ur.role_id = r.id
              AND ur.user_id = $1
              AND r.tenant_id IS NOT DISTINCT FROM $2
            "#,
        )
        .bind(user_id)
        .bind(partition)
        .execute(executor)
        .await?;
        Ok(())
    }

    // 5. Consultas do ator
    pub async fn user_role_names(
        &self,
        user_id: Uuid,
        partition: Option<Uuid>,
    ) -> Result<Vec<String>, AppError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT r.name FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
              AND r.tenant_id IS NOT DISTINCT FROM $2
            ORDER BY r.name
            "#,
        )
        .bind(user_id)
        .bind(partition)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    pub async fn user_permission_names(
        &self,
        user_id: Uuid,
        partition: Option<Uuid>,
    ) -> Result<Vec<String>, AppError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT p.name
            FROM permissions p
            JOIN role_permissions rp ON rp.permission_id = p.id
            JOIN roles r ON r.id = rp.role_id
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
              AND r.tenant_id IS NOT DISTINCT FROM $2
            "#,
        )
        .bind(user_id)
        .bind(partition)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    pub async fn user_has_permission(
        &self,
        user_id: Uuid,
        partition: Option<Uuid>,
        permission_name: &str,
    ) -> Result<bool, AppError> {
        let row: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM user_roles ur
                JOIN roles r ON ur.role_id = r.id
                JOIN role_permissions rp ON r.id = rp.role_id
                JOIN permissions p ON rp.permission_id = p.id
                WHERE ur.user_id = $1
                  AND r.tenant_id IS NOT DISTINCT FROM $2
                  AND p.name = $3
            )
            "#,
        )
        .bind(user_id)
        .bind(partition)
        .bind(permission_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }

    /// O cargo global `super-admin` (tenant_id IS NULL): o único fora de
    /// qualquer partição.
    pub async fn is_super_admin(&self, user_id: Uuid) -> Result<bool, AppError> {
        let row: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM user_roles ur
                JOIN roles r ON ur.role_id = r.id
                WHERE ur.user_id = $1
                  AND r.tenant_id IS NULL
                  AND r.name = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(SUPER_ADMIN_ROLE)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }
}

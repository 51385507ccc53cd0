// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::auth::User;

// O repositório de usuários. Usuários são GLOBAIS (o e-mail é único no
// sistema inteiro); a visibilidade por tenant é decidida no serviço, via
// vínculos user_tenant.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // Converte violação de chave única num erro mais amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })
    }

    pub async fn update_user<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: &str,
        email: &str,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, email = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })
    }

    pub async fn update_password<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Usuários visíveis para um tenant: apenas quem tem vínculo com ele.
    /// Filtros opcionais de busca (nome/e-mail) e de cargo na partição.
    pub async fn list_for_tenant(
        &self,
        tenant_id: Uuid,
        search: Option<&str>,
        role: Option<&str>,
    ) -> Result<Vec<User>, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            r#"SELECT users.* FROM users
               JOIN user_tenant ut ON ut.user_id = users.id
               WHERE ut.tenant_id = "#,
        );
        qb.push_bind(tenant_id);
        push_user_filters(&mut qb, search, role, Some(tenant_id));
        qb.push(" ORDER BY users.created_at DESC");

        let users = qb.build_query_as::<User>().fetch_all(&self.pool).await?;
        Ok(users)
    }

    /// Lista global: caminho exclusivo do super-admin.
    pub async fn list_all(
        &self,
        search: Option<&str>,
        role: Option<&str>,
    ) -> Result<Vec<User>, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT users.* FROM users WHERE TRUE");
        push_user_filters(&mut qb, search, role, None);
        qb.push(" ORDER BY users.created_at DESC");

        let users = qb.build_query_as::<User>().fetch_all(&self.pool).await?;
        Ok(users)
    }
}

fn push_user_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    search: Option<&str>,
    role: Option<&str>,
    partition: Option<Uuid>,
) {
    if let Some(search) = search {
        let pattern = format!("%{}%", search);
        qb.push(" AND (users.name ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR users.email ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }

    if let Some(role) = role {
        qb.push(
            r#" AND EXISTS (
                SELECT 1 FROM user_roles ur
                JOIN roles r ON r.id = ur.role_id
                WHERE ur.user_id = users.id AND r.name = "#,
        );
        qb.push_bind(role.to_string());
        qb.push(" AND r.tenant_id IS NOT DISTINCT FROM ");
        qb.push_bind(partition);
        qb.push(")");
    }
}

// src/services/user_service.rs

use bcrypt::hash;
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{TenantRepository, UserRepository},
    models::auth::User,
    policy::Actor,
    services::RbacService,
};

// Usuário + cargos na partição do próprio usuário, como as telas esperam
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserWithRoles {
    #[serde(flatten)]
    pub user: User,
    pub roles: Vec<String>,
}

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    tenant_repo: TenantRepository,
    rbac_service: RbacService,
    pool: PgPool,
}

impl UserService {
    pub fn new(
        user_repo: UserRepository,
        tenant_repo: TenantRepository,
        rbac_service: RbacService,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            tenant_repo,
            rbac_service,
            pool,
        }
    }

    /// A partição "natural" de um usuário: o tenant default dele, ou o
    /// primeiro vínculo. É SEMPRE por ela que os cargos do usuário são
    /// lidos e sincronizados: nunca pela partição de quem está mexendo.
    async fn home_partition(&self, user_id: Uuid) -> Result<Option<Uuid>, AppError> {
        if let Some(tenant) = self.tenant_repo.default_tenant(user_id).await? {
            return Ok(Some(tenant.id));
        }
        Ok(self
            .tenant_repo
            .first_tenant(user_id)
            .await?
            .map(|t| t.id))
    }

    /// Lista os usuários visíveis: super-admin enxerga todos; os demais só
    /// enxergam quem tem vínculo com o tenant ativo.
    pub async fn list_users(
        &self,
        actor: &Actor,
        search: Option<&str>,
        role: Option<&str>,
    ) -> Result<Vec<UserWithRoles>, AppError> {
        let users = if actor.can_access_all_tenants() {
            self.user_repo.list_all(search, role).await?
        } else {
            let tenant_id = actor.partition.ok_or(AppError::NoTenantContext)?;
            self.user_repo
                .list_for_tenant(tenant_id, search, role)
                .await?
        };

        // Carrega os cargos de cada usuário na partição DELE
        let mut result = Vec::with_capacity(users.len());
        for user in users {
            let partition = self.home_partition(user.id).await?;
            let roles = self.rbac_service.roles_for_user(user.id, partition).await?;
            result.push(UserWithRoles { user, roles });
        }
        Ok(result)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<UserWithRoles, AppError> {
        let user = self
            .user_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Usuário"))?;
        let partition = self.home_partition(user.id).await?;
        let roles = self.rbac_service.roles_for_user(user.id, partition).await?;
        Ok(UserWithRoles { user, roles })
    }

    /// Cria um usuário já vinculado ao tenant ativo (como default dele) e
    /// com os cargos pedidos: atribuídos na partição desse tenant.
    pub async fn create_user(
        &self,
        current_tenant: Uuid,
        name: &str,
        email: &str,
        password: &str,
        role_names: &[String],
    ) -> Result<UserWithRoles, AppError> {
        let password_clone = password.to_owned();
        let hashed =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let mut tx = self.pool.begin().await?;
        let user = self
            .user_repo
            .create_user(&mut *tx, name, email, &hashed)
            .await?;
        self.tenant_repo
            .add_member(&mut *tx, current_tenant, user.id, true)
            .await?;
        tx.commit().await?;

        let roles = self
            .rbac_service
            .sync_user_roles(user.id, Some(current_tenant), role_names)
            .await?;

        Ok(UserWithRoles { user, roles })
    }

    /// Atualiza dados básicos e, se pedido, sincroniza os cargos: na
    /// partição do PRÓPRIO usuário-alvo.
    pub async fn update_user(
        &self,
        id: Uuid,
        name: &str,
        email: &str,
        password: Option<&str>,
        role_names: Option<&[String]>,
    ) -> Result<UserWithRoles, AppError> {
        let mut tx = self.pool.begin().await?;
        let user = self.user_repo.update_user(&mut *tx, id, name, email).await?;

        if let Some(password) = password {
            let password_clone = password.to_owned();
            let hashed =
                tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                    .await
                    .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
            self.user_repo
                .update_password(&mut *tx, id, &hashed)
                .await?;
        }
        tx.commit().await?;

        let partition = self.home_partition(id).await?;
        let roles = match role_names {
            Some(names) => {
                self.rbac_service
                    .sync_user_roles(id, partition, names)
                    .await?
            }
            None => self.rbac_service.roles_for_user(id, partition).await?,
        };

        Ok(UserWithRoles { user, roles })
    }

    /// Exclui um usuário. Auto-exclusão é barrada.
    pub async fn delete_user(&self, acting_id: Uuid, target_id: Uuid) -> Result<(), AppError> {
        if acting_id == target_id {
            return Err(AppError::SelfDeletion);
        }
        self.user_repo.delete_user(target_id).await
    }
}

// src/services/tenant_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{RbacRepository, TenantRepository},
    models::rbac::{permissions, roles},
    models::tenancy::{CreateTenantPayload, Tenant, TenantSummary},
};

#[derive(Clone)]
pub struct TenantService {
    tenant_repo: TenantRepository,
    rbac_repo: RbacRepository,
    pool: PgPool, // Usamos a pool para iniciar transações
}

impl TenantService {
    pub fn new(tenant_repo: TenantRepository, rbac_repo: RbacRepository, pool: PgPool) -> Self {
        Self {
            tenant_repo,
            rbac_repo,
            pool,
        }
    }

    /// Cria um novo estabelecimento e, atomicamente: semeia os cargos padrão
    /// (admin/supervisor/cashier) na partição recém-nascida, vincula o
    /// criador como membro e lhe dá o cargo admin.
    pub async fn create_tenant_with_owner(
        &self,
        payload: &CreateTenantPayload,
        owner_id: Uuid,
    ) -> Result<Tenant, AppError> {
        // O primeiro estabelecimento do usuário vira o default dele
        let is_default = self.tenant_repo.default_tenant(owner_id).await?.is_none();

        let timezone = payload.timezone.as_deref().unwrap_or("Asia/Jakarta");

        // 1. Inicia a transação
        let mut tx = self.pool.begin().await?;

        // 2. Cria o estabelecimento
        let new_tenant = self
            .tenant_repo
            .create_tenant(
                &mut *tx,
                &payload.code,
                &payload.name,
                timezone,
                payload.settings.as_ref(),
            )
            .await?;

        let partition = Some(new_tenant.id);

        // 3. Cargos padrão da nova partição
        let admin_role = self
            .rbac_repo
            .create_role(&mut *tx, partition, roles::ADMIN)
            .await?;
        let supervisor_role = self
            .rbac_repo
            .create_role(&mut *tx, partition, roles::SUPERVISOR)
            .await?;
        let cashier_role = self
            .rbac_repo
            .create_role(&mut *tx, partition, roles::CASHIER)
            .await?;

        // 4. Resolve o catálogo e vincula os conjuntos de cada cargo
        let all_names: Vec<String> = permissions::ALL.iter().map(|p| p.to_string()).collect();
        let catalog = self
            .rbac_repo
            .find_permissions_by_names(&mut *tx, &all_names)
            .await?;

        let ids_for = |names: &[&str]| -> Vec<Uuid> {
            catalog
                .iter()
                .filter(|p| names.contains(&p.name.as_str()))
                .map(|p| p.id)
                .collect()
        };

        let admin_ids: Vec<Uuid> = catalog.iter().map(|p| p.id).collect();
        if !admin_ids.is_empty() {
            self.rbac_repo
                .assign_permissions(&mut *tx, admin_role.id, &admin_ids)
                .await?;
        }
        self.rbac_repo
            .assign_permissions(
                &mut *tx,
                supervisor_role.id,
                &ids_for(roles::SUPERVISOR_PERMISSIONS),
            )
            .await?;
        self.rbac_repo
            .assign_permissions(&mut *tx, cashier_role.id, &ids_for(roles::CASHIER_PERMISSIONS))
            .await?;

        // 5. Vincula o criador e o torna admin da própria loja
        self.tenant_repo
            .add_member(&mut *tx, new_tenant.id, owner_id, is_default)
            .await?;
        self.rbac_repo
            .assign_role(&mut *tx, owner_id, admin_role.id)
            .await?;

        // 6. Commit
        tx.commit().await?;

        Ok(new_tenant)
    }

    pub async fn list_user_tenants(&self, user_id: Uuid) -> Result<Vec<TenantSummary>, AppError> {
        self.tenant_repo.tenants_for_user(user_id).await
    }

    /// Todos os tenants: só para quem enxerga todos (super-admin).
    pub async fn list_all_tenants(&self) -> Result<Vec<Tenant>, AppError> {
        self.tenant_repo.list_all().await
    }

    pub async fn find_tenant(&self, id: Uuid) -> Result<Option<Tenant>, AppError> {
        self.tenant_repo.find_by_id(id).await
    }

    /// Vincula um usuário existente a um tenant (fluxo administrativo).
    pub async fn add_member(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        is_default: bool,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        self.tenant_repo
            .add_member(&mut *tx, tenant_id, user_id, is_default)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

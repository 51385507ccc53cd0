// src/db/directory.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::db::{RbacRepository, TenantRepository};
use crate::models::tenancy::Tenant;
use crate::tenancy::directory::TenantDirectory;

// A implementação Postgres do seam de tenancy: delega aos repositórios.
#[derive(Clone)]
pub struct PgTenantDirectory {
    tenants: TenantRepository,
    rbac: RbacRepository,
}

impl PgTenantDirectory {
    pub fn new(tenants: TenantRepository, rbac: RbacRepository) -> Self {
        Self { tenants, rbac }
    }
}

#[async_trait]
impl TenantDirectory for PgTenantDirectory {
    async fn tenant_by_id(&self, id: Uuid) -> Result<Option<Tenant>, AppError> {
        self.tenants.find_by_id(id).await
    }

    async fn is_member(&self, user_id: Uuid, tenant_id: Uuid) -> Result<bool, AppError> {
        self.tenants.is_member(user_id, tenant_id).await
    }

    async fn default_tenant(&self, user_id: Uuid) -> Result<Option<Tenant>, AppError> {
        self.tenants.default_tenant(user_id).await
    }

    async fn first_tenant(&self, user_id: Uuid) -> Result<Option<Tenant>, AppError> {
        self.tenants.first_tenant(user_id).await
    }

    async fn is_super_admin(&self, user_id: Uuid) -> Result<bool, AppError> {
        self.rbac.is_super_admin(user_id).await
    }
}

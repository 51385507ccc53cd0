// src/tenancy/directory.rs
//
// O seam de persistência que a camada de tenancy consome: busca de tenants,
// vínculos usuário-tenant e o flag de super-admin. Implementado sobre os
// repositórios Postgres em produção e por um duplo em memória nos testes.

use async_trait::async_trait;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::tenancy::Tenant;

#[async_trait]
pub trait TenantDirectory: Send + Sync {
    async fn tenant_by_id(&self, id: Uuid) -> Result<Option<Tenant>, AppError>;

    /// O usuário tem vínculo direto com o tenant?
    async fn is_member(&self, user_id: Uuid, tenant_id: Uuid) -> Result<bool, AppError>;

    /// O tenant marcado como default do usuário, se houver.
    async fn default_tenant(&self, user_id: Uuid) -> Result<Option<Tenant>, AppError>;

    /// O primeiro tenant do usuário (ordem de vínculo).
    async fn first_tenant(&self, user_id: Uuid) -> Result<Option<Tenant>, AppError>;

    /// O usuário carrega o cargo global `super-admin`?
    async fn is_super_admin(&self, user_id: Uuid) -> Result<bool, AppError>;
}

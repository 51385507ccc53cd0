// src/tenancy/service.rs

use std::sync::Arc;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::tenancy::Tenant;
use crate::tenancy::context::TenantContext;
use crate::tenancy::directory::TenantDirectory;

// Máquina de estados da ativação:
//   {SemTenant} --set_current(válido)--> {Ativo(T)} --clear()--> {SemTenant}
//   {Ativo(T)}  --set_current(outroVálido)--> {Ativo(T')}
// set_current num tenant inacessível deixa o estado intacto e reporta negação.
#[derive(Clone)]
pub struct TenancyService {
    directory: Arc<dyn TenantDirectory>,
}

impl TenancyService {
    pub fn new(directory: Arc<dyn TenantDirectory>) -> Self {
        Self { directory }
    }

    /// O usuário pode operar sob esse tenant? Super-admins podem sempre;
    /// os demais precisam de vínculo direto.
    pub async fn has_access_to_tenant(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<bool, AppError> {
        if self.directory.is_super_admin(user_id).await? {
            return Ok(true);
        }
        self.directory.is_member(user_id, tenant_id).await
    }

    /// Ativa o tenant no contexto. Com um ator presente, valida o acesso
    /// antes de efetivar; negado => `Ok(false)` e nada muda.
    pub async fn set_current(
        &self,
        ctx: &mut TenantContext,
        tenant: Tenant,
        acting_user: Option<Uuid>,
    ) -> Result<bool, AppError> {
        if let Some(user_id) = acting_user {
            if !self.has_access_to_tenant(user_id, tenant.id).await? {
                return Ok(false);
            }
        }
        ctx.activate(tenant).await;
        Ok(true)
    }

    /// Resolve o tenant ativo: override da unidade atual primeiro; senão o
    /// id persistido na sessão, re-hidratando o override.
    pub async fn get_current(&self, ctx: &mut TenantContext) -> Result<Option<Tenant>, AppError> {
        if let Some(current) = ctx.current() {
            return Ok(Some(current.clone()));
        }

        if let Some(id) = ctx.session_tenant_id().await {
            if let Some(tenant) = self.directory.tenant_by_id(id).await? {
                ctx.rehydrate(tenant.clone());
                return Ok(Some(tenant));
            }
        }

        Ok(None)
    }

    pub async fn clear(&self, ctx: &mut TenantContext) {
        ctx.clear().await;
    }

    /// Troca o tenant ativo do usuário. `false` se o tenant não existe ou o
    /// usuário não tem acesso (estado intacto nos dois casos).
    pub async fn switch_tenant(
        &self,
        ctx: &mut TenantContext,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<bool, AppError> {
        let Some(tenant) = self.directory.tenant_by_id(tenant_id).await? else {
            return Ok(false);
        };
        self.set_current(ctx, tenant, Some(user_id)).await
    }

    /// Assume um tenant SEM exigir vínculo: inspeção cross-tenant.
    /// Restrito a super-admins; `false` para qualquer outro ator.
    pub async fn assume_tenant(
        &self,
        ctx: &mut TenantContext,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<bool, AppError> {
        if !self.directory.is_super_admin(user_id).await? {
            return Ok(false);
        }
        let Some(tenant) = self.directory.tenant_by_id(tenant_id).await? else {
            return Ok(false);
        };
        ctx.activate(tenant).await;
        Ok(true)
    }

    /// Resolução no início de cada requisição: sessão → tenant default →
    /// primeiro tenant → nenhum. Quem rejeita a ausência (para atores não
    /// privilegiados) é o guard que nos chama.
    pub async fn resolve_for_request(
        &self,
        ctx: &mut TenantContext,
        user_id: Uuid,
    ) -> Result<Option<Tenant>, AppError> {
        if let Some(tenant) = self.get_current(ctx).await? {
            return Ok(Some(tenant));
        }

        let fallback = match self.directory.default_tenant(user_id).await? {
            Some(tenant) => Some(tenant),
            None => self.directory.first_tenant(user_id).await?,
        };

        if let Some(tenant) = &fallback {
            ctx.activate(tenant.clone()).await;
        }

        Ok(fallback)
    }
}

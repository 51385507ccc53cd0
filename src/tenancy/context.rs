// src/tenancy/context.rs
//
// "Qual tenant esta requisição está operando?": um valor explícito criado
// por requisição e passado adiante, nunca um singleton do processo.
// Unidades de trabalho concorrentes não enxergam o override umas das outras.

use uuid::Uuid;

use crate::models::tenancy::Tenant;
use crate::tenancy::session::SessionStore;

#[derive(Clone)]
pub struct TenantContext {
    sessions: SessionStore,
    session_id: Uuid,
    // O override da unidade de trabalho atual. Precisa ser re-estabelecido
    // a cada requisição (o tenant_guard faz isso).
    current: Option<Tenant>,
}

impl TenantContext {
    pub fn new(sessions: SessionStore, session_id: Uuid) -> Self {
        Self {
            sessions,
            session_id,
            current: None,
        }
    }

    /// Contexto sem sessão por trás (seeding, tooling administrativo).
    pub fn detached() -> Self {
        Self::new(SessionStore::new(), Uuid::new_v4())
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// O override em memória. `None` não significa "sem tenant na sessão" -
    /// para a resolução completa use `TenancyService::get_current`.
    pub fn current(&self) -> Option<&Tenant> {
        self.current.as_ref()
    }

    pub fn current_id(&self) -> Option<Uuid> {
        self.current.as_ref().map(|t| t.id)
    }

    /// Ativa o tenant: grava na sessão E no override da unidade atual.
    pub async fn activate(&mut self, tenant: Tenant) {
        self.sessions
            .set_tenant(self.session_id, Some(tenant.id))
            .await;
        self.current = Some(tenant);
    }

    /// Restabelece apenas o override (a sessão já aponta para esse tenant).
    pub fn rehydrate(&mut self, tenant: Tenant) {
        self.current = Some(tenant);
    }

    /// Limpa sessão e override.
    pub async fn clear(&mut self) {
        self.sessions.set_tenant(self.session_id, None).await;
        self.current = None;
    }

    pub async fn session_tenant_id(&self) -> Option<Uuid> {
        self.sessions.get(self.session_id).await?.tenant_id
    }

    /// Chave de cache com namespace por tenant: `tenant:<id>:<chave>`,
    /// ou `global:<chave>` sem tenant ativo.
    pub fn cache_key(&self, key: &str) -> String {
        match self.current_id() {
            Some(id) => format!("tenant:{}:{}", id, key),
            None => format!("global:{}", key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn tenant(name: &str) -> Tenant {
        Tenant {
            id: Uuid::new_v4(),
            code: name.to_uppercase(),
            name: name.to_string(),
            timezone: "Asia/Jakarta".to_string(),
            settings: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn cache_key_is_global_without_tenant_and_namespaced_with_one() {
        let store = SessionStore::new();
        let sid = store.create(Uuid::new_v4()).await;
        let mut ctx = TenantContext::new(store, sid);

        assert_eq!(ctx.cache_key("x"), "global:x");

        let t = tenant("loja");
        let id = t.id;
        ctx.activate(t).await;
        assert_eq!(ctx.cache_key("x"), format!("tenant:{}:x", id));

        ctx.clear().await;
        assert_eq!(ctx.cache_key("x"), "global:x");
    }

    #[tokio::test]
    async fn activate_persists_to_session_and_clear_removes_both() {
        let store = SessionStore::new();
        let sid = store.create(Uuid::new_v4()).await;
        let mut ctx = TenantContext::new(store.clone(), sid);

        let t = tenant("loja");
        let id = t.id;
        ctx.activate(t).await;

        assert_eq!(ctx.current_id(), Some(id));
        assert_eq!(ctx.session_tenant_id().await, Some(id));

        ctx.clear().await;
        assert_eq!(ctx.current_id(), None);
        assert_eq!(ctx.session_tenant_id().await, None);
    }

    #[tokio::test]
    async fn override_is_per_unit_of_work_but_session_survives() {
        let store = SessionStore::new();
        let sid = store.create(Uuid::new_v4()).await;

        let t = tenant("loja");
        let id = t.id;

        // Primeira "requisição" seleciona o tenant
        let mut ctx1 = TenantContext::new(store.clone(), sid);
        ctx1.activate(t).await;
        drop(ctx1);

        // A próxima unidade de trabalho nasce sem override, mas a sessão
        // ainda sabe qual era o tenant
        let ctx2 = TenantContext::new(store, sid);
        assert_eq!(ctx2.current_id(), None);
        assert_eq!(ctx2.session_tenant_id().await, Some(id));
    }
}

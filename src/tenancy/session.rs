// src/tenancy/session.rs
//
// A sessão lógica de um usuário. O tenant selecionado sobrevive entre
// requisições sequenciais da mesma sessão; o override em memória do
// TenantContext, não. O id da sessão viaja dentro do JWT (claim `sid`).

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub tenant_id: Option<Uuid>,
}

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abre uma sessão nova para o usuário e devolve o seu id.
    pub async fn create(&self, user_id: Uuid) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.write().await.insert(
            id,
            Session {
                user_id,
                tenant_id: None,
            },
        );
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<Session> {
        self.inner.read().await.get(&id).cloned()
    }

    /// Persiste (ou limpa) o tenant selecionado na sessão.
    pub async fn set_tenant(&self, id: Uuid, tenant_id: Option<Uuid>) {
        if let Some(session) = self.inner.write().await.get_mut(&id) {
            session.tenant_id = tenant_id;
        }
    }

    pub async fn remove(&self, id: Uuid) {
        self.inner.write().await.remove(&id);
    }
}

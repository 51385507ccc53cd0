// tests/common/mod.rs
//
// Duplo em memória do seam de tenancy: os testes exercitam a resolução de
// contexto e as regras de acesso sem precisar de um Postgres de pé.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use pos_backend::common::error::AppError;
use pos_backend::models::auth::User;
use pos_backend::models::tenancy::Tenant;
use pos_backend::tenancy::TenantDirectory;

pub fn make_tenant(name: &str) -> Tenant {
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

pub fn make_user(name: &str) -> User {
    User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@example.com", name),
        password_hash: String::new(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[derive(Default)]
pub struct MemoryDirectory {
    tenants: RwLock<HashMap<Uuid, Tenant>>,
    // (usuário, tenant, is_default): a ordem do Vec é a ordem de vínculo
    memberships: RwLock<Vec<(Uuid, Uuid, bool)>>,
    super_admins: RwLock<HashSet<Uuid>>,
}

impl MemoryDirectory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn add_tenant(&self, tenant: &Tenant) {
        self.tenants
            .write()
            .await
            .insert(tenant.id, tenant.clone());
    }

    pub async fn add_membership(&self, user_id: Uuid, tenant_id: Uuid, is_default: bool) {
        self.memberships
            .write()
            .await
            .push((user_id, tenant_id, is_default));
    }

    pub async fn make_super_admin(&self, user_id: Uuid) {
        self.super_admins.write().await.insert(user_id);
    }
}

#[async_trait]
impl TenantDirectory for MemoryDirectory {
    async fn tenant_by_id(&self, id: Uuid) -> Result<Option<Tenant>, AppError> {
        Ok(self.tenants.read().await.get(&id).cloned())
    }

    async fn is_member(&self, user_id: Uuid, tenant_id: Uuid) -> Result<bool, AppError> {
        Ok(self
            .memberships
            .read()
            .await
            .iter()
            .any(|(u, t, _)| *u == user_id && *t == tenant_id))
    }

    async fn default_tenant(&self, user_id: Uuid) -> Result<Option<Tenant>, AppError> {
        let memberships = self.memberships.read().await;
        let Some((_, tenant_id, _)) = memberships
            .iter()
            .find(|(u, _, is_default)| *u == user_id && *is_default)
        else {
            return Ok(None);
        };
        self.tenant_by_id(*tenant_id).await
    }

    async fn first_tenant(&self, user_id: Uuid) -> Result<Option<Tenant>, AppError> {
        let memberships = self.memberships.read().await;
        let Some((_, tenant_id, _)) = memberships.iter().find(|(u, _, _)| *u == user_id) else {
            return Ok(None);
        };
        self.tenant_by_id(*tenant_id).await
    }

    async fn is_super_admin(&self, user_id: Uuid) -> Result<bool, AppError> {
        Ok(self.super_admins.read().await.contains(&user_id))
    }
}

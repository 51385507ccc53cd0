// src/policy/actor.rs
//
// O "retrato" do usuário atuante para uma requisição: cargos e permissões
// carregados da partição ativa, mais o flag de super-admin. Montado uma vez
// pelo guard; os gates avaliam em cima dele sem voltar ao banco.

use std::collections::HashSet;
use uuid::Uuid;

use crate::models::auth::User;

#[derive(Debug, Clone)]
pub struct Actor {
    pub user: User,
    // A partição (tenant) sob a qual cargos/permissões foram carregados.
    // `None` = partição global (só o super-admin vive lá).
    pub partition: Option<Uuid>,
    roles: HashSet<String>,
    permissions: HashSet<String>,
    super_admin: bool,
}

impl Actor {
    pub fn new(
        user: User,
        partition: Option<Uuid>,
        roles: impl IntoIterator<Item = String>,
        permissions: impl IntoIterator<Item = String>,
        super_admin: bool,
    ) -> Self {
        Self {
            user,
            partition,
            roles: roles.into_iter().collect(),
            permissions: permissions.into_iter().collect(),
            super_admin,
        }
    }

    pub fn id(&self) -> Uuid {
        self.user.id
    }

    pub fn is_super_admin(&self) -> bool {
        self.super_admin
    }

    pub fn can_access_all_tenants(&self) -> bool {
        self.is_super_admin()
    }

    /// O ator carrega esse cargo na partição ativa? Diferente das
    /// permissões, super-admin NÃO curto-circuita aqui: os limites por
    /// cargo olham para os cargos reais.
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.contains(name)
    }

    pub fn has_any_role(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.has_role(n))
    }

    /// Checagem crua de capacidade. Super-admin satisfaz qualquer permissão.
    pub fn has_permission_to(&self, name: &str) -> bool {
        self.super_admin || self.permissions.contains(name)
    }

    pub fn role_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.roles.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Teste".to_string(),
            email: "teste@example.com".to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn super_admin_short_circuits_permissions_but_not_roles() {
        let actor = Actor::new(user(), None, Vec::new(), Vec::new(), true);

        assert!(actor.has_permission_to("qualquer_coisa"));
        assert!(actor.can_access_all_tenants());
        assert!(!actor.has_role("cashier"));
    }

    #[test]
    fn regular_actor_only_has_loaded_permissions() {
        let actor = Actor::new(
            user(),
            Some(Uuid::new_v4()),
            vec!["cashier".to_string()],
            vec!["create_sale".to_string()],
            false,
        );

        assert!(actor.has_permission_to("create_sale"));
        assert!(!actor.has_permission_to("void_sale"));
        assert!(actor.has_role("cashier"));
        assert!(actor.has_any_role(&["supervisor", "cashier"]));
        assert!(!actor.can_access_all_tenants());
    }
}

// src/db/scope.rs
//
// O filtro de escopo por tenant. Em vez de um hook implícito disparado em
// toda query, o escopo é um PARÂMETRO explícito que todo repositório recebe
// ao ler/gravar entidades pertencentes a um tenant. O caminho sem filtro
// existe, mas tem nome (`Unscoped`) e só é usado por fluxos de super-admin
// e seeding: nunca por acidente.

use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::{
    catalog::{Product, ProductCategory, ProductVariant},
    inventory::Inventory,
    outlet::{Outlet, Register},
};
use crate::tenancy::context::TenantContext;

/// Declara se um tipo de entidade carrega a coluna de dono (`tenant_id`).
///
/// Entidades SEM a coluna (Register, ProductVariant) herdam o escopo
/// transitivamente pelo pai e não são tocadas pelo filtro.
pub trait TenantOwned {
    const TABLE: &'static str;
    const TENANT_COLUMN: Option<&'static str> = Some("tenant_id");
}

impl TenantOwned for Outlet {
    const TABLE: &'static str = "outlets";
}

impl TenantOwned for Product {
    const TABLE: &'static str = "products";
}

impl TenantOwned for ProductCategory {
    const TABLE: &'static str = "product_categories";
}

impl TenantOwned for Inventory {
    const TABLE: &'static str = "inventory";
}

impl TenantOwned for Register {
    const TABLE: &'static str = "registers";
    const TENANT_COLUMN: Option<&'static str> = None;
}

impl TenantOwned for ProductVariant {
    const TABLE: &'static str = "product_variants";
    const TENANT_COLUMN: Option<&'static str> = None;
}

/// O escopo ativo de uma query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryScope {
    /// Filtra tudo para o tenant dado.
    Tenant(Uuid),
    /// Sem filtro. Válvula de escape opt-in para super-admin e seeding.
    Unscoped,
}

impl QueryScope {
    /// Deriva o escopo do contexto da requisição. Sem tenant ativo, o filtro
    /// vira no-op (contextos controlados: seeding, tooling administrativo).
    pub fn from_context(ctx: &TenantContext) -> Self {
        match ctx.current_id() {
            Some(id) => QueryScope::Tenant(id),
            None => QueryScope::Unscoped,
        }
    }

    pub fn tenant_id(&self) -> Option<Uuid> {
        match self {
            QueryScope::Tenant(id) => Some(*id),
            QueryScope::Unscoped => None,
        }
    }

    /// Injeta ` WHERE tabela.tenant_id = $n` se a entidade declara dono e há
    /// tenant ativo. Use quando o filtro é o primeiro predicado da query.
    pub fn filter_where<T: TenantOwned>(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let (Some(id), Some(col)) = (self.tenant_id(), T::TENANT_COLUMN) {
            qb.push(" WHERE ");
            qb.push(T::TABLE);
            qb.push(".");
            qb.push(col);
            qb.push(" = ");
            qb.push_bind(id);
        }
    }

    /// Injeta ` AND tabela.tenant_id = $n` ao final de um WHERE já existente.
    pub fn filter_and<T: TenantOwned>(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let (Some(id), Some(col)) = (self.tenant_id(), T::TENANT_COLUMN) {
            qb.push(" AND ");
            qb.push(T::TABLE);
            qb.push(".");
            qb.push(col);
            qb.push(" = ");
            qb.push_bind(id);
        }
    }

    /// Hook de criação: resolve o tenant a gravar em um INSERT.
    ///
    /// Um tenant explícito (ator privilegiado) vence; senão usa o tenant
    /// ativo; senão `None`, e a constraint NOT NULL do banco barra a linha
    /// órfã em vez de deixá-la passar em silêncio.
    pub fn stamp(&self, explicit: Option<Uuid>) -> Option<Uuid> {
        explicit.or_else(|| self.tenant_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn filter_where_injects_tenant_predicate() {
        let scope = QueryScope::Tenant(Uuid::new_v4());
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT * FROM outlets");
        scope.filter_where::<Outlet>(&mut qb);

        assert_eq!(qb.sql(), "SELECT * FROM outlets WHERE outlets.tenant_id = $1");
    }

    #[test]
    fn filter_and_appends_to_existing_predicate() {
        let scope = QueryScope::Tenant(Uuid::new_v4());
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT * FROM products WHERE products.id = ");
        qb.push_bind(Uuid::new_v4());
        scope.filter_and::<Product>(&mut qb);

        assert_eq!(
            qb.sql(),
            "SELECT * FROM products WHERE products.id = $1 AND products.tenant_id = $2"
        );
    }

    #[test]
    fn unscoped_is_a_no_op() {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT * FROM outlets");
        QueryScope::Unscoped.filter_where::<Outlet>(&mut qb);

        assert_eq!(qb.sql(), "SELECT * FROM outlets");
    }

    #[test]
    fn entities_without_tenant_column_are_untouched() {
        let scope = QueryScope::Tenant(Uuid::new_v4());
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT * FROM registers");
        scope.filter_where::<Register>(&mut qb);
        scope.filter_and::<ProductVariant>(&mut qb);

        assert_eq!(qb.sql(), "SELECT * FROM registers");
    }

    #[test]
    fn stamp_prefers_explicit_then_active_tenant() {
        let active = Uuid::new_v4();
        let explicit = Uuid::new_v4();
        let scope = QueryScope::Tenant(active);

        assert_eq!(scope.stamp(Some(explicit)), Some(explicit));
        assert_eq!(scope.stamp(None), Some(active));
        assert_eq!(QueryScope::Unscoped.stamp(None), None);
    }
}

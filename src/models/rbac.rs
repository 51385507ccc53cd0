// src/models/rbac.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Nome reservado do cargo global. É o ÚNICO cargo sem partição de tenant
// (tenant_id IS NULL): implica acesso a todos os tenants e todas as
// permissões. Qualquer outro nome de cargo é único apenas por (tenant, nome).
pub const SUPER_ADMIN_ROLE: &str = "super-admin";

// O que sai do banco (Tabela roles)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    // NULL apenas para o super-admin (partição global)
    #[schema(ignore)]
    pub tenant_id: Option<Uuid>,

    #[schema(example = "supervisor")]
    pub name: String,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// O que sai do banco (Tabela permissions)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440001")]
    pub id: Uuid,

    #[schema(example = "create_return")]
    pub name: String,

    #[schema(example = "Criar devoluções (sujeito ao limite de valor)")]
    pub description: Option<String>,
}

// O Payload para criar um cargo
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRolePayload {
    #[validate(length(min = 1, message = "O nome do cargo é obrigatório."))]
    #[schema(example = "gerente")]
    pub name: String,

    #[schema(example = json!(["create_sale", "void_sale"]))]
    pub permissions: Vec<String>,
}

// Resposta completa (Cargo + Lista de Permissões)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    #[serde(flatten)]
    pub role: Role,

    #[schema(example = json!(["create_sale", "void_sale"]))]
    pub permissions: Vec<String>,
}

// ---
// Catálogo de capacidades atômicas
// ---
// Os nomes são estáveis: gravados no banco e referenciados pelos gates.
pub mod permissions {
    // Vendas
    pub const CREATE_SALE: &str = "create_sale";
    pub const VOID_SALE: &str = "void_sale";
    pub const VIEW_SALE: &str = "view_sale";

    // Devoluções
    pub const CREATE_RETURN: &str = "create_return";
    pub const CREATE_UNLIMITED_RETURN: &str = "create_unlimited_return";

    // Produtos
    pub const VIEW_PRODUCT: &str = "view_product";
    pub const MANAGE_PRODUCT: &str = "manage_product";

    // Estoque
    pub const VIEW_INVENTORY: &str = "view_inventory";
    pub const ADJUST_STOCK: &str = "adjust_stock";
    pub const UNLIMITED_STOCK_ADJUSTMENT: &str = "unlimited_stock_adjustment";

    // Turnos
    pub const OPEN_SHIFT: &str = "open_shift";
    pub const CLOSE_SHIFT: &str = "close_shift";
    pub const VIEW_SHIFT: &str = "view_shift";

    // Descontos
    pub const APPLY_DISCOUNT: &str = "apply_discount";
    pub const APPROVE_DISCOUNT: &str = "approve_discount";

    // Relatórios
    pub const VIEW_REPORTS: &str = "view_reports";
    pub const GENERATE_REPORTS: &str = "generate_reports";

    // Usuários e cargos
    pub const VIEW_USER: &str = "view_user";
    pub const MANAGE_USER: &str = "manage_user";
    pub const VIEW_ROLE: &str = "view_role";
    pub const MANAGE_ROLE: &str = "manage_role";

    // Configurações
    pub const VIEW_SETTINGS: &str = "view_settings";
    pub const MANAGE_SETTINGS: &str = "manage_settings";

    // Lojas
    pub const VIEW_OUTLET: &str = "view_outlet";
    pub const MANAGE_OUTLET: &str = "manage_outlet";

    /// Todas as capacidades conhecidas, na ordem do catálogo.
    pub const ALL: &[&str] = &[
        CREATE_SALE,
        VOID_SALE,
        VIEW_SALE,
        CREATE_RETURN,
        CREATE_UNLIMITED_RETURN,
        VIEW_PRODUCT,
        MANAGE_PRODUCT,
        VIEW_INVENTORY,
        ADJUST_STOCK,
        UNLIMITED_STOCK_ADJUSTMENT,
        OPEN_SHIFT,
        CLOSE_SHIFT,
        VIEW_SHIFT,
        APPLY_DISCOUNT,
        APPROVE_DISCOUNT,
        VIEW_REPORTS,
        GENERATE_REPORTS,
        VIEW_USER,
        MANAGE_USER,
        VIEW_ROLE,
        MANAGE_ROLE,
        VIEW_SETTINGS,
        MANAGE_SETTINGS,
        VIEW_OUTLET,
        MANAGE_OUTLET,
    ];
}

// Nomes dos cargos padrão criados em cada novo tenant, com os conjuntos de
// permissões que cada um nasce tendo. O admin nasce com o catálogo inteiro.
pub mod roles {
    use super::permissions as p;

    pub const CASHIER: &str = "cashier";
    pub const SUPERVISOR: &str = "supervisor";
    pub const ADMIN: &str = "admin";

    // Limitado por valor nas devoluções (via gate create-return)
    pub const CASHIER_PERMISSIONS: &[&str] = &[
        p::CREATE_SALE,
        p::VIEW_SALE,
        p::VIEW_PRODUCT,
        p::VIEW_INVENTORY,
        p::OPEN_SHIFT,
        p::CLOSE_SHIFT,
        p::VIEW_SHIFT,
        p::CREATE_RETURN,
        p::APPLY_DISCOUNT,
    ];

    // Tudo do caixa, mais cancelamentos, ajustes de estoque (limitados por
    // quantidade via gate adjust-stock) e aprovações
    pub const SUPERVISOR_PERMISSIONS: &[&str] = &[
        p::CREATE_SALE,
        p::VOID_SALE,
        p::VIEW_SALE,
        p::VIEW_PRODUCT,
        p::VIEW_INVENTORY,
        p::OPEN_SHIFT,
        p::CLOSE_SHIFT,
        p::VIEW_SHIFT,
        p::CREATE_RETURN,
        p::CREATE_UNLIMITED_RETURN,
        p::APPLY_DISCOUNT,
        p::APPROVE_DISCOUNT,
        p::ADJUST_STOCK,
        p::VIEW_REPORTS,
        p::VIEW_USER,
        p::VIEW_ROLE,
    ];
}

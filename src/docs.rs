// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers;
use crate::models;
use crate::policy;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Tenancy ---
        handlers::tenants::create_tenant,
        handlers::tenants::list_my_tenants,
        handlers::tenants::list_all_tenants,
        handlers::tenants::switch_tenant,
        handlers::tenants::assume_tenant,
        handlers::tenants::clear_tenant,

        // --- Usuários ---
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,

        // --- RBAC ---
        handlers::rbac::create_role,
        handlers::rbac::list_roles,
        handlers::rbac::list_permissions,

        // --- Lojas e caixas ---
        handlers::outlets::create_outlet,
        handlers::outlets::list_outlets,
        handlers::outlets::get_outlet,
        handlers::outlets::update_outlet,
        handlers::outlets::delete_outlet,
        handlers::outlets::create_register,
        handlers::outlets::list_registers,
        handlers::outlets::update_register,
        handlers::outlets::delete_register,

        // --- Catálogo ---
        handlers::catalog::create_product,
        handlers::catalog::list_products,
        handlers::catalog::get_product,
        handlers::catalog::update_product,
        handlers::catalog::create_variant,
        handlers::catalog::list_variants,
        handlers::catalog::find_by_barcode,
        handlers::catalog::create_category,
        handlers::catalog::list_categories,

        // --- Estoque ---
        handlers::inventory::adjust_stock,
        handlers::inventory::set_safety_stock,
        handlers::inventory::list_for_outlet,
        handlers::inventory::list_low_stock,

        // --- Configurações ---
        handlers::settings::get_pos_config,
        handlers::settings::update_pos_config,
        handlers::settings::reload_pos_config,

        // --- Gates ---
        handlers::policy::check_gate,
    ),
    components(
        schemas(
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::tenancy::Tenant,
            models::tenancy::TenantMembership,
            models::tenancy::TenantSummary,
            models::tenancy::CreateTenantPayload,
            models::tenancy::SwitchTenantPayload,
            models::rbac::Role,
            models::rbac::Permission,
            models::rbac::CreateRolePayload,
            models::rbac::RoleResponse,
            models::outlet::Outlet,
            models::outlet::OutletMode,
            models::outlet::Register,
            models::outlet::CreateOutletPayload,
            models::outlet::UpdateOutletPayload,
            models::outlet::CreateRegisterPayload,
            models::catalog::Product,
            models::catalog::ProductStatus,
            models::catalog::ProductVariant,
            models::catalog::ProductCategory,
            models::catalog::CreateProductPayload,
            models::catalog::UpdateProductPayload,
            models::catalog::CreateVariantPayload,
            models::catalog::CreateCategoryPayload,
            models::inventory::Inventory,
            models::inventory::AdjustStockPayload,
            models::inventory::SetSafetyStockPayload,
            services::user_service::UserWithRoles,
            handlers::users::CreateUserPayload,
            handlers::users::UpdateUserPayload,
            handlers::outlets::UpdateRegisterPayload,
            handlers::policy::PolicyCheckPayload,
            handlers::policy::PolicyDecision,
            policy::PosConfig,
            policy::config::ConstraintsConfig,
            policy::config::CashierConstraints,
            policy::config::SupervisorConstraints,
            policy::config::ApprovalConstraints,
            policy::config::BusinessHoursConfig,
            policy::config::CurrencyConfig,
            policy::config::InventoryConfig,
            policy::config::ShiftsConfig,
            policy::config::DiscountsConfig,
            policy::config::TaxConfig,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registro e login"),
        (name = "tenancy", description = "Estabelecimentos e troca de contexto"),
        (name = "users", description = "Gestão de usuários"),
        (name = "rbac", description = "Cargos e permissões"),
        (name = "outlets", description = "Lojas e caixas"),
        (name = "catalog", description = "Produtos, variações e categorias"),
        (name = "inventory", description = "Níveis de estoque"),
        (name = "settings", description = "Regras de negócio configuráveis"),
        (name = "policy", description = "Gates de autorização"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

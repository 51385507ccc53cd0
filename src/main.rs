// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use pos_backend::config::AppState;
use pos_backend::docs;
use pos_backend::handlers;
use pos_backend::middleware::auth::auth_guard;
use pos_backend::middleware::tenancy::tenant_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve
    // iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Garante o catálogo de permissões (idempotente)
    app_state
        .rbac_service
        .seed_permission_catalog()
        .await
        .expect("Falha ao semear o catálogo de permissões.");
    tracing::info!("✅ Catálogo de permissões garantido!");

    // Rotas públicas (sem autenticação)
    let public_routes = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login));

    // Rotas que exigem apenas autenticação: criar o primeiro
    // estabelecimento acontece ANTES de existir contexto de tenant
    let session_routes = Router::new()
        .route("/api/users/me", get(handlers::auth::get_me))
        .route(
            "/api/tenants",
            post(handlers::tenants::create_tenant).get(handlers::tenants::list_my_tenants),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Rotas sob contexto de tenant (auth_guard + tenant_guard)
    let tenant_routes = Router::new()
        // Tenancy
        .route("/api/tenants/all", get(handlers::tenants::list_all_tenants))
        .route("/api/tenants/switch", post(handlers::tenants::switch_tenant))
        .route("/api/tenants/assume", post(handlers::tenants::assume_tenant))
        .route(
            "/api/tenants/current",
            axum::routing::delete(handlers::tenants::clear_tenant),
        )
        // Usuários
        .route(
            "/api/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/api/users/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        // RBAC
        .route(
            "/api/roles",
            get(handlers::rbac::list_roles).post(handlers::rbac::create_role),
        )
        .route("/api/permissions", get(handlers::rbac::list_permissions))
        // Lojas e caixas
        .route(
            "/api/outlets",
            get(handlers::outlets::list_outlets).post(handlers::outlets::create_outlet),
        )
        .route(
            "/api/outlets/{id}",
            get(handlers::outlets::get_outlet)
                .put(handlers::outlets::update_outlet)
                .delete(handlers::outlets::delete_outlet),
        )
        .route(
            "/api/registers",
            get(handlers::outlets::list_registers).post(handlers::outlets::create_register),
        )
        .route(
            "/api/registers/{id}",
            put(handlers::outlets::update_register).delete(handlers::outlets::delete_register),
        )
        // Catálogo
        .route(
            "/api/products",
            get(handlers::catalog::list_products).post(handlers::catalog::create_product),
        )
        .route(
            "/api/products/{id}",
            get(handlers::catalog::get_product).put(handlers::catalog::update_product),
        )
        .route(
            "/api/products/{id}/variants",
            get(handlers::catalog::list_variants).post(handlers::catalog::create_variant),
        )
        .route(
            "/api/catalog/barcode/{barcode}",
            get(handlers::catalog::find_by_barcode),
        )
        .route(
            "/api/categories",
            get(handlers::catalog::list_categories).post(handlers::catalog::create_category),
        )
        // Estoque
        .route("/api/inventory/adjust", post(handlers::inventory::adjust_stock))
        .route(
            "/api/inventory/safety-stock",
            put(handlers::inventory::set_safety_stock),
        )
        .route(
            "/api/inventory/outlet/{outlet_id}",
            get(handlers::inventory::list_for_outlet),
        )
        .route(
            "/api/inventory/low-stock",
            get(handlers::inventory::list_low_stock),
        )
        // Configurações do POS (hot reload)
        .route(
            "/api/settings/pos",
            get(handlers::settings::get_pos_config).put(handlers::settings::update_pos_config),
        )
        .route(
            "/api/settings/pos/reload",
            post(handlers::settings::reload_pos_config),
        )
        // Gates nomeados
        .route("/api/policy/check", post(handlers::policy::check_gate))
        // A ordem importa: o tenant_guard precisa do que o auth_guard insere
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .merge(tenant_routes)
        .merge(
            SwaggerUi::new("/docs").url("/api/docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", addr);
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}

// src/config.rs

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{
    env,
    sync::{Arc, RwLock},
    time::Duration,
};

use crate::db::{
    CatalogRepository, InventoryRepository, OutletRepository, PgTenantDirectory, RbacRepository,
    TenantRepository, UserRepository,
};
use crate::policy::{PolicyEngine, PosConfig};
use crate::services::{
    AuthService, CatalogService, InventoryService, OutletService, RbacService, TenantService,
    UserService,
};
use crate::tenancy::{SessionStore, TenancyService};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub sessions: SessionStore,
    pub policy: PolicyEngine,
    pub tenancy: TenancyService,
    pub auth_service: AuthService,
    pub tenant_service: TenantService,
    pub rbac_service: RbacService,
    pub user_service: UserService,
    pub outlet_service: OutletService,
    pub catalog_service: CatalogService,
    pub inventory_service: InventoryService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // As regras de negócio do POS, recarregáveis em runtime
        let pos_config = Arc::new(RwLock::new(PosConfig::from_env()));
        let policy = PolicyEngine::new(pos_config);

        let sessions = SessionStore::new();

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let tenant_repo = TenantRepository::new(db_pool.clone());
        let rbac_repo = RbacRepository::new(db_pool.clone());
        let outlet_repo = OutletRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let inventory_repo = InventoryRepository::new(db_pool.clone());

        let tenancy = TenancyService::new(Arc::new(PgTenantDirectory::new(
            tenant_repo.clone(),
            rbac_repo.clone(),
        )));

        let auth_service = AuthService::new(
            user_repo.clone(),
            sessions.clone(),
            jwt_secret.clone(),
            db_pool.clone(),
        );
        let rbac_service = RbacService::new(rbac_repo.clone(), db_pool.clone());
        let tenant_service =
            TenantService::new(tenant_repo.clone(), rbac_repo.clone(), db_pool.clone());
        let user_service = UserService::new(
            user_repo.clone(),
            tenant_repo.clone(),
            rbac_service.clone(),
            db_pool.clone(),
        );
        let outlet_service = OutletService::new(outlet_repo.clone(), db_pool.clone());
        let catalog_service =
            CatalogService::new(catalog_repo.clone(), policy.clone(), db_pool.clone());
        let inventory_service = InventoryService::new(
            inventory_repo,
            outlet_repo,
            catalog_repo,
            policy.clone(),
            db_pool.clone(),
        );

        Ok(Self {
            db_pool,
            jwt_secret,
            sessions,
            policy,
            tenancy,
            auth_service,
            tenant_service,
            rbac_service,
            user_service,
            outlet_service,
            catalog_service,
            inventory_service,
        })
    }
}

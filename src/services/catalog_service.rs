// src/services/catalog_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{scope::QueryScope, CatalogRepository},
    models::catalog::{
        CreateCategoryPayload, CreateProductPayload, CreateVariantPayload, Product,
        ProductCategory, ProductVariant, UpdateProductPayload,
    },
    policy::PolicyEngine,
};

#[derive(Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
    policy: PolicyEngine,
    pool: PgPool,
}

impl CatalogService {
    pub fn new(repo: CatalogRepository, policy: PolicyEngine, pool: PgPool) -> Self {
        Self { repo, policy, pool }
    }

    pub async fn create_product(
        &self,
        scope: &QueryScope,
        payload: &CreateProductPayload,
    ) -> Result<Product, AppError> {
        // Sem alíquota no payload, usa a padrão configurada (fração → %)
        let tax_rate = match payload.tax_rate {
            Some(rate) => rate,
            None => self.policy.snapshot().tax.default_rate * Decimal::from(100),
        };

        let mut tx = self.pool.begin().await?;
        let product = self
            .repo
            .create_product(
                &mut *tx,
                scope,
                None,
                &payload.sku,
                &payload.name,
                payload.category_id,
                tax_rate,
                payload.price_incl,
                payload.description.as_deref(),
            )
            .await?;
        tx.commit().await?;
        Ok(product)
    }

    pub async fn get_product(&self, scope: &QueryScope, id: Uuid) -> Result<Product, AppError> {
        self.repo
            .find_product(scope, id)
            .await?
            .ok_or(AppError::NotFound("Produto"))
    }

    pub async fn list_products(
        &self,
        scope: &QueryScope,
        status: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<Product>, AppError> {
        self.repo.list_products(scope, status, search).await
    }

    pub async fn update_product(
        &self,
        scope: &QueryScope,
        id: Uuid,
        payload: &UpdateProductPayload,
    ) -> Result<Product, AppError> {
        self.repo
            .update_product(
                scope,
                id,
                &payload.name,
                payload.category_id,
                payload.tax_rate,
                payload.price_incl,
                payload.status.as_str(),
                payload.description.as_deref(),
            )
            .await?
            .ok_or(AppError::NotFound("Produto"))
    }

    /// Cria uma variação. O produto-pai é resolvido pelo escopo: uma
    /// variação nunca nasce pendurada no produto de outro tenant.
    pub async fn create_variant(
        &self,
        scope: &QueryScope,
        product_id: Uuid,
        payload: &CreateVariantPayload,
    ) -> Result<ProductVariant, AppError> {
        let product = self.get_product(scope, product_id).await?;

        let mut tx = self.pool.begin().await?;
        let variant = self
            .repo
            .create_variant(
                &mut *tx,
                product.id,
                &payload.code,
                &payload.name,
                payload.barcode.as_deref(),
                payload.price_override_incl,
            )
            .await?;
        tx.commit().await?;
        Ok(variant)
    }

    pub async fn list_variants(
        &self,
        scope: &QueryScope,
        product_id: Uuid,
    ) -> Result<Vec<ProductVariant>, AppError> {
        // Garante que o produto é visível no escopo antes de listar
        let product = self.get_product(scope, product_id).await?;
        self.repo.list_variants(product.id).await
    }

    pub async fn find_by_barcode(
        &self,
        scope: &QueryScope,
        barcode: &str,
    ) -> Result<ProductVariant, AppError> {
        self.repo
            .find_variant_by_barcode(scope, barcode)
            .await?
            .ok_or(AppError::NotFound("Variação"))
    }

    pub async fn create_category(
        &self,
        scope: &QueryScope,
        payload: &CreateCategoryPayload,
    ) -> Result<ProductCategory, AppError> {
        let mut tx = self.pool.begin().await?;
        let category = self
            .repo
            .create_category(&mut *tx, scope, None, &payload.name)
            .await?;
        tx.commit().await?;
        Ok(category)
    }

    pub async fn list_categories(
        &self,
        scope: &QueryScope,
    ) -> Result<Vec<ProductCategory>, AppError> {
        self.repo.list_categories(scope).await
    }
}

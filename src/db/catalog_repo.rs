// src/db/catalog_repo.rs
//
// Catálogo: produtos, variações e categorias. Produto e categoria são
// escopados direto; a variação herda o escopo do produto via JOIN. O código
// de barras é único entre todos os tenants: é o que o leitor físico lê.

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::db::scope::QueryScope;
use crate::models::catalog::{Product, ProductCategory, ProductVariant};

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Produtos
    // ---

    #[allow(clippy::too_many_arguments)]
    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        scope: &QueryScope,
        explicit_tenant: Option<Uuid>,
        sku: &str,
        name: &str,
        category_id: Option<Uuid>,
        tax_rate: Decimal,
        price_incl: Decimal,
        description: Option<&str>,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (tenant_id, sku, name, category_id, tax_rate, price_incl, status, description)
            VALUES ($1, $2, $3, $4, $5, $6, 'active', $7)
            RETURNING *
            "#,
        )
        .bind(scope.stamp(explicit_tenant))
        .bind(sku)
        .bind(name)
        .bind(category_id)
        .bind(tax_rate)
        .bind(price_incl)
        .bind(description)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::SkuAlreadyExists;
                }
            }
            e.into()
        })
    }

    pub async fn find_product(
        &self,
        scope: &QueryScope,
        id: Uuid,
    ) -> Result<Option<Product>, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT * FROM products WHERE products.id = ");
        qb.push_bind(id);
        scope.filter_and::<Product>(&mut qb);

        let product = qb
            .build_query_as::<Product>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    pub async fn list_products(
        &self,
        scope: &QueryScope,
        status: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<Product>, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT * FROM products WHERE TRUE");
        scope.filter_and::<Product>(&mut qb);

        if let Some(status) = status {
            qb.push(" AND products.status = ");
            qb.push_bind(status.to_string());
        }
        if let Some(search) = search {
            let pattern = format!("%{}%", search);
            qb.push(" AND (products.name ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR products.sku ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }
        qb.push(" ORDER BY products.sku");

        let products = qb.build_query_as::<Product>().fetch_all(&self.pool).await?;
        Ok(products)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_product(
        &self,
        scope: &QueryScope,
        id: Uuid,
        name: &str,
        category_id: Option<Uuid>,
        tax_rate: Decimal,
        price_incl: Decimal,
        status: &str,
        description: Option<&str>,
    ) -> Result<Option<Product>, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE products SET name = ");
        qb.push_bind(name);
        qb.push(", category_id = ");
        qb.push_bind(category_id);
        qb.push(", tax_rate = ");
        qb.push_bind(tax_rate);
        qb.push(", price_incl = ");
        qb.push_bind(price_incl);
        qb.push(", status = ");
        qb.push_bind(status.to_string());
        qb.push(", description = ");
        qb.push_bind(description);
        qb.push(", updated_at = NOW() WHERE products.id = ");
        qb.push_bind(id);
        scope.filter_and::<Product>(&mut qb);
        qb.push(" RETURNING *");

        let product = qb
            .build_query_as::<Product>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    // ---
    // Variações
    // ---

    pub async fn create_variant<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        code: &str,
        name: &str,
        barcode: Option<&str>,
        price_override_incl: Option<Decimal>,
    ) -> Result<ProductVariant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, ProductVariant>(
            r#"
            INSERT INTO product_variants (product_id, code, name, barcode, price_override_incl)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(code)
        .bind(name)
        .bind(barcode)
        .bind(price_override_incl)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    // Distingue o índice do barcode (global) do índice do code
                    if db_err.constraint() == Some("product_variants_barcode_key") {
                        return AppError::BarcodeAlreadyExists;
                    }
                    return AppError::UniqueConstraintViolation(
                        "Já existe uma variação com esse código.".into(),
                    );
                }
            }
            e.into()
        })
    }

    pub async fn list_variants(&self, product_id: Uuid) -> Result<Vec<ProductVariant>, AppError> {
        let variants = sqlx::query_as::<_, ProductVariant>(
            "SELECT * FROM product_variants WHERE product_id = $1 ORDER BY code",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(variants)
    }

    /// Busca a variação DENTRO do escopo: o JOIN com products aplica o
    /// filtro de tenant que a variação não carrega sozinha.
    pub async fn find_variant_scoped(
        &self,
        scope: &QueryScope,
        id: Uuid,
    ) -> Result<Option<ProductVariant>, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            r#"SELECT product_variants.* FROM product_variants
               JOIN products ON products.id = product_variants.product_id
               WHERE product_variants.id = "#,
        );
        qb.push_bind(id);
        scope.filter_and::<Product>(&mut qb);

        let variant = qb
            .build_query_as::<ProductVariant>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(variant)
    }

    pub async fn find_variant_by_barcode(
        &self,
        scope: &QueryScope,
        barcode: &str,
    ) -> Result<Option<ProductVariant>, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            r#"SELECT product_variants.* FROM product_variants
               JOIN products ON products.id = product_variants.product_id
               WHERE product_variants.barcode = "#,
        );
        qb.push_bind(barcode.to_string());
        scope.filter_and::<Product>(&mut qb);

        let variant = qb
            .build_query_as::<ProductVariant>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(variant)
    }

    // ---
    // Categorias
    // ---

    pub async fn create_category<'e, E>(
        &self,
        executor: E,
        scope: &QueryScope,
        explicit_tenant: Option<Uuid>,
        name: &str,
    ) -> Result<ProductCategory, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, ProductCategory>(
            r#"
            INSERT INTO product_categories (tenant_id, name)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(scope.stamp(explicit_tenant))
        .bind(name)
        .fetch_one(executor)
        .await?;
        Ok(category)
    }

    pub async fn list_categories(
        &self,
        scope: &QueryScope,
    ) -> Result<Vec<ProductCategory>, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT * FROM product_categories");
        scope.filter_where::<ProductCategory>(&mut qb);
        qb.push(" ORDER BY product_categories.name");

        let categories = qb
            .build_query_as::<ProductCategory>()
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }
}

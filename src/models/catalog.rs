// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// 1. Product
// ---
// SKU único dentro do tenant; preço gravado com imposto incluso.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    #[schema(example = "SKU-0001")]
    pub sku: String,

    #[schema(example = "Kopi Susu 250ml")]
    pub name: String,

    pub category_id: Option<Uuid>,

    // Alíquota em porcentagem (ex: 11.00)
    pub tax_rate: Decimal,

    // Preço com imposto incluso
    pub price_incl: Decimal,

    #[schema(example = "active")]
    pub status: String,

    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active.as_str()
    }

    /// Preço sem o imposto embutido.
    pub fn price_excl(&self) -> Decimal {
        let divisor = Decimal::ONE + (self.tax_rate / Decimal::from(100));
        (self.price_incl / divisor).round_dp(2)
    }

    /// Parcela de imposto do preço.
    pub fn tax_amount(&self) -> Decimal {
        (self.price_incl - self.price_excl()).round_dp(2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Active,
    Archived,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Archived => "archived",
        }
    }
}

impl FromStr for ProductStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ProductStatus::Active),
            "archived" => Ok(ProductStatus::Archived),
            _ => Err(()),
        }
    }
}

// ---
// 2. ProductVariant
// ---
// O código de barras é único entre TODOS os tenants (é o que o leitor
// físico enxerga). Sem tenant_id próprio: o escopo vem do produto.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: Uuid,
    pub product_id: Uuid,

    #[schema(example = "SKU-0001-G")]
    pub code: String,

    #[schema(example = "Grande")]
    pub name: String,

    #[schema(example = "8998888100014")]
    pub barcode: Option<String>,

    // Se presente, substitui o preço do produto
    pub price_override_incl: Option<Decimal>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductVariant {
    /// Preço efetivo (override da variação ou preço do produto).
    pub fn effective_price(&self, product: &Product) -> Decimal {
        self.price_override_incl.unwrap_or(product.price_incl)
    }
}

// ---
// 3. ProductCategory
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategory {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    #[schema(example = "Bebidas")]
    pub name: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 4. Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "O SKU é obrigatório."))]
    pub sku: String,
    #[validate(length(min = 1, message = "O nome do produto é obrigatório."))]
    pub name: String,
    pub category_id: Option<Uuid>,
    // Se ausente, usa a alíquota padrão configurada
    pub tax_rate: Option<Decimal>,
    pub price_incl: Decimal,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, message = "O nome do produto é obrigatório."))]
    pub name: String,
    pub category_id: Option<Uuid>,
    pub tax_rate: Decimal,
    pub price_incl: Decimal,
    pub status: ProductStatus,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVariantPayload {
    #[validate(length(min = 1, message = "O código da variação é obrigatório."))]
    pub code: String,
    #[validate(length(min = 1, message = "O nome da variação é obrigatório."))]
    pub name: String,
    pub barcode: Option<String>,
    pub price_override_incl: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryPayload {
    #[validate(length(min = 1, message = "O nome da categoria é obrigatório."))]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn product(price_incl: Decimal, tax_rate: Decimal) -> Product {
        Product {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            sku: "SKU-0001".to_string(),
            name: "Kopi Susu".to_string(),
            category_id: None,
            tax_rate,
            price_incl,
            status: "active".to_string(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn price_excl_removes_the_embedded_tax() {
        // 11.100 com 11% embutido → 10.000 sem imposto, 1.100 de imposto
        let p = product(Decimal::new(11_100, 0), Decimal::new(11, 0));
        assert_eq!(p.price_excl(), Decimal::new(10_000, 0));
        assert_eq!(p.tax_amount(), Decimal::new(1_100, 0));
    }

    #[test]
    fn variant_price_override_wins_over_product_price() {
        let p = product(Decimal::new(5_000, 0), Decimal::new(11, 0));
        let mut v = ProductVariant {
            id: Uuid::new_v4(),
            product_id: p.id,
            code: "SKU-0001-G".to_string(),
            name: "Grande".to_string(),
            barcode: None,
            price_override_incl: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(v.effective_price(&p), Decimal::new(5_000, 0));

        v.price_override_incl = Some(Decimal::new(7_500, 0));
        assert_eq!(v.effective_price(&p), Decimal::new(7_500, 0));
    }

    #[test]
    fn status_round_trips_through_text() {
        assert_eq!("active".parse::<ProductStatus>(), Ok(ProductStatus::Active));
        assert_eq!(
            "archived".parse::<ProductStatus>(),
            Ok(ProductStatus::Archived)
        );
        assert!("deleted".parse::<ProductStatus>().is_err());
        assert!(product(Decimal::ONE, Decimal::ZERO).is_active());
    }
}

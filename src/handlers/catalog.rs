// src/handlers/catalog.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        rbac::{PermManageProduct, PermViewProduct, RequirePermission},
        tenancy::Scoped,
    },
    models::catalog::{
        CreateCategoryPayload, CreateProductPayload, CreateVariantPayload, Product,
        ProductCategory, ProductVariant, UpdateProductPayload,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ProductListQuery {
    // "active" | "archived"
    pub status: Option<String>,
    pub search: Option<String>,
}

// ---
// Produtos
// ---

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductPayload,
    responses((status = 201, body = Product), (status = 409)),
    tag = "catalog",
    security(("bearer_auth" = []))
)]
pub async fn create_product(
    _perm: RequirePermission<PermManageProduct>,
    State(app_state): State<AppState>,
    Scoped(scope): Scoped,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let product = app_state
        .catalog_service
        .create_product(&scope, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductListQuery),
    responses((status = 200, body = [Product])),
    tag = "catalog",
    security(("bearer_auth" = []))
)]
pub async fn list_products(
    _perm: RequirePermission<PermViewProduct>,
    State(app_state): State<AppState>,
    Scoped(scope): Scoped,
    Query(query): Query<ProductListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state
        .catalog_service
        .list_products(&scope, query.status.as_deref(), query.search.as_deref())
        .await?;
    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    responses((status = 200, body = Product), (status = 404)),
    tag = "catalog",
    security(("bearer_auth" = []))
)]
pub async fn get_product(
    _perm: RequirePermission<PermViewProduct>,
    State(app_state): State<AppState>,
    Scoped(scope): Scoped,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.catalog_service.get_product(&scope, id).await?;
    Ok(Json(product))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    request_body = UpdateProductPayload,
    responses((status = 200, body = Product)),
    tag = "catalog",
    security(("bearer_auth" = []))
)]
pub async fn update_product(
    _perm: RequirePermission<PermManageProduct>,
    State(app_state): State<AppState>,
    Scoped(scope): Scoped,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let product = app_state
        .catalog_service
        .update_product(&scope, id, &payload)
        .await?;
    Ok(Json(product))
}

// ---
// Variações
// ---

#[utoipa::path(
    post,
    path = "/api/products/{id}/variants",
    request_body = CreateVariantPayload,
    responses((status = 201, body = ProductVariant), (status = 409)),
    tag = "catalog",
    security(("bearer_auth" = []))
)]
pub async fn create_variant(
    _perm: RequirePermission<PermManageProduct>,
    State(app_state): State<AppState>,
    Scoped(scope): Scoped,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateVariantPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let variant = app_state
        .catalog_service
        .create_variant(&scope, id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(variant)))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/variants",
    responses((status = 200, body = [ProductVariant])),
    tag = "catalog",
    security(("bearer_auth" = []))
)]
pub async fn list_variants(
    _perm: RequirePermission<PermViewProduct>,
    State(app_state): State<AppState>,
    Scoped(scope): Scoped,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let variants = app_state.catalog_service.list_variants(&scope, id).await?;
    Ok(Json(variants))
}

#[utoipa::path(
    get,
    path = "/api/catalog/barcode/{barcode}",
    responses((status = 200, body = ProductVariant), (status = 404)),
    tag = "catalog",
    security(("bearer_auth" = []))
)]
pub async fn find_by_barcode(
    _perm: RequirePermission<PermViewProduct>,
    State(app_state): State<AppState>,
    Scoped(scope): Scoped,
    Path(barcode): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let variant = app_state
        .catalog_service
        .find_by_barcode(&scope, &barcode)
        .await?;
    Ok(Json(variant))
}

// ---
// Categorias
// ---

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryPayload,
    responses((status = 201, body = ProductCategory)),
    tag = "catalog",
    security(("bearer_auth" = []))
)]
pub async fn create_category(
    _perm: RequirePermission<PermManageProduct>,
    State(app_state): State<AppState>,
    Scoped(scope): Scoped,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let category = app_state
        .catalog_service
        .create_category(&scope, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses((status = 200, body = [ProductCategory])),
    tag = "catalog",
    security(("bearer_auth" = []))
)]
pub async fn list_categories(
    _perm: RequirePermission<PermViewProduct>,
    State(app_state): State<AppState>,
    Scoped(scope): Scoped,
) -> Result<impl IntoResponse, AppError> {
    let categories = app_state.catalog_service.list_categories(&scope).await?;
    Ok(Json(categories))
}

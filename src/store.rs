//! Postgres persistence for variant records.
//!
//! `product_id` is the key of an externally-owned Product entity and is kept
//! opaque (no foreign key).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{NewVariant, VariantWriter};
use crate::{Error, Result};

/// Persisted variant row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductVariant {
    pub id: Uuid,
    pub product_id: String,
    pub variant_name: String,
    pub variant_value: String,
    pub price_adjustment: i64,
    pub stock_quantity: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Postgres-backed persistence collaborator for the wizard.
#[derive(Clone)]
pub struct PgVariantWriter {
    pool: PgPool,
}

impl PgVariantWriter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VariantWriter for PgVariantWriter {
    async fn create(&self, variant: &NewVariant) -> Result<()> {
        insert_variant(&self.pool, variant).await.map(|_| ())
    }
}

pub async fn insert_variant(pool: &PgPool, variant: &NewVariant) -> Result<ProductVariant> {
    sqlx::query_as::<_, ProductVariant>(
        "INSERT INTO product_variants (id, product_id, variant_name, variant_value, price_adjustment, stock_quantity, is_active, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW()) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&variant.product_id)
    .bind(&variant.variant_name)
    .bind(&variant.variant_value)
    .bind(variant.price_adjustment)
    .bind(variant.stock_quantity)
    .bind(variant.is_active)
    .fetch_one(pool)
    .await
    .map_err(|e| Error::Storage(e.to_string()))
}

pub async fn list_for_product(pool: &PgPool, product_id: &str) -> Result<Vec<ProductVariant>> {
    sqlx::query_as::<_, ProductVariant>(
        "SELECT * FROM product_variants WHERE product_id = $1 ORDER BY created_at",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await
    .map_err(|e| Error::Storage(e.to_string()))
}

/// Field-wise update; absent fields keep their stored value.
pub struct VariantPatch {
    pub variant_value: Option<String>,
    pub price_adjustment: Option<i64>,
    pub stock_quantity: Option<i64>,
    pub is_active: Option<bool>,
}

pub async fn update_variant(pool: &PgPool, id: Uuid, patch: &VariantPatch) -> Result<ProductVariant> {
    sqlx::query_as::<_, ProductVariant>(
        "UPDATE product_variants SET \
             variant_value = COALESCE($2, variant_value), \
             price_adjustment = COALESCE($3, price_adjustment), \
             stock_quantity = COALESCE($4, stock_quantity), \
             is_active = COALESCE($5, is_active), \
             updated_at = NOW() \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&patch.variant_value)
    .bind(patch.price_adjustment)
    .bind(patch.stock_quantity)
    .bind(patch.is_active)
    .fetch_optional(pool)
    .await
    .map_err(|e| Error::Storage(e.to_string()))?
    .ok_or(Error::VariantNotFound)
}

pub async fn delete_variant(pool: &PgPool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM product_variants WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| Error::Storage(e.to_string()))?;
    if result.rows_affected() == 0 {
        return Err(Error::VariantNotFound);
    }
    Ok(())
}

//! # Product Repository
//!
//! SQL for the `products` table.
//!
//! ## Key Operations
//! - Lookup by id or by unique name
//! - Insert on first restock, update on later restocks and sales
//! - Delete (refused by the basket foreign key while the product is in a sale)

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockroom_core::{Money, NewProduct, Product, ProductId};

/// Row shape of `products`.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    quantity: i64,
    price_cents: i64,
    cost_cents: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            quantity: row.quantity,
            price: Money::from_cents(row.price_cents),
            cost: Money::from_cents(row.cost_cents),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_PRODUCT: &str = r#"
    SELECT id, name, quantity, price_cents, cost_cents, created_at, updated_at
    FROM products
"#;

/// Repository for product database operations.
///
/// Borrows a connection (usually the open transaction of a
/// [`SqliteWork`](crate::store::SqliteWork)).
#[derive(Debug)]
pub struct ProductRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> ProductRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        ProductRepository { conn }
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&mut self, id: ProductId) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("{} WHERE id = ?1", SELECT_PRODUCT))
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(row.map(Product::from))
    }

    /// Gets a product by its exact name.
    pub async fn get_by_name(&mut self, name: &str) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("{} WHERE name = ?1", SELECT_PRODUCT))
            .bind(name)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(row.map(Product::from))
    }

    /// Lists every product in id order.
    pub async fn list(&mut self) -> DbResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!("{} ORDER BY id", SELECT_PRODUCT))
            .fetch_all(&mut *self.conn)
            .await?;

        debug!(count = rows.len(), "Listed products");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Inserts a new product and returns it with its assigned id.
    pub async fn insert(&mut self, product: &NewProduct) -> DbResult<Product> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, quantity, price_cents, cost_cents, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
        )
        .bind(&product.name)
        .bind(product.quantity)
        .bind(product.price.cents())
        .bind(product.cost.cents())
        .bind(now)
        .execute(&mut *self.conn)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &product.name),
            other => other,
        })?;

        let id = result.last_insert_rowid();
        debug!(id, name = %product.name, "Product inserted");

        Ok(Product {
            id,
            name: product.name.clone(),
            quantity: product.quantity,
            price: product.price,
            cost: product.cost,
            created_at: now,
            updated_at: now,
        })
    }

    /// Writes name, quantity, price and cost; bumps `updated_at`.
    /// A name taken by another product is a unique violation.
    pub async fn update(&mut self, product: &Product) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?2, quantity = ?3, price_cents = ?4, cost_cents = ?5, updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.quantity)
        .bind(product.price.cents())
        .bind(product.cost.cents())
        .bind(Utc::now())
        .execute(&mut *self.conn)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &product.name),
            other => other,
        })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product.name.clone()));
        }

        debug!(id = product.id, name = %product.name, quantity = product.quantity, "Product updated");
        Ok(())
    }

    /// Deletes a product by id.
    pub async fn delete(&mut self, id: ProductId) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", format!("#{}", id)));
        }

        debug!(id, "Product deleted");
        Ok(())
    }
}

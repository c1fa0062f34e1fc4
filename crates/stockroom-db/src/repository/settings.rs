//! # Settings Repository
//!
//! Key/value rows in `settings`. Only the tax rate lives here today.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockroom_core::{Percentage, TaxRate};

const TAX_RATE_KEY: &str = "tax_rate_bps";

#[derive(Debug)]
pub struct SettingsRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> SettingsRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        SettingsRepository { conn }
    }

    pub async fn get(&mut self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?1")
            .bind(key)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(value)
    }

    pub async fn set(&mut self, key: &str, value: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&mut *self.conn)
        .await?;

        debug!(key, value, "Setting stored");
        Ok(())
    }

    /// The stored tax rate; the default rate if the row was never written.
    pub async fn tax_rate(&mut self) -> DbResult<TaxRate> {
        match self.get(TAX_RATE_KEY).await? {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map(Percentage::from_bps)
                .map_err(|e| DbError::InvalidData(format!("{} = '{}': {}", TAX_RATE_KEY, raw, e))),
            None => Ok(Percentage::default_tax()),
        }
    }

    pub async fn set_tax_rate(&mut self, rate: TaxRate) -> DbResult<()> {
        self.set(TAX_RATE_KEY, &rate.bps().to_string()).await
    }
}

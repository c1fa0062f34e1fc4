//! Tax configuration.

use tracing::info;

use super::PointOfSale;
use crate::error::{CoreResult, ValidationError};
use crate::store::{SettingsStore, Store, UnitOfWork};
use crate::types::TaxRate;
use crate::validation::{percentage_from_decimal, validate_tax_rate};

/// Tax handle, borrowed from [`PointOfSale::tax`].
pub struct TaxConfig<'a, S> {
    pub(super) pos: &'a PointOfSale<S>,
}

impl<'a, S: Store> TaxConfig<'a, S> {
    pub async fn rate(&self) -> CoreResult<TaxRate> {
        let mut work = self.pos.store.begin().await?;
        work.tax_rate().await
    }

    /// The rate as a decimal percentage (`19.0`).
    pub async fn get_percent(&self) -> CoreResult<f64> {
        Ok(self.rate().await?.percentage())
    }

    /// Sets the rate from a decimal percentage in `0..=100`.
    ///
    /// The range applies to the value as given, so `100.004` is refused
    /// even though it would round to 100%.
    pub async fn set_percent(&self, percent: f64) -> CoreResult<TaxRate> {
        let rate = percentage_from_decimal("tax_rate", percent)?;
        if percent > 100.0 {
            return Err(ValidationError::OutOfRange {
                field: "tax_rate".to_string(),
                min: 0,
                max: 100,
            }
            .into());
        }
        self.set_rate(rate).await?;
        Ok(rate)
    }

    pub async fn set_rate(&self, rate: TaxRate) -> CoreResult<()> {
        validate_tax_rate(rate)?;

        let _writer = self.pos.write_lock().await;
        let mut work = self.pos.store.begin().await?;
        work.set_tax_rate(rate).await?;
        work.commit().await?;

        info!(rate = %rate, "Tax rate updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::memory::MemoryStore;
    use crate::{CoreError, PointOfSale};

    #[tokio::test]
    async fn test_default_rate_is_nineteen_percent() {
        let pos = PointOfSale::new(MemoryStore::new());
        assert_eq!(pos.tax().rate().await.unwrap().bps(), 1900);
        assert_eq!(pos.tax().get_percent().await.unwrap(), 19.0);
    }

    #[tokio::test]
    async fn test_set_percent() {
        let pos = PointOfSale::new(MemoryStore::new());

        let rate = pos.tax().set_percent(8.25).await.unwrap();
        assert_eq!(rate.bps(), 825);
        assert_eq!(pos.tax().get_percent().await.unwrap(), 8.25);

        pos.tax().set_percent(0.0).await.unwrap();
        pos.tax().set_percent(100.0).await.unwrap();
        assert_eq!(pos.tax().rate().await.unwrap().bps(), 10_000);

        // Rounds to 99.99%, inside the range
        assert_eq!(pos.tax().set_percent(99.994).await.unwrap().bps(), 9999);
    }

    #[tokio::test]
    async fn test_set_percent_out_of_range() {
        let pos = PointOfSale::new(MemoryStore::new());

        for bad in [-1.0, 100.5, 100.004, 100.0001, f64::NAN] {
            assert!(matches!(
                pos.tax().set_percent(bad).await,
                Err(CoreError::Validation(_))
            ));
        }
        assert_eq!(pos.tax().rate().await.unwrap().bps(), 1900);
    }
}

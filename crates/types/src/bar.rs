use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type Price = Decimal;

/// One OHLCV bar of a stored series.
///
/// Produced only by decoding a storage row; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarRecord {
    /// Bar timestamp. The backing `DATETIME` column carries no zone, and
    /// rows are stored in ascending timestamp order within a series.
    pub timestamp: NaiveDateTime,
    /// Open price.
    pub open: Price,
    /// High price.
    pub high: Price,
    /// Low price.
    pub low: Price,
    /// Close price.
    pub close: Price,
    /// Total transaction amount over the bar.
    pub amount: Price,
    /// Total transaction count over the bar.
    pub count: Price,
}

impl BarRecord {
    /// The range of the bar.
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }
}

/// Upper bound of the backing store's `DATETIME` domain.
///
/// Query bounds past this point cannot match any stored row and are rejected
/// before reaching the store.
pub fn max_store_datetime() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(9999, 12, 31)
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .unwrap_or(NaiveDateTime::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_range() {
        let bar = BarRecord {
            timestamp: NaiveDate::from_ymd_opt(2020, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            open: Decimal::from(10),
            high: Decimal::from(12),
            low: Decimal::from(9),
            close: Decimal::from(11),
            amount: Decimal::from(1000),
            count: Decimal::from(100),
        };
        assert_eq!(bar.range(), Decimal::from(3));
    }

    #[test]
    fn store_datetime_bound() {
        let max = max_store_datetime();
        assert_eq!(max.format("%Y-%m-%d %H:%M:%S").to_string(), "9999-12-31 23:59:59");
    }
}

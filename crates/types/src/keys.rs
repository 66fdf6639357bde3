use crate::interval::BarInterval;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Identifies one logical bar series: market, instrument code and interval.
///
/// Keys are transient; the driver uses them to compute the physical table
/// identifier and never stores them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    /// Short market code (e.g. `"SH"`).
    pub market: String,
    /// Instrument code within the market (e.g. `"600000"`).
    pub code: String,
    /// Bar sampling period.
    pub interval: BarInterval,
}

impl SeriesKey {
    pub fn new(market: impl Into<String>, code: impl Into<String>, interval: BarInterval) -> Self {
        Self {
            market: market.into(),
            code: code.into(),
            interval,
        }
    }
}

impl Display for SeriesKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}@{}", self.market, self.code, self.interval)
    }
}

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Sampling period of one bar in a stored series.
///
/// - [`Min`] through [`Min60`] – intraday bars.
/// - [`Day`] through [`Year`] – one bar per calendar period.
/// - [`Invalid`] – rejection sentinel for malformed requests; every query
///   operation refuses it before touching the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum BarInterval {
    Min,
    Min5,
    Min15,
    Min30,
    Min60,
    Day,
    Week,
    Month,
    Quarter,
    HalfYear,
    Year,
    Invalid,
}

impl BarInterval {
    /// All valid intervals, finest to coarsest.
    pub fn all() -> &'static [BarInterval] {
        &[
            BarInterval::Min,
            BarInterval::Min5,
            BarInterval::Min15,
            BarInterval::Min30,
            BarInterval::Min60,
            BarInterval::Day,
            BarInterval::Week,
            BarInterval::Month,
            BarInterval::Quarter,
            BarInterval::HalfYear,
            BarInterval::Year,
        ]
    }

    /// Storage token used in physical table identifiers (e.g. the `DAY` in
    /// `SH_DAY.600000`). Part of the storage contract shared with the
    /// backing schema; changing a token requires a migration.
    /// Returns `None` for [`Invalid`].
    pub fn table_key(&self) -> Option<&'static str> {
        match self {
            BarInterval::Min => Some("MIN"),
            BarInterval::Min5 => Some("MIN5"),
            BarInterval::Min15 => Some("MIN15"),
            BarInterval::Min30 => Some("MIN30"),
            BarInterval::Min60 => Some("MIN60"),
            BarInterval::Day => Some("DAY"),
            BarInterval::Week => Some("WEEK"),
            BarInterval::Month => Some("MONTH"),
            BarInterval::Quarter => Some("QUARTER"),
            BarInterval::HalfYear => Some("HALFYEAR"),
            BarInterval::Year => Some("YEAR"),
            BarInterval::Invalid => None,
        }
    }

    /// Parse a storage token. Unknown tokens map to [`Invalid`] so callers
    /// holding untrusted input get the sentinel instead of a panic path.
    pub fn from_table_key(token: &str) -> BarInterval {
        match token {
            "MIN" => BarInterval::Min,
            "MIN5" => BarInterval::Min5,
            "MIN15" => BarInterval::Min15,
            "MIN30" => BarInterval::Min30,
            "MIN60" => BarInterval::Min60,
            "DAY" => BarInterval::Day,
            "WEEK" => BarInterval::Week,
            "MONTH" => BarInterval::Month,
            "QUARTER" => BarInterval::Quarter,
            "HALFYEAR" => BarInterval::HalfYear,
            "YEAR" => BarInterval::Year,
            _ => BarInterval::Invalid,
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, BarInterval::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_round_trip() {
        for interval in BarInterval::all() {
            let token = interval.table_key().expect("valid interval has a token");
            assert_eq!(BarInterval::from_table_key(token), *interval);
        }
    }

    #[test]
    fn invalid_has_no_token() {
        assert_eq!(BarInterval::Invalid.table_key(), None);
        assert!(!BarInterval::Invalid.is_valid());
        assert_eq!(BarInterval::from_table_key("FORTNIGHT"), BarInterval::Invalid);
    }
}

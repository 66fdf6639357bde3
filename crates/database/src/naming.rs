use bar_types::{BarInterval, SeriesKey};

/// Physical table identifier for one series: `<market>_<TOKEN>.<code>`
/// (schema-qualified, e.g. `SH_DAY.600000`).
///
/// This shape is part of the storage contract shared with the backing
/// schema and must match it byte for byte; changing it would require a
/// migration. Returns `None` for the invalid-interval sentinel.
pub fn table_name(key: &SeriesKey) -> Option<String> {
    let token = key.interval.table_key()?;
    Some(format!("{}_{}.{}", key.market, token, key.code))
}

/// Schema (database) name holding one market/interval family, the part left
/// of the dot in [`table_name`].
pub fn family_schema(market: &str, interval: BarInterval) -> Option<String> {
    Some(format!("{}_{}", market, interval.table_key()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_name_contract() {
        let key = SeriesKey::new("SH", "600000", BarInterval::Day);
        assert_eq!(table_name(&key).as_deref(), Some("SH_DAY.600000"));

        let key = SeriesKey::new("SZ", "000001", BarInterval::Min5);
        assert_eq!(table_name(&key).as_deref(), Some("SZ_MIN5.000001"));
    }

    #[test]
    fn invalid_interval_has_no_table() {
        let key = SeriesKey::new("SH", "600000", BarInterval::Invalid);
        assert_eq!(table_name(&key), None);
        assert_eq!(family_schema("SH", BarInterval::Invalid), None);
    }

    #[test]
    fn family_schema_is_table_name_prefix() {
        let key = SeriesKey::new("SH", "600000", BarInterval::Week);
        let table = table_name(&key).unwrap();
        let schema = family_schema("SH", BarInterval::Week).unwrap();
        assert_eq!(table, format!("{schema}.600000"));
    }
}

use bar_types::{max_store_datetime, BarInterval, BarRecord, SeriesKey};
use chrono::NaiveDateTime;
use sqlx::Row;
use tracing::{debug, warn};

use crate::decode::decode_bar;
use crate::error::{is_missing_series, Result, StoreError};
use crate::init::Connection;
use crate::naming;

const BAR_COLUMNS: &str = "date, open, high, low, close, amount, count";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Read-only driver over one MySQL-backed bar store.
///
/// Owns its pool exclusively and serves one logical caller at a time; every
/// operation is a single round trip (two, inside one transaction, for
/// date-range resolution). Positions are zero-based offsets into the
/// table's ascending `date` order; the driver keeps no index of its own.
pub struct BarStore {
    pool: Connection,
}

impl BarStore {
    pub fn new(pool: Connection) -> Self {
        Self { pool }
    }

    /// Total row count of the series. A missing table reads as an empty
    /// series: `Ok(0)`.
    pub async fn count(&self, key: &SeriesKey) -> Result<u64> {
        let table = naming::table_name(key).ok_or(StoreError::InvalidInterval)?;
        match sqlx::query_scalar::<_, i64>(&count_sql(&table))
            .fetch_one(&self.pool)
            .await
        {
            Ok(n) => Ok(n.max(0) as u64),
            Err(e) if is_missing_series(&e) => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch the records at positions `[start_ix, end_ix)` in storage order,
    /// appending each decoded record to `out`. A row that fails to decode is
    /// skipped rather than substituted, and never aborts the fetch. Returns
    /// the number of records appended.
    ///
    /// `start_ix >= end_ix` is a no-op, and positions past the end of the
    /// series simply yield fewer (or zero) records.
    pub async fn fetch_range(
        &self,
        key: &SeriesKey,
        start_ix: u64,
        end_ix: u64,
        out: &mut Vec<BarRecord>,
    ) -> Result<usize> {
        let table = naming::table_name(key).ok_or(StoreError::InvalidInterval)?;
        if start_ix >= end_ix {
            return Ok(0);
        }
        let sql = select_range_sql(&table, start_ix, end_ix - start_ix);
        let rows = match sqlx::query(&sql).fetch_all(&self.pool).await {
            Ok(rows) => rows,
            Err(e) if is_missing_series(&e) => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let mut appended = 0;
        for (i, row) in rows.iter().enumerate() {
            match decode_bar(row) {
                Ok(bar) => {
                    out.push(bar);
                    appended += 1;
                }
                Err(e) => debug!(
                    table = %table,
                    position = start_ix + i as u64,
                    error = %e,
                    "skipping undecodable bar row"
                ),
            }
        }
        Ok(appended)
    }

    /// Fetch the single record at position `pos`. `Ok(None)` when the row is
    /// absent or does not decode.
    pub async fn fetch_one(&self, key: &SeriesKey, pos: u64) -> Result<Option<BarRecord>> {
        let table = naming::table_name(key).ok_or(StoreError::InvalidInterval)?;
        let row = match sqlx::query(&select_one_sql(&table, pos))
            .fetch_optional(&self.pool)
            .await
        {
            Ok(row) => row,
            Err(e) if is_missing_series(&e) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match row {
            None => Ok(None),
            Some(row) => match decode_bar(&row) {
                Ok(bar) => Ok(Some(bar)),
                Err(e) => {
                    debug!(table = %table, position = pos, error = %e, "bar row did not decode");
                    Ok(None)
                }
            },
        }
    }

    /// Map the inclusive timestamp bounds `[start, end]` to the positional
    /// index range they cover, as `(first, last)` inclusive indexes.
    ///
    /// The store counts the rows strictly before `start` (everything
    /// excluded from below, so the first covered row sits at exactly that
    /// offset) and the rows at or before `end`, whose count minus one is
    /// the last covered index. Both counts run inside one transaction so a
    /// concurrent writer cannot tear the pair apart. `Ok(None)` means no
    /// stored row falls inside the bounds.
    pub async fn resolve_date_range(
        &self,
        key: &SeriesKey,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Option<(u64, u64)>> {
        let table = naming::table_name(key).ok_or(StoreError::InvalidInterval)?;
        if start >= end || start > max_store_datetime() {
            return Err(StoreError::InvalidDateRange { start, end });
        }

        let mut tx = self.pool.begin().await?;
        let before_start = match sqlx::query_scalar::<_, i64>(&count_before_sql(&table, start))
            .fetch_optional(&mut *tx)
            .await
        {
            Ok(v) => v,
            Err(e) if is_missing_series(&e) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        // The outer `from <table>` clause yields no row at all for an empty
        // table, which already answers the query.
        let Some(before_start) = before_start else {
            return Ok(None);
        };
        let through_end = sqlx::query_scalar::<_, i64>(&count_through_sql(&table, end))
            .fetch_optional(&mut *tx)
            .await?;
        tx.commit().await?;

        let Some(through_end) = through_end else {
            return Ok(None);
        };
        Ok(index_range(before_start, through_end))
    }

    /// Earliest and latest bar timestamps of the series, `Ok(None)` when it
    /// is empty or missing.
    pub async fn extent(&self, key: &SeriesKey) -> Result<Option<(NaiveDateTime, NaiveDateTime)>> {
        let table = naming::table_name(key).ok_or(StoreError::InvalidInterval)?;
        let row = match sqlx::query(&extent_sql(&table)).fetch_one(&self.pool).await {
            Ok(row) => row,
            Err(e) if is_missing_series(&e) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let earliest: Option<NaiveDateTime> = row.try_get(0)?;
        let latest: Option<NaiveDateTime> = row.try_get(1)?;
        Ok(earliest.zip(latest))
    }

    /// Instrument codes stored for one market/interval family, sorted. Each
    /// code is one table inside the family's schema.
    pub async fn list_codes(&self, market: &str, interval: BarInterval) -> Result<Vec<String>> {
        let schema =
            naming::family_schema(market, interval).ok_or(StoreError::InvalidInterval)?;
        let codes = sqlx::query_scalar::<_, String>(
            "select table_name from information_schema.tables \
             where table_schema = ? order by table_name",
        )
        .bind(&schema)
        .fetch_all(&self.pool)
        .await?;
        Ok(codes)
    }
}

/// Degraded accessors mirroring the legacy driver surface: every failure is
/// absorbed into the operation's empty value after a log line. Callers that
/// only check emptiness cannot distinguish "no data yet" from a fault, and
/// for the same reason keep working unchanged against a dead server.
impl BarStore {
    pub async fn count_or_zero(&self, key: &SeriesKey) -> u64 {
        self.count(key).await.unwrap_or_else(|e| {
            warn!(key = %key, error = %e, "count failed, reporting empty series");
            0
        })
    }

    pub async fn fetch_range_or_empty(
        &self,
        key: &SeriesKey,
        start_ix: u64,
        end_ix: u64,
        out: &mut Vec<BarRecord>,
    ) -> usize {
        match self.fetch_range(key, start_ix, end_ix, out).await {
            Ok(appended) => appended,
            Err(e) => {
                warn!(key = %key, error = %e, "range fetch failed, yielding no records");
                0
            }
        }
    }

    pub async fn fetch_one_or_none(&self, key: &SeriesKey, pos: u64) -> Option<BarRecord> {
        self.fetch_one(key, pos).await.unwrap_or_else(|e| {
            warn!(key = %key, position = pos, error = %e, "single fetch failed");
            None
        })
    }

    pub async fn resolve_date_range_or_none(
        &self,
        key: &SeriesKey,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Option<(u64, u64)> {
        self.resolve_date_range(key, start, end)
            .await
            .unwrap_or_else(|e| {
                warn!(key = %key, error = %e, "date range resolution failed");
                None
            })
    }
}

/// Convert the two boundary counts into an inclusive `(first, last)` index
/// pair. A zero at-or-before count means nothing satisfies the upper bound;
/// it maps to the empty range rather than wrapping past zero.
fn index_range(before_start: i64, through_end: i64) -> Option<(u64, u64)> {
    if through_end <= 0 {
        return None;
    }
    let first = before_start.max(0) as u64;
    let last = (through_end - 1) as u64;
    if first > last {
        // Every row at or before `end` also precedes `start`.
        return None;
    }
    Some((first, last))
}

fn count_sql(table: &str) -> String {
    format!("select count(1) from {table}")
}

fn select_range_sql(table: &str, offset: u64, limit: u64) -> String {
    format!("select {BAR_COLUMNS} from {table} order by date limit {offset}, {limit}")
}

fn select_one_sql(table: &str, pos: u64) -> String {
    format!("select {BAR_COLUMNS} from {table} limit {pos}, 1")
}

fn count_before_sql(table: &str, bound: NaiveDateTime) -> String {
    format!(
        "select (select count(1) from {table} where date < '{}') as rownum from {table}",
        bound.format(DATETIME_FORMAT)
    )
}

fn count_through_sql(table: &str, bound: NaiveDateTime) -> String {
    format!(
        "select (select count(1) from {table} where date <= '{}') as rownum from {table}",
        bound.format(DATETIME_FORMAT)
    )
}

fn extent_sql(table: &str) -> String {
    format!("select min(date), max(date) from {table}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn statement_shapes() {
        assert_eq!(count_sql("SH_DAY.600000"), "select count(1) from SH_DAY.600000");
        assert_eq!(
            select_range_sql("SH_DAY.600000", 3, 7),
            "select date, open, high, low, close, amount, count \
             from SH_DAY.600000 order by date limit 3, 7"
        );
        assert_eq!(
            select_one_sql("SH_DAY.600000", 42),
            "select date, open, high, low, close, amount, count from SH_DAY.600000 limit 42, 1"
        );
        assert_eq!(
            count_before_sql("SH_DAY.600000", dt(2020, 1, 3)),
            "select (select count(1) from SH_DAY.600000 where date < '2020-01-03 00:00:00') \
             as rownum from SH_DAY.600000"
        );
        assert_eq!(
            count_through_sql("SH_DAY.600000", dt(2020, 1, 5)),
            "select (select count(1) from SH_DAY.600000 where date <= '2020-01-05 00:00:00') \
             as rownum from SH_DAY.600000"
        );
    }

    #[test]
    fn index_range_correction() {
        // Ten rows, bounds covering rows 2..=4.
        assert_eq!(index_range(2, 5), Some((2, 4)));
        // Full-domain bounds on a ten-row series.
        assert_eq!(index_range(0, 10), Some((0, 9)));
        // Nothing at or before the upper bound: empty, not an underflow.
        assert_eq!(index_range(0, 0), None);
        // Every row precedes the lower bound.
        assert_eq!(index_range(10, 10), None);
        // Single covered row.
        assert_eq!(index_range(9, 10), Some((9, 9)));
    }
}

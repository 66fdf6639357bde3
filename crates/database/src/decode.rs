use bar_types::BarRecord;
use sqlx::mysql::MySqlRow;
use sqlx::Row;

/// Decode one storage row `(date, open, high, low, close, amount, count)`.
///
/// Fields decode independently and any failure rejects the whole row, so a
/// record is never partially populated. Callers fetching a range skip the
/// rejected row and keep going; the single-row fetch maps it to `None`.
pub fn decode_bar(row: &MySqlRow) -> Result<BarRecord, sqlx::Error> {
    Ok(BarRecord {
        timestamp: row.try_get(0)?,
        open: row.try_get(1)?,
        high: row.try_get(2)?,
        low: row.try_get(3)?,
        close: row.try_get(4)?,
        amount: row.try_get(5)?,
        count: row.try_get(6)?,
    })
}

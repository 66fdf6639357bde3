//! Bar store database driver.
//!
//! Exposes each (market, code, interval) series held by a MySQL backend as an
//! ordered, zero-based positional index space over one physical table, and
//! translates the two caller-facing query shapes (records in index range
//! `[start, end)`, and the index range covering a date range) into the fixed
//! SQL statements of the backing schema.
//!
//! The driver is read-only and keeps neither a cache nor an index of its
//! own; it trusts the store's native `ORDER BY date` ordering and `COUNT`
//! operator, which is what makes date-to-index resolution two counting
//! queries instead of a scan.
//!
//! Key modules:
//! - `init`: connection settings with per-field defaults and pool construction.
//! - `naming`: the `<market>_<TOKEN>.<code>` table identifier contract.
//! - `decode`: storage row to [`bar_types::BarRecord`], fallible per row.
//! - `store`: the [`store::BarStore`] driver with the query operations.
//! - `error`: typed driver errors; `Ok`-with-empty stays distinct from `Err`.

pub mod decode;
pub mod error;
pub mod init;
pub mod naming;
pub mod store;

pub use error::{Result, StoreError};
pub use init::{connect, connect_lazy, pool_from_env, Connection, StoreConfig};
pub use store::BarStore;

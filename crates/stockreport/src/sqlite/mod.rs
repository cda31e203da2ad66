use std::path::Path;

use anyhow::{Context, Result, bail};
use rusqlite::types::FromSql;
use rusqlite::{Connection, OpenFlags, Params};

pub const DATABASE_FILE_NAME: &str = "veritabani.db";
pub const STOCK_TABLE: &str = "stok";
pub const SALES_TABLE: &str = "satisGecmisi";
pub const CUSTOMERS_TABLE: &str = "musteriler";
pub const DEBTS_TABLE: &str = "borclarim";

/// Tables whose row counts are reported after a backup, in report order.
pub const COUNTED_TABLES: &[&str] = &[STOCK_TABLE, SALES_TABLE, CUSTOMERS_TABLE, DEBTS_TABLE];

/// Schema of the storefront database as the server creates it.
///
/// The reporting commands never execute this; it exists so fixtures and
/// local tooling can build a database with the same column affinities.
pub const REFERENCE_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS stok (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    barkod TEXT NOT NULL,
    ad TEXT NOT NULL,
    marka TEXT,
    miktar INTEGER DEFAULT 0,
    alisFiyati REAL DEFAULT 0,
    satisFiyati REAL DEFAULT 0,
    kategori TEXT,
    aciklama TEXT,
    varyant_id TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS musteriler (
    id TEXT PRIMARY KEY,
    ad TEXT NOT NULL,
    telefon TEXT,
    adres TEXT,
    bakiye REAL DEFAULT 0,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS satisGecmisi (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    barkod TEXT NOT NULL,
    urunAdi TEXT,
    miktar INTEGER DEFAULT 0,
    fiyat REAL DEFAULT 0,
    alisFiyati REAL DEFAULT 0,
    musteriId TEXT,
    tarih DATETIME DEFAULT CURRENT_TIMESTAMP,
    borc INTEGER DEFAULT 0,
    toplam REAL DEFAULT 0,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS borclarim (
    id TEXT PRIMARY KEY,
    musteriId TEXT NOT NULL,
    tutar REAL DEFAULT 0,
    aciklama TEXT,
    tarih DATETIME DEFAULT CURRENT_TIMESTAMP,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_stok_barkod ON stok (barkod);
CREATE INDEX IF NOT EXISTS idx_satis_tarih ON satisGecmisi (tarih);
"#;

/// Opens an existing database for reading. A missing file is an error; the
/// store is never created here.
pub fn open_read_only(path: &Path) -> Result<Connection> {
    if !path.is_file() {
        bail!("database file does not exist: {}", path.display());
    }

    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("failed to open sqlite database: {}", path.display()))
}

/// Creates the storefront tables if they are missing.
pub fn apply_reference_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(REFERENCE_SCHEMA_SQL)
        .context("failed to create reference schema")
}

/// Runs a single-row, single-column query.
pub fn query_scalar<T: FromSql, P: Params>(
    connection: &Connection,
    sql: &str,
    params: P,
    label: &str,
) -> Result<T> {
    connection
        .query_row(sql, params, |row| row.get::<usize, T>(0))
        .with_context(|| format!("failed to query {label}"))
}

pub fn count_rows(connection: &Connection, table: &str) -> Result<i64> {
    query_scalar(
        connection,
        &format!("SELECT COUNT(*) FROM \"{table}\""),
        [],
        &format!("row count of `{table}`"),
    )
}

//! Aggregate views over the storefront database.
//!
//! Every function here is read-only and takes the connection and clock it
//! should use; nothing is cached between calls.

pub mod analysis;
pub mod backup;
pub mod report;
pub mod status;

use anyhow::{Context, Result};
use rusqlite::Connection;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use analysis::{AnalysisSnapshot, TopProduct, analyze};
pub use backup::{BackupOutcome, backup_database};
pub use report::{Report, ReportData, ReportMode, generate_report};
pub use status::{DatabaseStatus, probe_database};

/// Stock at or below this quantity is reported as low.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

const LOW_STOCK_SQL: &str = r#"
SELECT barkod, ad, miktar, COALESCE(alisFiyati, 0)
FROM stok
WHERE miktar <= ?1
ORDER BY miktar ASC, barkod ASC
"#;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LowStockItem {
    pub barcode: String,
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PricedLowStockItem {
    pub barcode: String,
    pub name: String,
    pub quantity: i64,
    pub purchase_price: f64,
}

impl From<PricedLowStockItem> for LowStockItem {
    fn from(item: PricedLowStockItem) -> Self {
        Self {
            barcode: item.barcode,
            name: item.name,
            quantity: item.quantity,
        }
    }
}

pub(crate) fn low_stock(connection: &Connection) -> Result<Vec<PricedLowStockItem>> {
    let mut statement = connection
        .prepare(LOW_STOCK_SQL)
        .context("failed to prepare low stock query")?;
    let rows = statement
        .query_map([LOW_STOCK_THRESHOLD], |row| {
            Ok(PricedLowStockItem {
                barcode: row.get(0)?,
                name: row.get(1)?,
                quantity: row.get(2)?,
                purchase_price: row.get(3)?,
            })
        })
        .context("failed to execute low stock query")?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to decode low stock row")
}

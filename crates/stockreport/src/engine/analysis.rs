use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{LowStockItem, low_stock};
use crate::sqlite::{CUSTOMERS_TABLE, STOCK_TABLE, count_rows, query_scalar};
use crate::utils::time::ReportClock;

pub const TOP_PRODUCTS_LIMIT: i64 = 5;
pub const TOP_PRODUCTS_WINDOW_DAYS: i64 = 30;

const STOCK_VALUE_SQL: &str = "SELECT COALESCE(SUM(miktar * alisFiyati), 0) FROM stok";
const MONTHLY_SALES_COUNT_SQL: &str = "SELECT COUNT(*) FROM satisGecmisi WHERE tarih LIKE ?1";
const MONTHLY_REVENUE_SQL: &str =
    "SELECT COALESCE(SUM(toplam), 0) FROM satisGecmisi WHERE tarih LIKE ?1";
const TOTAL_DEBT_SQL: &str = "SELECT COALESCE(SUM(tutar), 0) FROM borclarim";

// Stock rows are collapsed per barcode so variants sharing a barcode do not
// multiply the joined sale quantities.
const TOP_PRODUCTS_SQL: &str = r#"
SELECT s.barkod, st.ad, COALESCE(SUM(s.miktar), 0) AS total_sold
FROM satisGecmisi s
JOIN (SELECT barkod, MIN(ad) AS ad FROM stok GROUP BY barkod) st
    ON s.barkod = st.barkod
WHERE s.tarih >= ?1
GROUP BY s.barkod
ORDER BY total_sold DESC, s.barkod ASC
LIMIT ?2
"#;

/// Current-state dashboard of the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisSnapshot {
    pub total_stock: i64,
    pub total_stock_value: f64,
    pub total_customers: i64,
    pub monthly_sales: i64,
    pub monthly_revenue: f64,
    pub total_debt: f64,
    pub top_products: Vec<TopProduct>,
    pub low_stock: Vec<LowStockItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TopProduct {
    pub barcode: String,
    pub name: String,
    pub total_sold: i64,
}

/// Computes every dashboard metric. Each metric is its own statement; no
/// transaction spans them.
pub fn analyze(connection: &Connection, clock: ReportClock) -> Result<AnalysisSnapshot> {
    let month_pattern = clock.month_like_pattern();
    let window_start = clock.window_start(TOP_PRODUCTS_WINDOW_DAYS)?;
    debug!(%month_pattern, %window_start, "computing analysis snapshot");

    let snapshot = AnalysisSnapshot {
        total_stock: count_rows(connection, STOCK_TABLE)?,
        total_stock_value: query_scalar(connection, STOCK_VALUE_SQL, [], "total stock value")?,
        total_customers: count_rows(connection, CUSTOMERS_TABLE)?,
        monthly_sales: query_scalar(
            connection,
            MONTHLY_SALES_COUNT_SQL,
            [&month_pattern],
            "monthly sales count",
        )?,
        monthly_revenue: query_scalar(
            connection,
            MONTHLY_REVENUE_SQL,
            [&month_pattern],
            "monthly revenue",
        )?,
        total_debt: query_scalar(connection, TOTAL_DEBT_SQL, [], "total debt")?,
        top_products: top_products_since(connection, &window_start, TOP_PRODUCTS_LIMIT)?,
        low_stock: low_stock(connection)?
            .into_iter()
            .map(LowStockItem::from)
            .collect(),
    };

    debug!(
        top_products = snapshot.top_products.len(),
        low_stock = snapshot.low_stock.len(),
        "analysis snapshot computed"
    );
    Ok(snapshot)
}

fn top_products_since(
    connection: &Connection,
    window_start: &str,
    limit: i64,
) -> Result<Vec<TopProduct>> {
    let mut statement = connection
        .prepare(TOP_PRODUCTS_SQL)
        .context("failed to prepare top products query")?;
    let rows = statement
        .query_map(params![window_start, limit], |row| {
            Ok(TopProduct {
                barcode: row.get(0)?,
                name: row.get(1)?,
                total_sold: row.get(2)?,
            })
        })
        .context("failed to execute top products query")?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to decode top products row")
}

use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use anyhow::{Context, Result};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ValueRef};
use rusqlite::{Connection, params};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{PricedLowStockItem, low_stock};
use crate::utils::time::ReportClock;

pub const REPORT_TOP_LIMIT: i64 = 10;

const MONTHLY_SALES_SQL: &str = r#"
SELECT
    COUNT(*) AS total_sales,
    COALESCE(SUM(toplam), 0) AS total_revenue,
    COALESCE(AVG(toplam), 0) AS avg_sale_amount
FROM satisGecmisi
WHERE tarih LIKE ?1
"#;

const MONTHLY_TOP_PRODUCTS_SQL: &str = r#"
SELECT
    s.barkod,
    st.ad,
    COALESCE(SUM(s.miktar), 0) AS total_sold,
    COALESCE(SUM(s.toplam), 0) AS total_revenue
FROM satisGecmisi s
JOIN (SELECT barkod, MIN(ad) AS ad FROM stok GROUP BY barkod) st
    ON s.barkod = st.barkod
WHERE s.tarih LIKE ?1
GROUP BY s.barkod
ORDER BY total_sold DESC, s.barkod ASC
LIMIT ?2
"#;

const INVENTORY_SQL: &str = r#"
SELECT
    COUNT(*) AS total_items,
    COALESCE(SUM(miktar), 0) AS total_quantity,
    COALESCE(SUM(miktar * alisFiyati), 0) AS total_value
FROM stok
"#;

const CUSTOMERS_SQL: &str = r#"
SELECT COUNT(*) AS total_customers, COALESCE(SUM(bakiye), 0) AS total_balance
FROM musteriler
"#;

const TOP_CUSTOMERS_SQL: &str = r#"
SELECT
    s.musteriId,
    MIN(m.ad) AS ad,
    COUNT(*) AS purchase_count,
    COALESCE(SUM(s.toplam), 0) AS total_spent
FROM satisGecmisi s
JOIN musteriler m ON s.musteriId = m.id
GROUP BY s.musteriId
ORDER BY total_spent DESC, s.musteriId ASC
LIMIT ?1
"#;

/// Which report to build. Unknown names are kept verbatim and produce an
/// empty report rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReportMode {
    #[default]
    Monthly,
    Inventory,
    Customers,
    Unrecognized(String),
}

impl ReportMode {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Monthly => "monthly",
            Self::Inventory => "inventory",
            Self::Customers => "customers",
            Self::Unrecognized(name) => name,
        }
    }
}

impl From<&str> for ReportMode {
    fn from(value: &str) -> Self {
        match value {
            "monthly" => Self::Monthly,
            "inventory" => Self::Inventory,
            "customers" => Self::Customers,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

impl FromStr for ReportMode {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(value))
    }
}

impl Display for ReportMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Report {
    pub report_type: String,
    pub generated_at: String,
    pub data: ReportData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ReportData {
    Monthly(MonthlyReport),
    Inventory(InventoryReport),
    Customers(CustomersReport),
    Empty(EmptyReport),
}

/// Serializes as `{}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct EmptyReport {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MonthlyReport {
    pub monthly_sales: MonthlySales,
    pub top_products: Vec<MonthlyTopProduct>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MonthlySales {
    pub total_sales: i64,
    pub total_revenue: f64,
    pub avg_sale_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MonthlyTopProduct {
    pub barcode: String,
    pub name: String,
    pub total_sold: i64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InventoryReport {
    pub inventory: InventorySummary,
    pub low_stock: Vec<PricedLowStockItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InventorySummary {
    pub total_items: i64,
    pub total_quantity: i64,
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CustomersReport {
    pub customers: CustomerSummary,
    pub top_customers: Vec<TopCustomer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CustomerSummary {
    pub total_customers: i64,
    pub total_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TopCustomer {
    pub customer_id: CustomerId,
    pub name: String,
    pub purchase_count: i64,
    pub total_spent: f64,
}

/// Customer key as stored; the server writes text ids, older rows may hold
/// integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum CustomerId {
    Integer(i64),
    Text(String),
}

impl FromSql for CustomerId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(id) => Ok(Self::Integer(id)),
            ValueRef::Text(_) => value.as_str().map(|id| Self::Text(id.to_string())),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

pub fn generate_report(
    connection: &Connection,
    mode: &ReportMode,
    clock: ReportClock,
) -> Result<Report> {
    debug!(mode = %mode, "generating report");
    let data = match mode {
        ReportMode::Monthly => ReportData::Monthly(monthly_report(connection, clock)?),
        ReportMode::Inventory => ReportData::Inventory(inventory_report(connection)?),
        ReportMode::Customers => ReportData::Customers(customers_report(connection)?),
        ReportMode::Unrecognized(_) => ReportData::Empty(EmptyReport {}),
    };

    Ok(Report {
        report_type: mode.to_string(),
        generated_at: clock.timestamp()?,
        data,
    })
}

pub fn monthly_report(connection: &Connection, clock: ReportClock) -> Result<MonthlyReport> {
    let month_pattern = clock.month_like_pattern();
    let monthly_sales = connection
        .query_row(MONTHLY_SALES_SQL, [&month_pattern], |row| {
            Ok(MonthlySales {
                total_sales: row.get(0)?,
                total_revenue: row.get(1)?,
                avg_sale_amount: row.get(2)?,
            })
        })
        .context("failed to query monthly sales")?;

    let mut statement = connection
        .prepare(MONTHLY_TOP_PRODUCTS_SQL)
        .context("failed to prepare monthly top products query")?;
    let top_products = statement
        .query_map(params![month_pattern, REPORT_TOP_LIMIT], |row| {
            Ok(MonthlyTopProduct {
                barcode: row.get(0)?,
                name: row.get(1)?,
                total_sold: row.get(2)?,
                total_revenue: row.get(3)?,
            })
        })
        .context("failed to execute monthly top products query")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to decode monthly top products row")?;

    Ok(MonthlyReport {
        monthly_sales,
        top_products,
    })
}

pub fn inventory_report(connection: &Connection) -> Result<InventoryReport> {
    let inventory = connection
        .query_row(INVENTORY_SQL, [], |row| {
            Ok(InventorySummary {
                total_items: row.get(0)?,
                total_quantity: row.get(1)?,
                total_value: row.get(2)?,
            })
        })
        .context("failed to query inventory totals")?;

    Ok(InventoryReport {
        inventory,
        low_stock: low_stock(connection)?,
    })
}

pub fn customers_report(connection: &Connection) -> Result<CustomersReport> {
    let customers = connection
        .query_row(CUSTOMERS_SQL, [], |row| {
            Ok(CustomerSummary {
                total_customers: row.get(0)?,
                total_balance: row.get(1)?,
            })
        })
        .context("failed to query customer totals")?;

    let mut statement = connection
        .prepare(TOP_CUSTOMERS_SQL)
        .context("failed to prepare top customers query")?;
    let top_customers = statement
        .query_map([REPORT_TOP_LIMIT], |row| {
            Ok(TopCustomer {
                customer_id: row.get(0)?,
                name: row.get(1)?,
                purchase_count: row.get(2)?,
                total_spent: row.get(3)?,
            })
        })
        .context("failed to execute top customers query")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to decode top customers row")?;

    Ok(CustomersReport {
        customers,
        top_customers,
    })
}

//! Cleaning and derivation pass over the combined vendor aggregate.
//!
//! Each row is transformed independently: the volume column is coerced to
//! floating point, string columns are trimmed, remaining missing values
//! become their zero equivalent, and four derived columns are computed
//! with guarded division. Every derivation is a pure function of the
//! row's already-computed columns.

use vendormetrics_shared::{CombinedRow, SummaryRow};

/// Apply the cleaning pass to every row.
pub fn clean_rows(rows: Vec<CombinedRow>) -> Vec<SummaryRow> {
    rows.into_iter().map(clean_row).collect()
}

/// Clean a single combined row and attach its derived columns.
pub fn clean_row(row: CombinedRow) -> SummaryRow {
    let gross = gross_profit(row.total_sales_dollars, row.total_purchases_dollars);

    SummaryRow {
        vendor_number: row.vendor_number,
        vendor_name: row.vendor_name.trim().to_string(),
        brand: row.brand,
        purchase_price: row.purchase_price,
        actual_selling_price: row.actual_selling_price,
        volume: parse_volume(&row.volume),
        description: row.description.trim().to_string(),
        total_purchase_quantity: row.total_purchase_quantity,
        total_purchases_dollars: row.total_purchases_dollars,
        total_sales_quantity: row.total_sales_quantity,
        total_sales_price: row.total_sales_price,
        total_sales_dollars: row.total_sales_dollars,
        total_sales_excise_tax: row.total_sales_excise_tax,
        freight_cost: row.freight_cost,
        gross_profit: gross,
        stock_turnover: stock_turnover(row.total_sales_quantity, row.total_purchase_quantity),
        profit_margin: profit_margin(gross, row.total_sales_dollars),
        sales_to_purchase_ratio: sales_to_purchase_ratio(
            row.total_sales_dollars,
            row.total_purchases_dollars,
        ),
    }
}

/// Coerce a raw volume string to f64. Unparseable or missing → 0.
fn parse_volume(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.0)
}

/// Sales dollars minus purchase dollars.
pub fn gross_profit(sales_dollars: f64, purchase_dollars: f64) -> f64 {
    sales_dollars - purchase_dollars
}

/// Units sold per unit purchased. Zero purchases → 0.
pub fn stock_turnover(units_sold: f64, units_purchased: f64) -> f64 {
    if units_purchased == 0.0 {
        0.0
    } else {
        units_sold / units_purchased
    }
}

/// Gross profit as a percentage of sales dollars. Zero sales → 0.
pub fn profit_margin(gross_profit: f64, sales_dollars: f64) -> f64 {
    if sales_dollars == 0.0 {
        0.0
    } else {
        gross_profit / sales_dollars * 100.0
    }
}

/// Sales dollars per purchase dollar. Zero purchases → 0.
pub fn sales_to_purchase_ratio(sales_dollars: f64, purchase_dollars: f64) -> f64 {
    if purchase_dollars == 0.0 {
        0.0
    } else {
        sales_dollars / purchase_dollars
    }
}

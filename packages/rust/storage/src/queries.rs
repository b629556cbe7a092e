//! Fixed SQL for the vendor summary aggregation.
//!
//! The query joins three independent sub-aggregates:
//! - `freight_cost_summary`: freight cost summed per vendor
//! - `purchase_summary`: purchases joined to list prices on brand,
//!   filtered to positive purchase prices, summed per
//!   (vendor, brand, purchase price, list price, volume, description)
//! - `sales_summary`: sales totals per (vendor, brand)
//!
//! The purchase aggregate drives the row set; sales and freight are
//! left-joined and coalesced to zero, so they only ever add columns.
//! The output order is ascending by summed purchase dollars, with tie
//! order unspecified.

/// The combined vendor summary query. Column names are part of the
/// persisted table's contract and must not be renamed.
pub(crate) const VENDOR_SUMMARY_SQL: &str = r#"
WITH freight_cost_summary AS (
    SELECT VendorNumber, SUM(Freight) AS freight_Cost
    FROM vendor_invoice
    GROUP BY VendorNumber
),
purchase_summary AS (
    SELECT
        pr.VendorNumber,
        pr.VendorName,
        pr.Brand,
        pr.PurchasePrice,
        pp.Price AS Actual_sellingPrice,
        pp.Volume,
        pp.Description,
        SUM(pr.Quantity) AS total_purchase_quantity,
        SUM(pr.Dollars) AS total_purchases_amount_in_dollars
    FROM purchases AS pr
    JOIN purchase_prices AS pp
        ON pr.Brand = pp.Brand
    WHERE pr.PurchasePrice > 0
    GROUP BY pr.VendorNumber, pr.VendorName, pr.Brand, pr.PurchasePrice,
             pp.Price, pp.Volume, pp.Description
    ORDER BY total_purchases_amount_in_dollars
),
sales_summary AS (
    SELECT
        VendorNo,
        Brand,
        SUM(SalesPrice) AS TOTAL_SALES_PRICE,
        SUM(SalesDollars) AS TOTAL_SALES_DOLLARS,
        SUM(ExciseTax) AS TOTALSALES_EXCISE_TAX,
        SUM(SalesQuantity) AS TOTAL_SALES_QUANTITY
    FROM sales
    GROUP BY VendorNo, Brand
)
SELECT
    ps.VendorNumber,
    ps.VendorName,
    ps.Brand,
    ps.PurchasePrice,
    ps.Actual_sellingPrice,
    ps.Volume,
    ps.Description,
    ps.total_purchase_quantity,
    ps.total_purchases_amount_in_dollars,
    COALESCE(ss.TOTAL_SALES_QUANTITY, 0) AS TOTAL_SALES_QUANTITY,
    COALESCE(ss.TOTAL_SALES_PRICE, 0) AS TOTAL_SALES_PRICE,
    COALESCE(ss.TOTAL_SALES_DOLLARS, 0) AS TOTAL_SALES_DOLLARS,
    COALESCE(ss.TOTALSALES_EXCISE_TAX, 0) AS TOTALSALES_EXCISE_TAX,
    COALESCE(fcs.freight_Cost, 0) AS freight_Cost
FROM purchase_summary AS ps
LEFT JOIN sales_summary AS ss
    ON ps.VendorNumber = ss.VendorNo
    AND ps.Brand = ss.Brand
LEFT JOIN freight_cost_summary AS fcs
    ON ps.VendorNumber = fcs.VendorNumber
ORDER BY ps.total_purchases_amount_in_dollars
"#;

/// Tables the summary query reads from.
pub const SOURCE_TABLES: [&str; 4] = ["purchases", "purchase_prices", "sales", "vendor_invoice"];

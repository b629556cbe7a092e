//! Core domain types for VendorMetrics.
//!
//! [`DataTable`] is the in-memory tabular structure exchanged between the
//! CSV reader and the bulk writer. [`CombinedRow`] and [`SummaryRow`] are
//! the typed rows of the vendor summary before and after the cleaning pass.

// ---------------------------------------------------------------------------
// Tabular model
// ---------------------------------------------------------------------------

/// SQL storage class a column maps to when materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
}

impl ColumnType {
    /// SQL type name used in `CREATE TABLE`.
    pub fn sql_name(self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// An in-memory table: ordered columns plus rows of cell values.
///
/// Rows are stored in source order; every row has exactly one value per
/// column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Value>>,
}

impl DataTable {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Append a row. The caller guarantees the arity matches the columns.
    pub fn push_row(&mut self, row: Vec<Value>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }
}

// ---------------------------------------------------------------------------
// Vendor summary rows
// ---------------------------------------------------------------------------

/// One row of the combined vendor aggregate, as read from the store.
///
/// Carries the purchase aggregate plus the outer-joined sales and freight
/// aggregates (unmatched columns already coalesced to zero). `volume` stays
/// raw text until the cleaning pass coerces it.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedRow {
    pub vendor_number: i64,
    pub vendor_name: String,
    pub brand: i64,
    pub purchase_price: f64,
    pub actual_selling_price: f64,
    pub volume: String,
    pub description: String,
    pub total_purchase_quantity: f64,
    pub total_purchases_dollars: f64,
    pub total_sales_quantity: f64,
    pub total_sales_price: f64,
    pub total_sales_dollars: f64,
    pub total_sales_excise_tax: f64,
    pub freight_cost: f64,
}

/// One cleaned, enriched row of the vendor sales summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub vendor_number: i64,
    pub vendor_name: String,
    pub brand: i64,
    pub purchase_price: f64,
    pub actual_selling_price: f64,
    pub volume: f64,
    pub description: String,
    pub total_purchase_quantity: f64,
    pub total_purchases_dollars: f64,
    pub total_sales_quantity: f64,
    pub total_sales_price: f64,
    pub total_sales_dollars: f64,
    pub total_sales_excise_tax: f64,
    pub freight_cost: f64,
    pub gross_profit: f64,
    pub stock_turnover: f64,
    pub profit_margin: f64,
    pub sales_to_purchase_ratio: f64,
}

impl SummaryRow {
    /// Column layout of the persisted summary table. The names and their
    /// order are fixed for compatibility with downstream consumers.
    pub fn columns() -> Vec<Column> {
        vec![
            Column::new("VendorNumber", ColumnType::Integer),
            Column::new("VendorName", ColumnType::Text),
            Column::new("Brand", ColumnType::Integer),
            Column::new("PurchasePrice", ColumnType::Real),
            Column::new("Actual_sellingPrice", ColumnType::Real),
            Column::new("Volume", ColumnType::Real),
            Column::new("Description", ColumnType::Text),
            Column::new("total_purchase_quantity", ColumnType::Real),
            Column::new("total_purchases_amount_in_dollars", ColumnType::Real),
            Column::new("TOTAL_SALES_QUANTITY", ColumnType::Real),
            Column::new("TOTAL_SALES_PRICE", ColumnType::Real),
            Column::new("TOTAL_SALES_DOLLARS", ColumnType::Real),
            Column::new("TOTALSALES_EXCISE_TAX", ColumnType::Real),
            Column::new("freight_Cost", ColumnType::Real),
            Column::new("GrossProfit", ColumnType::Real),
            Column::new("Stockturnover", ColumnType::Real),
            Column::new("ProfitMargin", ColumnType::Real),
            Column::new("SalesToPurchaseRatio", ColumnType::Real),
        ]
    }

    /// Cell values in [`SummaryRow::columns`] order.
    pub fn values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.vendor_number),
            Value::Text(self.vendor_name.clone()),
            Value::Integer(self.brand),
            Value::Real(self.purchase_price),
            Value::Real(self.actual_selling_price),
            Value::Real(self.volume),
            Value::Text(self.description.clone()),
            Value::Real(self.total_purchase_quantity),
            Value::Real(self.total_purchases_dollars),
            Value::Real(self.total_sales_quantity),
            Value::Real(self.total_sales_price),
            Value::Real(self.total_sales_dollars),
            Value::Real(self.total_sales_excise_tax),
            Value::Real(self.freight_cost),
            Value::Real(self.gross_profit),
            Value::Real(self.stock_turnover),
            Value::Real(self.profit_margin),
            Value::Real(self.sales_to_purchase_ratio),
        ]
    }

    /// Materialize a slice of rows as a [`DataTable`] ready for bulk load.
    pub fn to_table(rows: &[SummaryRow]) -> DataTable {
        let mut table = DataTable::new(Self::columns());
        for row in rows {
            table.push_row(row.values());
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_columns_match_values_arity() {
        let row = SummaryRow {
            vendor_number: 1,
            vendor_name: "Vendor".into(),
            brand: 100,
            purchase_price: 5.0,
            actual_selling_price: 8.0,
            volume: 750.0,
            description: "desc".into(),
            total_purchase_quantity: 10.0,
            total_purchases_dollars: 50.0,
            total_sales_quantity: 8.0,
            total_sales_price: 64.0,
            total_sales_dollars: 64.0,
            total_sales_excise_tax: 1.0,
            freight_cost: 2.0,
            gross_profit: 14.0,
            stock_turnover: 0.8,
            profit_margin: 21.875,
            sales_to_purchase_ratio: 1.28,
        };
        assert_eq!(SummaryRow::columns().len(), row.values().len());
    }

    #[test]
    fn summary_table_preserves_column_order() {
        let cols = SummaryRow::columns();
        assert_eq!(cols[0].name, "VendorNumber");
        assert_eq!(cols[8].name, "total_purchases_amount_in_dollars");
        assert_eq!(cols[17].name, "SalesToPurchaseRatio");
    }

    #[test]
    fn data_table_counts() {
        let mut t = DataTable::new(vec![
            Column::new("a", ColumnType::Integer),
            Column::new("b", ColumnType::Text),
        ]);
        t.push_row(vec![Value::Integer(1), Value::Text("x".into())]);
        t.push_row(vec![Value::Null, Value::Text("y".into())]);
        assert_eq!(t.column_count(), 2);
        assert_eq!(t.row_count(), 2);
    }
}

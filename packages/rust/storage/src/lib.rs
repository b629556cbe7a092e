//! libSQL storage layer for the inventory database.
//!
//! The [`Store`] struct wraps a libSQL database holding the raw source
//! tables and the derived vendor summary. One store handle is opened per
//! run and dropped when the run ends; the batch job is the sole writer.

mod queries;

use std::path::Path;

use libsql::{Connection, Database, params};
use vendormetrics_shared::{CombinedRow, DataTable, Result, Value, VendorMetricsError};

pub use queries::SOURCE_TABLES;

/// Default number of rows written per insert transaction.
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

/// Storage handle wrapping a libSQL database.
pub struct Store {
    #[allow(dead_code)]
    db: Database,
    conn: Connection,
    chunk_size: usize,
}

impl Store {
    /// Open or create a database at `path` in read-write mode.
    pub async fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| VendorMetricsError::io(parent, e))?;
            }
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| VendorMetricsError::Storage(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| VendorMetricsError::Storage(e.to_string()))?;

        Ok(Self {
            db,
            conn,
            chunk_size: DEFAULT_CHUNK_SIZE,
        })
    }

    /// Override the bulk-load chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Whether a table with the given name exists.
    pub async fn table_exists(&self, name: &str) -> Result<bool> {
        let mut rows = self
            .conn
            .query(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![name],
            )
            .await
            .map_err(|e| VendorMetricsError::Storage(e.to_string()))?;

        match rows.next().await {
            Ok(Some(_)) => Ok(true),
            Ok(None) => Ok(false),
            Err(e) => Err(VendorMetricsError::Storage(e.to_string())),
        }
    }

    /// Number of rows in a table.
    pub async fn count_rows(&self, name: &str) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(name));
        let mut rows = self
            .conn
            .query(&sql, params![])
            .await
            .map_err(|e| VendorMetricsError::Storage(e.to_string()))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let count: i64 = row
                    .get(0)
                    .map_err(|e| VendorMetricsError::Storage(e.to_string()))?;
                Ok(count as u64)
            }
            Ok(None) => Ok(0),
            Err(e) => Err(VendorMetricsError::Storage(e.to_string())),
        }
    }

    // -----------------------------------------------------------------------
    // Bulk writer
    // -----------------------------------------------------------------------

    /// Write `table` under `name`, replacing any existing table of that name.
    ///
    /// The table is dropped and recreated from the `DataTable` columns, then
    /// rows are inserted in fixed-size chunks, one transaction per chunk.
    /// The drop-and-recreate boundary is not transactional; a concurrent
    /// reader could observe a missing table mid-write.
    pub async fn replace_table(&self, name: &str, table: &DataTable) -> Result<()> {
        if table.columns.is_empty() {
            return Err(VendorMetricsError::validation(format!(
                "table '{name}' has no columns"
            )));
        }

        let ident = quote_ident(name);

        self.conn
            .execute(&format!("DROP TABLE IF EXISTS {ident}"), params![])
            .await
            .map_err(|e| VendorMetricsError::Storage(e.to_string()))?;

        let column_defs: Vec<String> = table
            .columns
            .iter()
            .map(|c| format!("{} {}", quote_ident(&c.name), c.ty.sql_name()))
            .collect();
        self.conn
            .execute(
                &format!("CREATE TABLE {ident} ({})", column_defs.join(", ")),
                params![],
            )
            .await
            .map_err(|e| VendorMetricsError::Storage(e.to_string()))?;

        let column_names: Vec<String> = table
            .columns
            .iter()
            .map(|c| quote_ident(&c.name))
            .collect();
        let placeholders: Vec<String> = (1..=table.columns.len()).map(|i| format!("?{i}")).collect();
        let insert_sql = format!(
            "INSERT INTO {ident} ({}) VALUES ({})",
            column_names.join(", "),
            placeholders.join(", ")
        );

        for chunk in table.rows.chunks(self.chunk_size) {
            let tx = self
                .conn
                .transaction()
                .await
                .map_err(|e| VendorMetricsError::Storage(e.to_string()))?;

            for row in chunk {
                let values: Vec<libsql::Value> = row.iter().map(to_libsql).collect();
                tx.execute(&insert_sql, values)
                    .await
                    .map_err(|e| VendorMetricsError::Storage(e.to_string()))?;
            }

            tx.commit()
                .await
                .map_err(|e| VendorMetricsError::Storage(e.to_string()))?;
        }

        tracing::debug!(
            table = name,
            rows = table.row_count(),
            chunk_size = self.chunk_size,
            "table replaced"
        );
        Ok(())
    }

    /// Read back every row of a table in storage order.
    pub async fn fetch_rows(&self, name: &str) -> Result<Vec<Vec<Value>>> {
        let sql = format!("SELECT * FROM {}", quote_ident(name));
        let mut rows = self
            .conn
            .query(&sql, params![])
            .await
            .map_err(|e| VendorMetricsError::Storage(e.to_string()))?;

        let width = rows.column_count();
        let mut results = Vec::new();
        loop {
            match rows.next().await {
                Ok(Some(row)) => {
                    let mut cells = Vec::with_capacity(width as usize);
                    for idx in 0..width {
                        cells.push(from_libsql(get_raw(&row, idx)?));
                    }
                    results.push(cells);
                }
                Ok(None) => break,
                Err(e) => return Err(VendorMetricsError::Storage(e.to_string())),
            }
        }
        Ok(results)
    }

    // -----------------------------------------------------------------------
    // Vendor summary query
    // -----------------------------------------------------------------------

    /// Run the combined vendor summary aggregation and decode its rows.
    ///
    /// Aggregate columns arrive with whatever affinity SQLite's SUM gave
    /// them (INTEGER for integer inputs, REAL otherwise); both decode to
    /// f64. NULL text decodes to the empty string.
    pub async fn fetch_vendor_summary(&self) -> Result<Vec<CombinedRow>> {
        let mut rows = self
            .conn
            .query(queries::VENDOR_SUMMARY_SQL, params![])
            .await
            .map_err(|e| VendorMetricsError::Storage(e.to_string()))?;

        let mut results = Vec::new();
        loop {
            match rows.next().await {
                Ok(Some(row)) => results.push(decode_combined_row(&row)?),
                Ok(None) => break,
                Err(e) => return Err(VendorMetricsError::Storage(e.to_string())),
            }
        }
        Ok(results)
    }
}

/// Convert a database row to a [`CombinedRow`].
fn decode_combined_row(row: &libsql::Row) -> Result<CombinedRow> {
    Ok(CombinedRow {
        vendor_number: get_i64(row, 0)?,
        vendor_name: get_text(row, 1)?,
        brand: get_i64(row, 2)?,
        purchase_price: get_f64(row, 3)?,
        actual_selling_price: get_f64(row, 4)?,
        volume: get_text(row, 5)?,
        description: get_text(row, 6)?,
        total_purchase_quantity: get_f64(row, 7)?,
        total_purchases_dollars: get_f64(row, 8)?,
        total_sales_quantity: get_f64(row, 9)?,
        total_sales_price: get_f64(row, 10)?,
        total_sales_dollars: get_f64(row, 11)?,
        total_sales_excise_tax: get_f64(row, 12)?,
        freight_cost: get_f64(row, 13)?,
    })
}

fn get_raw(row: &libsql::Row, idx: i32) -> Result<libsql::Value> {
    row.get_value(idx)
        .map_err(|e| VendorMetricsError::Storage(format!("column {idx}: {e}")))
}

/// Numeric column: accepts INTEGER or REAL affinity, NULL decodes to 0.
fn get_f64(row: &libsql::Row, idx: i32) -> Result<f64> {
    Ok(match get_raw(row, idx)? {
        libsql::Value::Integer(i) => i as f64,
        libsql::Value::Real(f) => f,
        libsql::Value::Text(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

/// Key column: accepts INTEGER affinity or numeric text, NULL decodes to 0.
fn get_i64(row: &libsql::Row, idx: i32) -> Result<i64> {
    Ok(match get_raw(row, idx)? {
        libsql::Value::Integer(i) => i,
        libsql::Value::Real(f) => f as i64,
        libsql::Value::Text(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Text column: NULL decodes to the empty string.
fn get_text(row: &libsql::Row, idx: i32) -> Result<String> {
    Ok(match get_raw(row, idx)? {
        libsql::Value::Text(s) => s,
        libsql::Value::Integer(i) => i.to_string(),
        libsql::Value::Real(f) => f.to_string(),
        _ => String::new(),
    })
}

/// Double-quote escape an SQL identifier.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn to_libsql(value: &Value) -> libsql::Value {
    match value {
        Value::Null => libsql::Value::Null,
        Value::Integer(i) => libsql::Value::Integer(*i),
        Value::Real(f) => libsql::Value::Real(*f),
        Value::Text(s) => libsql::Value::Text(s.clone()),
    }
}

fn from_libsql(value: libsql::Value) -> Value {
    match value {
        libsql::Value::Null | libsql::Value::Blob(_) => Value::Null,
        libsql::Value::Integer(i) => Value::Integer(i),
        libsql::Value::Real(f) => Value::Real(f),
        libsql::Value::Text(s) => Value::Text(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vendormetrics_shared::{Column, ColumnType};

    /// Create a store on a fresh temp database for testing.
    async fn test_store() -> (Store, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = Store::open(&dir.path().join("test.db"))
            .await
            .expect("open test db");
        (store, dir)
    }

    fn two_col_table(rows: &[(i64, &str)]) -> DataTable {
        let mut table = DataTable::new(vec![
            Column::new("id", ColumnType::Integer),
            Column::new("name", ColumnType::Text),
        ]);
        for (id, name) in rows {
            table.push_row(vec![Value::Integer(*id), Value::Text((*name).into())]);
        }
        table
    }

    #[tokio::test]
    async fn replace_table_roundtrip() {
        let (store, _dir) = test_store().await;
        let table = two_col_table(&[(1, "a"), (2, "b"), (3, "c")]);

        store.replace_table("items", &table).await.expect("write");
        assert!(store.table_exists("items").await.unwrap());
        assert_eq!(store.count_rows("items").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn replace_table_replaces_existing() {
        let (store, _dir) = test_store().await;
        store
            .replace_table("items", &two_col_table(&[(1, "a"), (2, "b")]))
            .await
            .unwrap();
        store
            .replace_table("items", &two_col_table(&[(9, "z")]))
            .await
            .unwrap();
        assert_eq!(store.count_rows("items").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn chunked_insert_loads_all_rows() {
        let (store, _dir) = test_store().await;
        let store = store.with_chunk_size(10);

        let rows: Vec<(i64, String)> = (0..25).map(|i| (i, format!("row{i}"))).collect();
        let mut table = DataTable::new(vec![
            Column::new("id", ColumnType::Integer),
            Column::new("name", ColumnType::Text),
        ]);
        for (id, name) in &rows {
            table.push_row(vec![Value::Integer(*id), Value::Text(name.clone())]);
        }

        store.replace_table("big", &table).await.expect("write");
        assert_eq!(store.count_rows("big").await.unwrap(), 25);
    }

    #[tokio::test]
    async fn missing_table_does_not_exist() {
        let (store, _dir) = test_store().await;
        assert!(!store.table_exists("nope").await.unwrap());
    }

    #[tokio::test]
    async fn empty_table_is_rejected() {
        let (store, _dir) = test_store().await;
        let result = store.replace_table("empty", &DataTable::default()).await;
        assert!(result.is_err());
    }

    // -----------------------------------------------------------------------
    // Vendor summary query
    // -----------------------------------------------------------------------

    async fn seed_source_tables(store: &Store) {
        // purchases: vendor 1 buys brand 100 in two lots; vendor 2 buys
        // brand 200 once; one zero-price row that must be filtered out.
        let mut purchases = DataTable::new(vec![
            Column::new("VendorNumber", ColumnType::Integer),
            Column::new("VendorName", ColumnType::Text),
            Column::new("Brand", ColumnType::Integer),
            Column::new("PurchasePrice", ColumnType::Real),
            Column::new("Quantity", ColumnType::Integer),
            Column::new("Dollars", ColumnType::Real),
        ]);
        for (vn, name, brand, price, qty, dollars) in [
            (1, "Acme Spirits ", 100, 5.0, 6, 300.0),
            (1, "Acme Spirits ", 100, 5.0, 4, 200.0),
            (2, "Bravo Wines", 200, 10.0, 5, 800.0),
            (2, "Bravo Wines", 200, 0.0, 1, 0.0),
        ] {
            purchases.push_row(vec![
                Value::Integer(vn),
                Value::Text(name.into()),
                Value::Integer(brand),
                Value::Real(price),
                Value::Integer(qty),
                Value::Real(dollars),
            ]);
        }
        store.replace_table("purchases", &purchases).await.unwrap();

        let mut prices = DataTable::new(vec![
            Column::new("Brand", ColumnType::Integer),
            Column::new("Price", ColumnType::Real),
            Column::new("Volume", ColumnType::Text),
            Column::new("Description", ColumnType::Text),
        ]);
        for (brand, price, volume, desc) in [
            (100, 8.0, "750 ", " Rye Whiskey "),
            (200, 15.0, "1000", "Dry Vermouth"),
        ] {
            prices.push_row(vec![
                Value::Integer(brand),
                Value::Real(price),
                Value::Text(volume.into()),
                Value::Text(desc.into()),
            ]);
        }
        store.replace_table("purchase_prices", &prices).await.unwrap();

        // sales: only vendor 1 / brand 100 has sales.
        let mut sales = DataTable::new(vec![
            Column::new("VendorNo", ColumnType::Integer),
            Column::new("Brand", ColumnType::Integer),
            Column::new("SalesPrice", ColumnType::Real),
            Column::new("SalesDollars", ColumnType::Real),
            Column::new("ExciseTax", ColumnType::Real),
            Column::new("SalesQuantity", ColumnType::Integer),
        ]);
        for (vn, brand, price, dollars, tax, qty) in [
            (1, 100, 8.0, 400.0, 2.5, 5),
            (1, 100, 8.0, 350.0, 1.5, 3),
        ] {
            sales.push_row(vec![
                Value::Integer(vn),
                Value::Integer(brand),
                Value::Real(price),
                Value::Real(dollars),
                Value::Real(tax),
                Value::Integer(qty),
            ]);
        }
        store.replace_table("sales", &sales).await.unwrap();

        // vendor_invoice: freight only for vendor 1.
        let mut invoices = DataTable::new(vec![
            Column::new("VendorNumber", ColumnType::Integer),
            Column::new("Freight", ColumnType::Real),
        ]);
        for (vn, freight) in [(1, 20.0), (1, 5.0)] {
            invoices.push_row(vec![Value::Integer(vn), Value::Real(freight)]);
        }
        store.replace_table("vendor_invoice", &invoices).await.unwrap();
    }

    #[tokio::test]
    async fn vendor_summary_aggregates_and_joins() {
        let (store, _dir) = test_store().await;
        seed_source_tables(&store).await;

        let rows = store.fetch_vendor_summary().await.expect("summary");

        // One row per purchase-aggregate group; the zero-price lot is gone.
        assert_eq!(rows.len(), 2);

        // Ascending by summed purchase dollars: vendor 1 (500) before vendor 2 (800).
        assert_eq!(rows[0].vendor_number, 1);
        assert_eq!(rows[1].vendor_number, 2);

        let acme = &rows[0];
        assert_eq!(acme.brand, 100);
        assert_eq!(acme.total_purchase_quantity, 10.0);
        assert_eq!(acme.total_purchases_dollars, 500.0);
        assert_eq!(acme.total_sales_quantity, 8.0);
        assert_eq!(acme.total_sales_dollars, 750.0);
        assert_eq!(acme.total_sales_excise_tax, 4.0);
        assert_eq!(acme.freight_cost, 25.0);
        assert_eq!(acme.actual_selling_price, 8.0);
        assert_eq!(acme.volume, "750 ");

        // Vendor 2 has no sales and no freight: coalesced to zero, row kept.
        let bravo = &rows[1];
        assert_eq!(bravo.total_sales_quantity, 0.0);
        assert_eq!(bravo.total_sales_dollars, 0.0);
        assert_eq!(bravo.total_sales_price, 0.0);
        assert_eq!(bravo.total_sales_excise_tax, 0.0);
        assert_eq!(bravo.freight_cost, 0.0);
        assert_eq!(bravo.total_purchases_dollars, 800.0);
    }

    #[tokio::test]
    async fn vendor_summary_is_deterministic() {
        let (store, _dir) = test_store().await;
        seed_source_tables(&store).await;

        let first = store.fetch_vendor_summary().await.unwrap();
        let second = store.fetch_vendor_summary().await.unwrap();
        assert_eq!(first, second);
    }
}

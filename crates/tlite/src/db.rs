//! Engine layer: one function per user-facing operation, each a single SQL
//! statement executed on tokio-rusqlite's background thread.
//!
//! Table and column names are interpolated into the statement text without
//! quoting; values are always bound parameters. Rows are addressed by the
//! first column of the table, whatever it happens to be -- `load_table`
//! reports whether that column is the declared primary key so the caller
//! can surface a warning when it is not.

use std::path::PathBuf;

use tokio_rusqlite::rusqlite::{self, params, params_from_iter, types::Value};
use tokio_rusqlite::{Connection, Result};

use crate::util::{default_value_for_decl_type, value_to_display};

/// One column from `PRAGMA table_info`.
#[derive(Debug, Clone)]
pub struct ColumnSchema {
    pub name: String,
    /// Declared type as written in the CREATE TABLE, empty if omitted.
    pub decl_type: String,
    /// Whether the column is part of the declared primary key.
    pub is_pk: bool,
}

/// A fully fetched table: column names plus every row coerced to display
/// text.
#[derive(Debug, Clone)]
pub struct TableData {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Whether column 0 -- the column used to address rows for update and
    /// delete -- is the table's declared primary key.
    pub key_column_is_pk: bool,
}

/// Create an empty database file at `path` and release it immediately.
/// The file is not opened for editing.
pub async fn create_database(path: PathBuf) -> Result<()> {
    let conn = Connection::open(path).await?;
    conn.close().await
}

/// Open a database file for editing.
pub async fn open_database(path: PathBuf) -> Result<Connection> {
    Ok(Connection::open(path).await?)
}

/// List user tables from the engine catalog, in whatever order the engine
/// returns them.
pub async fn list_tables(conn: &Connection) -> Result<Vec<String>> {
    conn.call(|conn| {
        let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    })
    .await
}

/// Fetch an entire table: `SELECT * FROM <table>`, every value coerced to
/// display text with `null_text` standing in for NULL.
pub async fn load_table(conn: &Connection, table: String, null_text: String) -> Result<TableData> {
    conn.call(move |conn| {
        let sql = format!("SELECT * FROM {table}");
        let mut stmt = conn.prepare(&sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let col_count = columns.len();

        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut fetched = stmt.query([])?;
        while let Some(row) = fetched.next()? {
            let mut cells = Vec::with_capacity(col_count);
            for i in 0..col_count {
                cells.push(value_to_display(row.get_ref(i)?, &null_text));
            }
            rows.push(cells);
        }
        drop(fetched);
        drop(stmt);

        let schema = read_table_columns(conn, &table)?;
        let key_column_is_pk = schema.first().map(|c| c.is_pk).unwrap_or(false);

        Ok(TableData {
            name: table,
            columns,
            rows,
            key_column_is_pk,
        })
    })
    .await
}

/// Read per-column schema (name, declared type, pk flag) for a table.
pub async fn table_columns(conn: &Connection, table: String) -> Result<Vec<ColumnSchema>> {
    conn.call(move |conn| Ok(read_table_columns(conn, &table)?))
        .await
}

/// Write one cell: `UPDATE <table> SET <column> = ?1 WHERE <key_column> = ?2`.
/// Both the new value and the key are bound as text. Returns the number of
/// rows the engine reports as changed.
pub async fn update_cell(
    conn: &Connection,
    table: String,
    column: String,
    key_column: String,
    key: String,
    value: String,
) -> Result<usize> {
    conn.call(move |conn| {
        let sql = format!("UPDATE {table} SET {column} = ?1 WHERE {key_column} = ?2");
        Ok(conn.execute(&sql, params![value, key])?)
    })
    .await
}

/// Insert a row of synthesized defaults.
///
/// Columns literally named "id" (case-insensitive) are skipped on the
/// assumption they auto-increment; the statement is
/// `INSERT INTO <table> VALUES (NULL, ...)` with one placeholder per
/// remaining column, so the skipped id must be the first column. Tables
/// that break either assumption get the engine's arity error back.
pub async fn insert_row(conn: &Connection, table: String) -> Result<()> {
    conn.call(move |conn| {
        let schema = read_table_columns(conn, &table)?;
        let values: Vec<Value> = schema
            .iter()
            .filter(|c| !c.name.eq_ignore_ascii_case("id"))
            .map(|c| default_value_for_decl_type(&c.decl_type))
            .collect();

        let placeholders = vec!["?"; schema.len().saturating_sub(1)].join(", ");
        let sql = format!("INSERT INTO {table} VALUES (NULL, {placeholders})");
        conn.execute(&sql, params_from_iter(values))?;
        Ok(())
    })
    .await
}

/// Delete the row whose key column equals `key`:
/// `DELETE FROM <table> WHERE <key_column> = ?1`. Returns the number of
/// rows the engine reports as deleted.
pub async fn delete_row(
    conn: &Connection,
    table: String,
    key_column: String,
    key: String,
) -> Result<usize> {
    conn.call(move |conn| {
        let sql = format!("DELETE FROM {table} WHERE {key_column} = ?1");
        Ok(conn.execute(&sql, params![key])?)
    })
    .await
}

/// Create a table from a raw column-definition string:
/// `CREATE TABLE <name> (<columns>)`. No validation; the engine's parser
/// is the only gatekeeper.
pub async fn create_table(conn: &Connection, name: String, columns: String) -> Result<()> {
    conn.call(move |conn| {
        let sql = format!("CREATE TABLE {name} ({columns})");
        conn.execute(&sql, [])?;
        Ok(())
    })
    .await
}

fn read_table_columns(
    conn: &rusqlite::Connection,
    table: &str,
) -> rusqlite::Result<Vec<ColumnSchema>> {
    let sql = format!("PRAGMA table_info({table})");
    let mut stmt = conn.prepare(&sql)?;
    // table_info columns: cid, name, type, notnull, dflt_value, pk
    let columns = stmt
        .query_map([], |row| {
            Ok(ColumnSchema {
                name: row.get(1)?,
                decl_type: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                is_pk: row.get::<_, i64>(5)? != 0,
            })
        })?
        .collect();
    columns
}

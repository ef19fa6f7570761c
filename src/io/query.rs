//! Ad-hoc read access to a node database, emitted as CSV.
//!
//! This is a pass-through executor: it runs whatever SQL it is handed and
//! prints the result rows, with the column names as a header line.

use crate::cli::output::write_csv_record;
use crate::services::store::sqlite::configure_connection;
use crate::{Error, Result};
use rusqlite::types::ValueRef;
use rusqlite::{Batch, Connection, Statement};
use std::io::Write;
use std::path::Path;

/// Open a database for querying.
pub fn open_database<P: AsRef<Path>>(path: P, foreign_keys: bool) -> Result<Connection> {
    let conn = Connection::open(path)?;
    configure_connection(&conn, foreign_keys)?;
    Ok(conn)
}

/// Run a single statement, binding `params` to its placeholders as text.
///
/// The header line is written whenever the statement yields columns, even if
/// no row follows. Returns the number of rows written.
pub fn run_statement<W: Write + ?Sized>(
    conn: &Connection,
    sql: &str,
    params: &[String],
    out: &mut W,
) -> Result<u64> {
    let mut stmt = conn.prepare(sql)?;

    let expected = stmt.parameter_count();
    if params.len() > expected {
        return Err(Error::InvalidInput(format!(
            "statement takes {expected} parameter(s) but {} were given",
            params.len()
        )));
    }
    for (idx, value) in params.iter().enumerate() {
        stmt.raw_bind_parameter(idx + 1, value.as_str())?;
    }

    let mut header_written = false;
    if stmt.column_count() > 0 {
        write_header(&stmt, out)?;
        header_written = true;
    }

    emit_rows(&mut stmt, &mut header_written, out)
}

/// Run every statement in `script` in order.
///
/// The header line is written once, before the first result row of the whole
/// script. Returns the number of rows written.
pub fn run_script<W: Write + ?Sized>(conn: &Connection, script: &str, out: &mut W) -> Result<u64> {
    let mut batch = Batch::new(conn, script);
    let mut header_written = false;
    let mut rows = 0u64;

    while let Some(mut stmt) = batch.next()? {
        rows += emit_rows(&mut stmt, &mut header_written, out)?;
    }

    Ok(rows)
}

fn write_header<W: Write + ?Sized>(stmt: &Statement<'_>, out: &mut W) -> Result<()> {
    write_csv_record(out, stmt.column_names())?;
    Ok(())
}

fn emit_rows<W: Write + ?Sized>(
    stmt: &mut Statement<'_>,
    header_written: &mut bool,
    out: &mut W,
) -> Result<u64> {
    let column_count = stmt.column_count();
    let names: Vec<String> = stmt.column_names().into_iter().map(str::to_string).collect();

    let mut rows = stmt.raw_query();
    let mut written = 0u64;
    let mut fields = Vec::with_capacity(column_count);

    while let Some(row) = rows.next()? {
        if !*header_written {
            write_csv_record(out, &names)?;
            *header_written = true;
        }

        fields.clear();
        for idx in 0..column_count {
            fields.push(render_value(row.get_ref(idx)?));
        }
        write_csv_record(out, &fields)?;
        written += 1;
    }

    Ok(written)
}

/// Render one SQLite value as CSV text; blobs become lowercase hex.
#[must_use]
pub fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        ValueRef::Blob(bytes) => hex::encode(bytes),
    }
}

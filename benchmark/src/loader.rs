use std::num::NonZeroUsize;

use scylla::client::session::Session;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::Error,
    row::SampleRow,
    schema::{Schema, Statements},
};

/// Empties the table, then inserts `rows` random rows one statement at a
/// time. Returns the inserted ids in insertion order.
///
/// A failed insert aborts the load; rows inserted before it stay.
pub(crate) async fn load(
    session: &Session,
    schema: &Schema,
    statements: &Statements,
    rows: NonZeroUsize,
) -> Result<Vec<Uuid>, Error> {
    let rows = rows.get();
    session
        .query_unpaged(schema.truncate_cql(), ())
        .await
        .map_err(|source| Error::Schema {
            what: "truncate table",
            source,
        })?;

    let start = std::time::Instant::now();
    let mut ids = Vec::with_capacity(rows);
    for i in 0..rows {
        let row = SampleRow::random();
        session.execute_unpaged(&statements.insert, &row).await?;
        ids.push(row.id);
        // a log line per row would scroll the terminal away
        eprint!("\rLoad test data ({}/{rows})...", i + 1);
    }
    eprintln!();
    info!(
        rows,
        elapsed_secs = start.elapsed().as_secs_f64(),
        "loaded {rows} rows of test data"
    );
    Ok(ids)
}

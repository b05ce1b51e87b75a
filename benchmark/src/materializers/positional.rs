use scylla::response::query_result::QueryRowsResult;

use crate::error::Error;

use super::{untyped_rows, MaterializationKind, Materialized, Materializer};

pub(crate) struct MaterializerPositional {}

impl Materializer for MaterializerPositional {
    fn kind(&self) -> MaterializationKind {
        MaterializationKind::Positional
    }

    fn materialize(&self, rows: QueryRowsResult) -> Result<Materialized, Error> {
        Ok(Materialized::Positional(untyped_rows(&rows)?))
    }
}

use scylla::response::query_result::QueryRowsResult;

use crate::error::Error;

use super::{keyed_rows, MaterializationKind, Materialized, Materializer};

pub(crate) struct MaterializerOrderedMap {}

impl Materializer for MaterializerOrderedMap {
    fn kind(&self) -> MaterializationKind {
        MaterializationKind::OrderedMap
    }

    fn materialize(&self, rows: QueryRowsResult) -> Result<Materialized, Error> {
        Ok(Materialized::OrderedMap(keyed_rows(&rows)?))
    }
}

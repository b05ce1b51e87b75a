use scylla::response::query_result::QueryRowsResult;

use crate::error::Error;

use super::{keyed_rows, MaterializationKind, Materialized, Materializer};

pub(crate) struct MaterializerUnorderedMap {}

impl Materializer for MaterializerUnorderedMap {
    fn kind(&self) -> MaterializationKind {
        MaterializationKind::UnorderedMap
    }

    fn materialize(&self, rows: QueryRowsResult) -> Result<Materialized, Error> {
        Ok(Materialized::UnorderedMap(keyed_rows(&rows)?))
    }
}

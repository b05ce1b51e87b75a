use scylla::response::query_result::QueryRowsResult;

use crate::{error::Error, row::SampleRow};

use super::{MaterializationKind, Materialized, Materializer};

pub(crate) struct MaterializerNamedFields {}

impl Materializer for MaterializerNamedFields {
    fn kind(&self) -> MaterializationKind {
        MaterializationKind::NamedFields
    }

    fn materialize(&self, rows: QueryRowsResult) -> Result<Materialized, Error> {
        // type-checks the result metadata against the struct's fields first
        let rows = rows
            .rows::<SampleRow>()
            .map_err(Error::decode)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(Error::decode)?;
        Ok(Materialized::NamedFields(rows))
    }
}

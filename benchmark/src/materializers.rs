//! Ways of turning a lookup's result set into in-memory rows.
//!
//! Every strategy decodes the same columns; they differ only in the shape
//! they produce and what that costs. A [`Materializer`] is passed to each
//! lookup explicitly, nothing about it is stored on the session.

use std::collections::HashMap;

use indexmap::IndexMap;
use scylla::{
    response::query_result::QueryRowsResult,
    value::{CqlValue, Row},
};

use crate::{error::Error, row::SampleRow};

pub(crate) mod named_fields;
pub(crate) mod ordered_map;
pub(crate) mod positional;
pub(crate) mod unordered_map;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum MaterializationKind {
    /// Untyped column values in column order.
    Positional,
    /// A struct with one field per column.
    NamedFields,
    /// Column name to value, hashed.
    UnorderedMap,
    /// Column name to value, in result column order.
    OrderedMap,
}

impl MaterializationKind {
    pub(crate) const ALL: [MaterializationKind; 4] = [
        MaterializationKind::Positional,
        MaterializationKind::NamedFields,
        MaterializationKind::UnorderedMap,
        MaterializationKind::OrderedMap,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            MaterializationKind::Positional => "positional",
            MaterializationKind::NamedFields => "named-fields",
            MaterializationKind::OrderedMap => "ordered-map",
            MaterializationKind::UnorderedMap => "unordered-map",
        }
    }
}

impl std::fmt::Display for MaterializationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Decoded rows of one result set.
#[derive(Debug)]
pub(crate) enum Materialized {
    Positional(Vec<Row>),
    NamedFields(Vec<SampleRow>),
    UnorderedMap(Vec<HashMap<String, Option<CqlValue>>>),
    OrderedMap(Vec<IndexMap<String, Option<CqlValue>>>),
}

impl Materialized {
    pub(crate) fn len(&self) -> usize {
        match self {
            Materialized::Positional(rows) => rows.len(),
            Materialized::NamedFields(rows) => rows.len(),
            Materialized::OrderedMap(rows) => rows.len(),
            Materialized::UnorderedMap(rows) => rows.len(),
        }
    }
}

pub(crate) trait Materializer {
    fn kind(&self) -> MaterializationKind;
    fn materialize(&self, rows: QueryRowsResult) -> Result<Materialized, Error>;
}

pub(crate) fn setup_materializer(kind: MaterializationKind) -> Box<dyn Materializer> {
    match kind {
        MaterializationKind::Positional => Box::new(positional::MaterializerPositional {}),
        MaterializationKind::NamedFields => Box::new(named_fields::MaterializerNamedFields {}),
        MaterializationKind::OrderedMap => Box::new(ordered_map::MaterializerOrderedMap {}),
        MaterializationKind::UnorderedMap => Box::new(unordered_map::MaterializerUnorderedMap {}),
    }
}

/// Decodes untyped rows. Shared by the positional and map strategies.
pub(crate) fn untyped_rows(rows: &QueryRowsResult) -> Result<Vec<Row>, Error> {
    rows.rows::<Row>()
        .map_err(Error::decode)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::decode)
}

/// Decodes every row into a map keyed by column name.
pub(crate) fn keyed_rows<M>(rows: &QueryRowsResult) -> Result<Vec<M>, Error>
where
    M: FromIterator<(String, Option<CqlValue>)>,
{
    let names = rows
        .column_specs()
        .iter()
        .map(|spec| spec.name().to_owned())
        .collect::<Vec<_>>();
    Ok(untyped_rows(rows)?
        .into_iter()
        .map(|row| key_by_name(&names, row))
        .collect())
}

pub(crate) fn key_by_name<M>(names: &[String], row: Row) -> M
where
    M: FromIterator<(String, Option<CqlValue>)>,
{
    debug_assert_eq!(names.len(), row.columns.len());
    names.iter().cloned().zip(row.columns).collect()
}

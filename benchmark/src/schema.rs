use std::num::NonZeroU32;

use itertools::Itertools;
use scylla::{client::session::Session, statement::prepared::PreparedStatement};
use tracing::info;

use crate::{error::Error, ident::CqlIdent};

/// Number of free-text columns next to the `id` primary key.
pub(crate) const TEXT_COLUMNS: usize = 9;

/// Where the benchmark keeps its rows.
#[derive(Debug, Clone)]
pub(crate) struct Schema {
    pub(crate) keyspace: CqlIdent,
    pub(crate) table: CqlIdent,
    pub(crate) replication_factor: NonZeroU32,
}

/// Statements that carry row values, prepared once per session.
pub(crate) struct Statements {
    pub(crate) insert: PreparedStatement,
    pub(crate) select_by_id: PreparedStatement,
}

fn text_column_names() -> impl Iterator<Item = String> {
    (1..=TEXT_COLUMNS).map(|i| format!("col{i}"))
}

impl Schema {
    fn qualified_table(&self) -> String {
        format!("{}.{}", self.keyspace, self.table)
    }

    fn create_keyspace_cql(&self) -> String {
        format!(
            "CREATE KEYSPACE IF NOT EXISTS {} WITH REPLICATION = \
             {{'class': 'SimpleStrategy', 'replication_factor': {}}}",
            self.keyspace, self.replication_factor
        )
    }

    fn create_table_cql(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (id uuid, {}, PRIMARY KEY (id))",
            self.qualified_table(),
            text_column_names().map(|c| format!("{c} text")).join(", ")
        )
    }

    pub(crate) fn truncate_cql(&self) -> String {
        format!("TRUNCATE {}", self.qualified_table())
    }

    fn insert_cql(&self) -> String {
        let columns = std::iter::once("id".to_owned())
            .chain(text_column_names())
            .collect::<Vec<_>>();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.qualified_table(),
            columns.iter().join(", "),
            columns.iter().map(|_| "?").join(", ")
        )
    }

    fn select_by_id_cql(&self) -> String {
        format!("SELECT * FROM {} WHERE id = ?", self.qualified_table())
    }

    /// Creates the keyspace and table if they are missing and makes the
    /// keyspace the session's current one. Safe to repeat.
    pub(crate) async fn ensure(&self, session: &Session) -> Result<(), Error> {
        info!(keyspace = %self.keyspace, table = %self.table, "preparing schema");
        session
            .query_unpaged(self.create_keyspace_cql(), ())
            .await
            .map_err(|source| Error::Schema {
                what: "create keyspace",
                source,
            })?;
        session
            .use_keyspace(self.keyspace.as_str(), false)
            .await
            .map_err(|e| Error::UseKeyspace(self.keyspace.clone(), e))?;
        session
            .query_unpaged(self.create_table_cql(), ())
            .await
            .map_err(|source| Error::Schema {
                what: "create table",
                source,
            })?;
        Ok(())
    }

    pub(crate) async fn prepare_statements(&self, session: &Session) -> Result<Statements, Error> {
        Ok(Statements {
            insert: session.prepare(self.insert_cql()).await?,
            select_by_id: session.prepare(self.select_by_id_cql()).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema {
            keyspace: "row_factory_test".parse().unwrap(),
            table: "sample_data".parse().unwrap(),
            replication_factor: NonZeroU32::new(1).unwrap(),
        }
    }

    #[test]
    fn keyspace_uses_simple_strategy() {
        assert_eq!(
            schema().create_keyspace_cql(),
            "CREATE KEYSPACE IF NOT EXISTS row_factory_test WITH REPLICATION = \
             {'class': 'SimpleStrategy', 'replication_factor': 1}"
        );
    }

    #[test]
    fn table_has_id_key_and_nine_text_columns() {
        let cql = schema().create_table_cql();
        assert!(cql.starts_with("CREATE TABLE IF NOT EXISTS row_factory_test.sample_data (id uuid, col1 text, "));
        assert!(cql.ends_with("col9 text, PRIMARY KEY (id))"), "{cql}");
        assert_eq!(cql.matches(" text").count(), TEXT_COLUMNS);
    }

    #[test]
    fn row_statements_bind_every_value() {
        let s = schema();
        let insert = s.insert_cql();
        assert_eq!(insert.matches('?').count(), 1 + TEXT_COLUMNS);
        assert!(insert.starts_with("INSERT INTO row_factory_test.sample_data (id, col1, col2,"));
        assert_eq!(
            s.select_by_id_cql(),
            "SELECT * FROM row_factory_test.sample_data WHERE id = ?"
        );
        assert_eq!(s.truncate_cql(), "TRUNCATE row_factory_test.sample_data");
    }
}

use scylla::{DeserializeRow, SerializeRow};
use uuid::Uuid;

/// One row of the benchmark table, with fields matched to columns by name.
///
/// Inserts bind it directly; the named-fields materializer decodes into it.
#[derive(Debug, Clone, PartialEq, Eq, DeserializeRow, SerializeRow)]
pub(crate) struct SampleRow {
    pub(crate) id: Uuid,
    pub(crate) col1: Option<String>,
    pub(crate) col2: Option<String>,
    pub(crate) col3: Option<String>,
    pub(crate) col4: Option<String>,
    pub(crate) col5: Option<String>,
    pub(crate) col6: Option<String>,
    pub(crate) col7: Option<String>,
    pub(crate) col8: Option<String>,
    pub(crate) col9: Option<String>,
}

fn random_text() -> Option<String> {
    Some(Uuid::new_v4().simple().to_string())
}

impl SampleRow {
    /// A fresh v4 id and nine 32-char hex payloads.
    pub(crate) fn random() -> Self {
        SampleRow {
            id: Uuid::new_v4(),
            col1: random_text(),
            col2: random_text(),
            col3: random_text(),
            col4: random_text(),
            col5: random_text(),
            col6: random_text(),
            col7: random_text(),
            col8: random_text(),
            col9: random_text(),
        }
    }

    pub(crate) fn text_columns(&self) -> [Option<&str>; crate::schema::TEXT_COLUMNS] {
        [
            &self.col1, &self.col2, &self.col3, &self.col4, &self.col5, &self.col6, &self.col7,
            &self.col8, &self.col9,
        ]
        .map(|c| c.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_rows_fill_every_column() {
        let row = SampleRow::random();
        assert_eq!(row.id.get_version_num(), 4);
        for text in row.text_columns() {
            let text = text.expect("random rows have no nulls");
            assert_eq!(text.len(), 32);
            assert!(text.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn random_rows_are_independent() {
        let a = SampleRow::random();
        let b = SampleRow::random();
        assert_ne!(a.id, b.id);
        assert_ne!(a.col1, a.col2);
        assert_ne!(a.col1, b.col1);
    }
}

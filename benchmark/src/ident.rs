//! Keyspace and table names.
//!
//! Row values always travel as bound parameters, but CQL has no placeholder
//! for schema object names, so those get spliced into statement text.
//! [`CqlIdent`] is the only type the statement builders accept for that.

use std::{fmt, str::FromStr};

/// Cassandra's limit for unquoted keyspace and table names.
const MAX_LEN: usize = 48;

/// An unquoted CQL identifier: an ASCII letter followed by up to 47 ASCII
/// alphanumerics or underscores.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub(crate) struct CqlIdent(String);

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum IdentError {
    #[error("identifier is empty")]
    Empty,
    #[error("identifier {0:?} is longer than {MAX_LEN} characters")]
    TooLong(String),
    #[error("identifier {0:?} must start with an ASCII letter")]
    BadStart(String),
    #[error("identifier {0:?} contains {1:?}, only ASCII alphanumerics and '_' are allowed")]
    BadChar(String, char),
}

impl CqlIdent {
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CqlIdent {
    type Err = IdentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match chars.next() {
            None => return Err(IdentError::Empty),
            Some(c) if !c.is_ascii_alphabetic() => return Err(IdentError::BadStart(s.to_owned())),
            Some(_) => {}
        }
        if let Some(c) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
            return Err(IdentError::BadChar(s.to_owned(), c));
        }
        if s.len() > MAX_LEN {
            return Err(IdentError::TooLong(s.to_owned()));
        }
        Ok(CqlIdent(s.to_owned()))
    }
}

impl fmt::Display for CqlIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

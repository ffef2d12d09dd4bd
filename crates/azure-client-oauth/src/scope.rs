//! Permission scopes requested during authorization.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// Space-separated list of permission identifiers.
///
/// Scopes can be supplied either pre-joined or as a list; both forms are
/// normalised to a single string once, at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "String")]
pub struct Scope(String);

impl Scope {
    /// Uses an already space-joined scope string as-is.
    #[must_use]
    pub fn from_string(scope: impl Into<String>) -> Self {
        Self(scope.into())
    }

    /// Joins scope items with single spaces, preserving order.
    #[must_use]
    pub fn from_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let items: Vec<S> = items.into_iter().collect();
        Self(
            items
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .join(" "),
        )
    }

    /// Returns the normalised scope string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<Value> for Scope {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(scope) => Ok(Self(scope)),
            Value::Array(items) => {
                let items = items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => Ok(s),
                        other => Err(Error::Validation(format!(
                            "Unexpected scope item: {other}"
                        ))),
                    })
                    .collect::<Result<Vec<String>, Error>>()?;
                Ok(Self::from_list(items))
            }
            other => Err(Error::Validation(format!("Unexpected scope: {other}"))),
        }
    }
}

impl From<&str> for Scope {
    fn from(scope: &str) -> Self {
        Self::from_string(scope)
    }
}

impl From<String> for Scope {
    fn from(scope: String) -> Self {
        Self(scope)
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        scope.0
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

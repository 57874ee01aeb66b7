use crate::dataview::CategoryColumn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque token identifying one data row for cross-visual selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionId(String);

impl SelectionId {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn key(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SelectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds a selection identity for a row of a category series.
///
/// Implementations must be deterministic: the same column and row produce an equal id on every
/// render of the same dataset.
pub trait SelectionIdBuilder {
    fn with_category(&self, column: &CategoryColumn, row: usize) -> SelectionId;
}

/// Uses the host's per-row scope identity when present, otherwise `<queryName>#<row>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategorySelectionIdBuilder;

impl SelectionIdBuilder for CategorySelectionIdBuilder {
    fn with_category(&self, column: &CategoryColumn, row: usize) -> SelectionId {
        if let Some(identity) = column.identity.as_ref().and_then(|ids| ids.get(row)) {
            return SelectionId::new(identity.key.clone());
        }
        let scope = column
            .source
            .as_ref()
            .and_then(|s| s.query_name.as_deref().or(Some(s.display_name.as_str())))
            .filter(|s| !s.is_empty())
            .unwrap_or("category");
        SelectionId::new(format!("{scope}#{row}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataview::{DataViewColumn, ScopeIdentity};

    #[test]
    fn prefers_host_identity() {
        let column = CategoryColumn {
            identity: Some(vec![ScopeIdentity { key: "k0".into() }]),
            ..Default::default()
        };
        let builder = CategorySelectionIdBuilder;
        assert_eq!(builder.with_category(&column, 0).key(), "k0");
        assert_eq!(builder.with_category(&column, 1).key(), "category#1");
    }

    #[test]
    fn falls_back_to_query_name_and_row() {
        let column = CategoryColumn {
            source: Some(DataViewColumn {
                display_name: "State".into(),
                query_name: Some("Sales.State".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let builder = CategorySelectionIdBuilder;
        let a = builder.with_category(&column, 3);
        assert_eq!(a, builder.with_category(&column, 3));
        assert_eq!(a.key(), "Sales.State#3");
    }
}

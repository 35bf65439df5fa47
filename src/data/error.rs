use thiserror::Error;

use super::model::TableName;

/// Which raw input table a schema problem was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceTable {
    Market,
    Geo,
}

impl std::fmt::Display for SourceTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceTable::Market => f.write_str("market"),
            SourceTable::Geo => f.write_str("coordinates"),
        }
    }
}

/// Failures of the aggregation engine and of raw-table validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A required column is missing from a raw table.
    #[error("{table} table: missing required column '{column}'")]
    MissingColumn { table: SourceTable, column: String },

    /// A cell could not be interpreted as the column's type, or violates
    /// a value constraint (non-finite metric, empty neighborhood, ...).
    #[error("{table} table, row {row}, column '{column}': {message}")]
    Schema {
        table: SourceTable,
        row: usize,
        column: String,
        message: String,
    },

    /// A grouping key produced no rows where at least one was expected.
    #[error("{table}: no rows for {key}")]
    EmptyGroup { table: TableName, key: String },
}

impl EngineError {
    pub fn schema(
        table: SourceTable,
        row: usize,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        EngineError::Schema {
            table,
            row,
            column: column.into(),
            message: message.into(),
        }
    }

    pub fn empty_group(table: TableName, key: impl Into<String>) -> Self {
        EngineError::EmptyGroup {
            table,
            key: key.into(),
        }
    }
}

//! Table change notifications and subscription filters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tables that emit change notifications (see the `notify_table_change` trigger).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchedTable {
    NewsItems,
    ReviewItems,
    SystemPrompts,
    IngestionSources,
}

impl WatchedTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewsItems => "news_items",
            Self::ReviewItems => "review_items",
            Self::SystemPrompts => "system_prompts",
            Self::IngestionSources => "ingestion_sources",
        }
    }
}

impl fmt::Display for WatchedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WatchedTable {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "news_items" => Ok(Self::NewsItems),
            "review_items" => Ok(Self::ReviewItems),
            "system_prompts" => Ok(Self::SystemPrompts),
            "ingestion_sources" => Ok(Self::IngestionSources),
            other => anyhow::bail!("Table '{}' is not watched", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

/// One row change, as sent by the database trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableChange {
    pub table: String,
    pub op: ChangeOp,
    /// Full row, or only `{"id": ...}` for rows too large for NOTIFY
    #[serde(default)]
    pub record: serde_json::Value,
}

impl TableChange {
    pub fn new(table: WatchedTable, op: ChangeOp, record: serde_json::Value) -> Self {
        Self {
            table: table.as_str().to_string(),
            op,
            record,
        }
    }
}

/// Equality filter in `column=eq.value` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeFilter {
    pub column: String,
    pub value: String,
}

impl ChangeFilter {
    /// Whether a change passes the filter.
    ///
    /// A record without the column (e.g. a reduced oversize payload) passes:
    /// subscribers refetch anyway, a spurious refresh is harmless.
    pub fn matches(&self, change: &TableChange) -> bool {
        match change.record.get(&self.column) {
            None => true,
            Some(serde_json::Value::String(s)) => s == &self.value,
            Some(serde_json::Value::Null) => self.value == "null",
            Some(other) => other.to_string() == self.value,
        }
    }
}

impl fmt::Display for ChangeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=eq.{}", self.column, self.value)
    }
}

impl FromStr for ChangeFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, rest) = s
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Filter must look like column=eq.value"))?;
        let value = rest
            .strip_prefix("eq.")
            .ok_or_else(|| anyhow::anyhow!("Only eq filters are supported"))?;
        if column.is_empty() {
            anyhow::bail!("Filter column is empty");
        }
        Ok(Self {
            column: column.to_string(),
            value: value.to_string(),
        })
    }
}

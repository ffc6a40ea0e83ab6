//! Argument and result types for the cached resolvers.

use serde::{Deserialize, Serialize};

/// Arguments accepted by `topSpenders`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSpendersArgs {
    /// Restrict the sum to one fiscal year
    #[serde(default)]
    pub fiscal_year: Option<i32>,
    /// Maximum rows (default 10)
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Arguments accepted by `randomMPs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomMpsArgs {
    /// Maximum MPs (default 12)
    #[serde(default)]
    pub limit: Option<u32>,
    /// Only MPs from these parties
    #[serde(default)]
    pub parties: Option<Vec<String>>,
}

impl RandomMpsArgs {
    /// Party filter as a sorted set; `None` when absent or empty.
    pub fn normalized_parties(&self) -> Option<Vec<String>> {
        let mut parties = self.parties.clone()?;
        parties.sort();
        parties.dedup();
        if parties.is_empty() {
            None
        } else {
            Some(parties)
        }
    }
}

/// The MP fields the dashboard queries return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MpSummary {
    pub id: String,
    pub name: String,
    pub party: Option<String>,
    pub riding: Option<String>,
    pub current: bool,
}

/// One `topSpenders` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpenderSummary {
    pub mp: MpSummary,
    pub total_expenses: f64,
}

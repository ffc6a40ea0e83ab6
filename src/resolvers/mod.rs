//! Resolvers Module
//!
//! Cached read resolvers for the parliament dashboard queries. The graph
//! store behind them is abstracted as a [`ParliamentSource`].
//!
//! # TTL policy per operation
//! - `topSpenders` sums every expense per MP. It is expensive and the data
//!   changes at most daily, so results live for an hour.
//! - `randomMPs` is a cheap sample meant to rotate, so results live for five
//!   minutes.

mod models;
mod source;

pub use models::{MpSummary, RandomMpsArgs, SpenderSummary, TopSpendersArgs};
pub use source::ParliamentSource;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::cache::{CacheKeyBuilder, CachePolicy, TtlCache};
use crate::error::Result;

/// Operation name used in `topSpenders` cache keys.
pub const TOP_SPENDERS: &str = "topSpenders";
/// Operation name used in `randomMPs` cache keys.
pub const RANDOM_MPS: &str = "randomMPs";

/// Rows returned by `topSpenders` when no limit is given.
pub const DEFAULT_TOP_SPENDERS_LIMIT: u32 = 10;
/// MPs returned by `randomMPs` when no limit is given.
pub const DEFAULT_RANDOM_MPS_LIMIT: u32 = 12;

// == Query Resolvers ==
/// Resolver set sharing one injected cache.
#[derive(Debug)]
pub struct QueryResolvers<S> {
    source: S,
    cache: Arc<TtlCache>,
}

impl<S: ParliamentSource> QueryResolvers<S> {
    /// Creates resolvers over `source`, caching into `cache`.
    pub fn new(source: S, cache: Arc<TtlCache>) -> Self {
        Self { source, cache }
    }

    /// The cache these resolvers write to.
    pub fn cache(&self) -> &Arc<TtlCache> {
        &self.cache
    }

    // == Top Spenders ==
    /// MPs ranked by total expenses, optionally for a single fiscal year.
    ///
    /// Cached for an hour under the effective arguments (limit defaulted).
    pub async fn top_spenders(&self, args: TopSpendersArgs) -> Result<Vec<SpenderSummary>> {
        let fiscal_year = args.fiscal_year;
        let limit = args.limit.unwrap_or(DEFAULT_TOP_SPENDERS_LIMIT);

        let key = CacheKeyBuilder::new(TOP_SPENDERS)
            .opt_arg("fiscalYear", fiscal_year)
            .arg("limit", limit)
            .build()?;

        let source = &self.source;
        self.cached(&key, CachePolicy::AGGREGATE, move || async move {
            source.top_spenders(fiscal_year, limit).await
        })
        .await
    }

    // == Random MPs ==
    /// A random sample of current MPs, optionally restricted to some parties.
    ///
    /// Party filters are a set: order and duplicates do not change the key,
    /// and an empty list means no filter. Cached for five minutes.
    pub async fn random_mps(&self, args: RandomMpsArgs) -> Result<Vec<MpSummary>> {
        let limit = args.limit.unwrap_or(DEFAULT_RANDOM_MPS_LIMIT);
        let parties = args.normalized_parties();

        let key = CacheKeyBuilder::new(RANDOM_MPS)
            .arg("limit", limit)
            .opt_arg("parties", parties.clone())
            .build()?;

        let source = &self.source;
        let parties = parties.as_deref();
        self.cached(&key, CachePolicy::VOLATILE, move || async move {
            source.random_mps(limit, parties).await
        })
        .await
    }

    /// Read-through over the shared cache, storing results as JSON.
    async fn cached<T, F, Fut>(&self, key: &str, policy: CachePolicy, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = anyhow::Result<T>>,
    {
        let value: Value = self
            .cache
            .get_or_try_insert_with(key, policy, move || async move {
                let rows = fetch().await?;
                Ok::<_, anyhow::Error>(serde_json::to_value(rows)?)
            })
            .await?;

        Ok(serde_json::from_value(value).map_err(anyhow::Error::from)?)
    }
}

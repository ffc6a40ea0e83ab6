//! Data source seam for the cached resolvers.

use std::future::Future;

use super::models::{MpSummary, SpenderSummary};

/// The graph store queries the resolvers wrap.
///
/// Implementations run the real (expensive) read every time they are called;
/// caching happens in `QueryResolvers`. Errors are returned to the caller
/// unchanged and never cached.
pub trait ParliamentSource: Send + Sync {
    /// MPs ranked by summed expenses, highest first, at most `limit` rows.
    /// `fiscal_year` of `None` sums across all years.
    fn top_spenders(
        &self,
        fiscal_year: Option<i32>,
        limit: u32,
    ) -> impl Future<Output = anyhow::Result<Vec<SpenderSummary>>> + Send;

    /// Up to `limit` current MPs in random order. `parties` of `None` means
    /// any party; otherwise a sorted, de-duplicated, non-empty list.
    fn random_mps(
        &self,
        limit: u32,
        parties: Option<&[String]>,
    ) -> impl Future<Output = anyhow::Result<Vec<MpSummary>>> + Send;
}

//! Historical replay of the ranking engine
//!
//! Steps back from a reference instant one timeframe unit at a time and
//! records, per bucket end, the user's rank, their ratio and the raw spend
//! points behind it.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Category, History, RawPoint, Timeframe};
use crate::store::Snapshot;
use crate::window::{Window, WindowFilter};

/// Buckets replayed when the caller does not choose
pub const DEFAULT_BUCKETS: usize = 10;

impl Snapshot {
    /// Rank/ratio/raw series over `buckets` consecutive windows ending at
    /// `reference`, `reference - unit`, ...
    ///
    /// Buckets where the user is unranked are left out of the rank and ratio
    /// series; the raw series always has one (possibly empty) entry per bucket.
    /// Fails with `InvalidData` when the oldest bucket would fall outside the
    /// representable time range.
    pub fn history(
        &self,
        user_id: &str,
        category: Category,
        timeframe: Timeframe,
        reference: DateTime<Utc>,
        buckets: usize,
        state: Option<&str>,
    ) -> Result<History> {
        let mut history = History::default();
        let unit = timeframe.span();

        if buckets > 0 {
            let oldest_start = i32::try_from(buckets)
                .ok()
                .and_then(|n| unit.checked_mul(n))
                .and_then(|back| reference.checked_sub_signed(back));
            if oldest_start.is_none() {
                return Err(Error::InvalidData(format!(
                    "{} {} buckets ending at {} is out of range",
                    buckets,
                    timeframe.name(),
                    reference
                )));
            }
        }

        let mut bucket_end = reference;
        for i in 0..buckets {
            if i > 0 {
                bucket_end -= unit;
            }

            let outcome = self.rank(user_id, category, timeframe, bucket_end, state)?;
            if let Some(rank) = outcome.user_rank.filter(|&r| r > 0) {
                history.rank_series.insert(bucket_end, rank);
            }
            if outcome.user_ratio > 0.0 {
                history.ratio_series.insert(bucket_end, outcome.user_ratio);
            }

            let raw: Vec<RawPoint> = WindowFilter::new(Window::resolve(timeframe, bucket_end)?)
                .category(Some(category))
                .user_id(Some(user_id))
                .apply(self)
                .into_iter()
                .map(|r| RawPoint {
                    timestamp: r.timestamp,
                    amount: r.amount,
                })
                .collect();
            history.raw_series.insert(bucket_end, raw);
        }

        debug!(
            user_id,
            buckets,
            ranked = history.rank_series.len(),
            "Built history"
        );
        Ok(history)
    }
}

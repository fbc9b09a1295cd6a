//! Time windows and the record filter built on them
//!
//! A window is the inclusive interval `[reference - span, reference]` for a
//! timeframe. `WindowFilter` narrows a snapshot to the records of one window,
//! optionally restricted to a category, a state and a single user.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Category, Timeframe, TransactionRecord};
use crate::store::Snapshot;

/// Inclusive time interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    /// Window of one timeframe ending at `reference`
    ///
    /// Fails with `InvalidData` when the window start falls outside the
    /// representable time range.
    pub fn resolve(timeframe: Timeframe, reference: DateTime<Utc>) -> Result<Self> {
        let start = reference.checked_sub_signed(timeframe.span()).ok_or_else(|| {
            Error::InvalidData(format!(
                "{} window ending at {} is out of range",
                timeframe.name(),
                reference
            ))
        })?;
        Ok(Self {
            start,
            end: reference,
        })
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

/// Builder for selecting the records of one window
///
/// The lifetime `'query` is how long the borrowed state and user filters
/// must stay valid.
#[derive(Debug, Clone)]
pub struct WindowFilter<'query> {
    pub window: Window,
    pub category: Option<Category>,
    pub state: Option<&'query str>,
    pub user_id: Option<&'query str>,
}

impl<'query> WindowFilter<'query> {
    /// Create a filter over every record in `window`
    pub fn new(window: Window) -> Self {
        Self {
            window,
            category: None,
            state: None,
            user_id: None,
        }
    }

    /// Set category filter
    pub fn category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    /// Set state filter (case-insensitive, blank means no filter)
    pub fn state(mut self, state: Option<&'query str>) -> Self {
        self.state = state.map(str::trim).filter(|s| !s.is_empty());
        self
    }

    /// Set user filter
    pub fn user_id(mut self, user_id: Option<&'query str>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Matching records, in store order
    pub fn apply<'s>(&self, snapshot: &'s Snapshot) -> Vec<&'s TransactionRecord> {
        let candidates = match self.category {
            Some(category) => snapshot.category_between(category, self.window.start, self.window.end),
            None => snapshot.all_between(self.window.start, self.window.end),
        };

        let hits: Vec<&TransactionRecord> = candidates
            .into_iter()
            .filter(|r| self.state.map_or(true, |s| r.state.eq_ignore_ascii_case(s)))
            .filter(|r| self.user_id.map_or(true, |u| r.user_id == u))
            .collect();

        debug!(
            category = ?self.category,
            state = ?self.state,
            start = %self.window.start,
            end = %self.window.end,
            hits = hits.len(),
            "Filtered window"
        );
        hits
    }
}

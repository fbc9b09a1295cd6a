//! Per-category spending of one user against their period budget

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{Category, SpendingBreakdown, Timeframe};
use crate::store::Snapshot;
use crate::window::{Window, WindowFilter};

impl Snapshot {
    /// Spend by category in the window ending at `reference`, with the
    /// user's budget for that timeframe
    ///
    /// Categories with no positive spend are left out. Fails with
    /// `UnknownUser` when the user has no records at all.
    pub fn breakdown(
        &self,
        user_id: &str,
        timeframe: Timeframe,
        reference: DateTime<Utc>,
    ) -> Result<SpendingBreakdown> {
        let profile = self.user(user_id)?;

        let mut by_category: BTreeMap<Category, f64> = BTreeMap::new();
        for record in WindowFilter::new(Window::resolve(timeframe, reference)?)
            .user_id(Some(user_id))
            .apply(self)
        {
            *by_category.entry(record.category).or_default() += record.amount;
        }
        by_category.retain(|_, amount| *amount > 0.0);

        let total: f64 = by_category.values().sum();
        let budget = timeframe.budget(profile.salary);

        Ok(SpendingBreakdown {
            by_category,
            total,
            budget,
            budget_delta: budget - total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_utils::{at, RecordBuilder};

    #[test]
    fn test_breakdown_groups_by_category() {
        let snap = Snapshot::new(
            1,
            vec![
                RecordBuilder::new("a", 120_000.0).spend(100.0),
                RecordBuilder::new("a", 120_000.0).spend(50.0),
                RecordBuilder::new("a", 120_000.0)
                    .category(Category::Travel)
                    .spend(250.0),
                RecordBuilder::new("a", 120_000.0)
                    .category(Category::Home)
                    .spend(0.0),
                RecordBuilder::new("a", 120_000.0)
                    .category(Category::Travel)
                    .on(at(2018, 1, 1))
                    .spend(999.0),
                RecordBuilder::new("b", 60_000.0).spend(75.0),
            ],
        );

        let breakdown = snap
            .breakdown("a", Timeframe::Monthly, at(2019, 2, 15))
            .unwrap();
        assert_eq!(breakdown.by_category.len(), 2);
        assert_eq!(breakdown.by_category[&Category::Grocery], 150.0);
        assert_eq!(breakdown.by_category[&Category::Travel], 250.0);
        assert_eq!(breakdown.total, 400.0);
        assert_eq!(breakdown.budget, 10_000.0);
        assert_eq!(breakdown.budget_delta, 9_600.0);
    }

    #[test]
    fn test_breakdown_quiet_window() {
        let snap = Snapshot::new(1, vec![RecordBuilder::new("a", 52_000.0).spend(10.0)]);
        let breakdown = snap
            .breakdown("a", Timeframe::Weekly, at(2020, 1, 1))
            .unwrap();
        assert!(breakdown.by_category.is_empty());
        assert_eq!(breakdown.total, 0.0);
        assert_eq!(breakdown.budget, 1_000.0);
    }

    #[test]
    fn test_breakdown_unknown_user() {
        let snap = Snapshot::new(1, vec![RecordBuilder::new("a", 52_000.0).spend(10.0)]);
        assert!(matches!(
            snap.breakdown("ghost", Timeframe::Daily, at(2019, 2, 15)),
            Err(Error::UnknownUser(_))
        ));
    }
}

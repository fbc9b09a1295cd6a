//! Per-user aggregation and income normalization
//!
//! Sums each user's spend in a filtered window and divides it by the share of
//! their salary that belongs to one period of the timeframe.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::models::{Timeframe, TransactionRecord};

/// Ratios are reported with this many fractional digits
pub const RATIO_DIGITS: i32 = 4;

/// One user's aggregate in a window
#[derive(Debug, Clone, PartialEq)]
pub struct UserSpend {
    pub user_id: String,
    pub name: String,
    pub salary: f64,
    /// Raw sum of amounts in the window
    pub total: f64,
    pub spent_ratio: f64,
}

/// Output of the normalizer
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// No transactions matched at all
    EmptyMarket,
    /// Per-user aggregates in first-seen order
    Market(Vec<UserSpend>),
}

/// Round a ratio to `RATIO_DIGITS` fractional digits
pub fn round_ratio(value: f64) -> f64 {
    let scale = 10f64.powi(RATIO_DIGITS);
    (value * scale).round() / scale
}

/// Group records by user and compute each user's spend ratio
///
/// Salary and name come from the first record seen for each user.
pub fn normalize(records: &[&TransactionRecord], timeframe: Timeframe) -> Normalized {
    if records.is_empty() {
        return Normalized::EmptyMarket;
    }

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut spends: Vec<UserSpend> = Vec::new();

    for record in records {
        match index.get(record.user_id.as_str()) {
            Some(&i) => {
                let spend = &mut spends[i];
                spend.total += record.amount;
                if spend.salary != record.salary {
                    warn!(
                        user_id = %record.user_id,
                        first = spend.salary,
                        other = record.salary,
                        "Inconsistent salary across rows, using the first"
                    );
                }
            }
            None => {
                index.insert(record.user_id.as_str(), spends.len());
                spends.push(UserSpend {
                    user_id: record.user_id.clone(),
                    name: record.name.clone(),
                    salary: record.salary,
                    total: record.amount,
                    spent_ratio: 0.0,
                });
            }
        }
    }

    for spend in &mut spends {
        spend.spent_ratio = round_ratio(spend.total / timeframe.budget(spend.salary));
    }

    debug!(
        records = records.len(),
        users = spends.len(),
        timeframe = timeframe.name(),
        "Normalized window"
    );
    Normalized::Market(spends)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordBuilder;

    #[test]
    fn test_empty_market() {
        assert_eq!(normalize(&[], Timeframe::Monthly), Normalized::EmptyMarket);
    }

    #[test]
    fn test_ratio_against_period_budget() {
        let rows = vec![
            RecordBuilder::new("a", 120_000.0).spend(600.0),
            RecordBuilder::new("b", 60_000.0).spend(1_000.0),
            RecordBuilder::new("a", 120_000.0).spend(400.0),
        ];
        let refs: Vec<&TransactionRecord> = rows.iter().collect();

        let Normalized::Market(spends) = normalize(&refs, Timeframe::Monthly) else {
            panic!("expected a market");
        };
        assert_eq!(spends.len(), 2);
        assert_eq!(spends[0].user_id, "a");
        assert_eq!(spends[0].total, 1_000.0);
        assert_eq!(spends[0].spent_ratio, 0.1);
        assert_eq!(spends[1].spent_ratio, 0.2);
    }

    #[test]
    fn test_ratio_is_rounded_to_four_digits() {
        // 10 / (365_000 / 365) = 0.01; 1 / (70_000 / 52) = 0.000742857...
        let rows = vec![
            RecordBuilder::new("d", 365_000.0).spend(10.0),
            RecordBuilder::new("w", 70_000.0).spend(1.0),
        ];
        let refs: Vec<&TransactionRecord> = rows.iter().collect();

        let Normalized::Market(daily) = normalize(&refs[..1], Timeframe::Daily) else {
            panic!("expected a market");
        };
        assert_eq!(daily[0].spent_ratio, 0.01);

        let Normalized::Market(weekly) = normalize(&refs[1..], Timeframe::Weekly) else {
            panic!("expected a market");
        };
        assert_eq!(weekly[0].spent_ratio, 0.0007);
    }

    #[test]
    fn test_first_salary_wins() {
        let rows = vec![
            RecordBuilder::new("a", 120_000.0).spend(1_000.0),
            RecordBuilder::new("a", 60_000.0).spend(1_000.0),
        ];
        let refs: Vec<&TransactionRecord> = rows.iter().collect();
        let Normalized::Market(spends) = normalize(&refs, Timeframe::Monthly) else {
            panic!("expected a market");
        };
        assert_eq!(spends[0].salary, 120_000.0);
        assert_eq!(spends[0].spent_ratio, 0.2);
    }

    #[test]
    fn test_round_ratio() {
        assert_eq!(round_ratio(0.123456), 0.1235);
        assert_eq!(round_ratio(0.0), 0.0);
        assert_eq!(round_ratio(2.5), 2.5);
    }
}

//! Data models for spendrank

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Spending category (closed set carried by the transaction table)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FoodDining,
    Travel,
    Entertainment,
    PersonalCare,
    Grocery,
    HealthFitness,
    KidsPets,
    Misc,
    GasTransport,
    Home,
    Shopping,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FoodDining => "food_dining",
            Self::Travel => "travel",
            Self::Entertainment => "entertainment",
            Self::PersonalCare => "personal_care",
            Self::Grocery => "grocery",
            Self::HealthFitness => "health_fitness",
            Self::KidsPets => "kids_pets",
            Self::Misc => "misc",
            Self::GasTransport => "gas_transport",
            Self::Home => "home",
            Self::Shopping => "shopping",
        }
    }

    /// Get all categories
    pub fn all() -> &'static [Category] {
        &[
            Self::FoodDining,
            Self::Travel,
            Self::Entertainment,
            Self::PersonalCare,
            Self::Grocery,
            Self::HealthFitness,
            Self::KidsPets,
            Self::Misc,
            Self::GasTransport,
            Self::Home,
            Self::Shopping,
        ]
    }
}

impl std::str::FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == token)
            .ok_or_else(|| Error::InvalidCategory(s.to_string()))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ranking timeframe
///
/// Monthly windows are a fixed 30-day approximation, not calendar months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "d")]
    Daily,
    #[serde(rename = "w")]
    Weekly,
    #[serde(rename = "m")]
    Monthly,
}

impl Timeframe {
    /// Short token used on the command line and in the wire format
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "d",
            Self::Weekly => "w",
            Self::Monthly => "m",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Length of one window, also the step between history buckets
    pub fn span(&self) -> Duration {
        match self {
            Self::Daily => Duration::seconds(86_400),
            Self::Weekly => Duration::seconds(604_800),
            Self::Monthly => Duration::seconds(2_592_000),
        }
    }

    /// Number of periods of this length in a salary year
    pub fn periods_per_year(&self) -> f64 {
        match self {
            Self::Daily => 365.0,
            Self::Weekly => 52.0,
            Self::Monthly => 12.0,
        }
    }

    /// Salary share available for one period
    pub fn budget(&self, salary: f64) -> f64 {
        salary / self.periods_per_year()
    }
}

impl std::str::FromStr for Timeframe {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "d" | "daily" => Ok(Self::Daily),
            "w" | "weekly" => Ok(Self::Weekly),
            "m" | "monthly" => Ok(Self::Monthly),
            _ => Err(Error::InvalidTimeframe(s.to_string())),
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single persisted transaction
///
/// Salary and name are denormalized onto every row. All rows of one user are
/// expected to carry the same salary; the store does not enforce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub user_id: String,
    pub category: Category,
    pub timestamp: DateTime<Utc>,
    pub amount: f64,
    pub state: String,
    pub salary: f64,
    pub name: String,
}

/// A transaction to append; salary and name come from the user's existing rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub user_id: String,
    pub category: Category,
    pub timestamp: DateTime<Utc>,
    pub amount: f64,
    pub state: String,
}

/// Identity and income of a user, taken from their first record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    pub salary: f64,
}

/// A user's position in one ranked window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedUser {
    pub user_id: String,
    pub name: String,
    pub spent_ratio: f64,
    pub rank: u32,
}

/// Why a neighbor is in the leaderboard neighborhood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// One of the first three ranked entries (1-based position)
    Top(u8),
    /// Closest entry ranked strictly ahead of the user
    Before,
    /// The queried user
    User,
    /// Closest entry ranked strictly behind the user
    After,
}

/// One entry of the neighborhood returned by the ranking engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub role: Role,
    pub user_id: String,
    pub name: String,
    pub spent_ratio: f64,
    pub rank: u32,
}

/// Result of ranking one user in one window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankOutcome {
    /// No transaction matched the category, state and window at all
    pub market_empty: bool,
    /// The user's ratio, 0 when the user is absent from the window
    pub user_ratio: f64,
    pub user_rank: Option<u32>,
    /// Users with a positive ratio in the window
    pub user_count_nonzero: usize,
    pub neighbors: Vec<Neighbor>,
}

impl RankOutcome {
    /// Sentinel for a window with no matching transactions at all
    pub fn empty_market() -> Self {
        Self {
            market_empty: true,
            user_ratio: 0.0,
            user_rank: None,
            user_count_nonzero: 0,
            neighbors: Vec::new(),
        }
    }

    /// Distinguishes "nothing matched" from "only zero spend matched"
    pub fn is_empty_market(&self) -> bool {
        self.market_empty
    }

    /// `rank / count * 100`, when the user is ranked
    pub fn top_percent(&self) -> Option<f64> {
        match self.user_rank {
            Some(rank) if self.user_count_nonzero > 0 => {
                Some(rank as f64 / self.user_count_nonzero as f64 * 100.0)
            }
            _ => None,
        }
    }
}

/// A leaderboard row ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayEntry {
    pub name: String,
    pub rank: u32,
    pub spent_ratio: f64,
}

/// A raw spend point inside a history bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    pub timestamp: DateTime<Utc>,
    pub amount: f64,
}

/// Rank, ratio and raw-spend series keyed by bucket end
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub rank_series: BTreeMap<DateTime<Utc>, u32>,
    pub ratio_series: BTreeMap<DateTime<Utc>, f64>,
    pub raw_series: BTreeMap<DateTime<Utc>, Vec<RawPoint>>,
}

/// Per-category spend of one user in one window, against their budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingBreakdown {
    pub by_category: BTreeMap<Category, f64>,
    pub total: f64,
    pub budget: f64,
    pub budget_delta: f64,
}

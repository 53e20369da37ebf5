//! Premium statistics (read-only)
//!
//! Statistics are aggregated by the store. The client fetches them in one
//! of two shapes and displays them as received; nothing here recomputes a
//! count or a sum.

use crate::remote::RemoteError;
use serde::{Deserialize, Serialize};

/// Members and premium falling in one age range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRangeStat {
    pub age_range: String,
    pub member_count: u32,
    pub total_premium: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsTotals {
    pub member_count: u32,
    pub total_premium: i64,
}

/// Age-range rows for the members handled by one manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerGroup {
    pub manager_name: String,
    pub rows: Vec<AgeRangeStat>,
    pub subtotal: StatisticsTotals,
}

/// Either statistics shape the store can return
///
/// The shape is recognised by its fields, so no tag is expected on the wire.
///
/// # Example
/// ```
/// use group_policy_desk_core::remote::PolicyStatistics;
///
/// let json = r#"{
///   "rows": [{"age_range": "18-30", "member_count": 4, "total_premium": 60000}],
///   "summary": {"member_count": 4, "total_premium": 60000}
/// }"#;
/// let stats: PolicyStatistics = serde_json::from_str(json).unwrap();
/// assert!(!stats.is_grouped());
/// assert_eq!(stats.totals().member_count, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PolicyStatistics {
    ManagerGrouped {
        groups: Vec<ManagerGroup>,
        grand_total: StatisticsTotals,
    },
    Flat {
        rows: Vec<AgeRangeStat>,
        summary: StatisticsTotals,
    },
}

impl PolicyStatistics {
    pub fn is_grouped(&self) -> bool {
        matches!(self, PolicyStatistics::ManagerGrouped { .. })
    }

    /// The store's overall totals (grand total or summary)
    pub fn totals(&self) -> &StatisticsTotals {
        match self {
            PolicyStatistics::ManagerGrouped { grand_total, .. } => grand_total,
            PolicyStatistics::Flat { summary, .. } => summary,
        }
    }

    /// Every age-range row in display order, paired with its manager if grouped
    pub fn rows(&self) -> Vec<(Option<&str>, &AgeRangeStat)> {
        match self {
            PolicyStatistics::ManagerGrouped { groups, .. } => groups
                .iter()
                .flat_map(|group| {
                    group
                        .rows
                        .iter()
                        .map(move |row| (Some(group.manager_name.as_str()), row))
                })
                .collect(),
            PolicyStatistics::Flat { rows, .. } => rows.iter().map(|row| (None, row)).collect(),
        }
    }
}

pub trait StatisticsService {
    fn fetch_statistics(
        &self,
        policy_reference: &str,
        group_by_manager: bool,
    ) -> Result<PolicyStatistics, RemoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouped_shape_is_recognised() {
        let json = r#"{
            "groups": [
                {
                    "manager_name": "Somchai",
                    "rows": [
                        {"age_range": "18-30", "member_count": 2, "total_premium": 30000},
                        {"age_range": "31-40", "member_count": 1, "total_premium": 18000}
                    ],
                    "subtotal": {"member_count": 3, "total_premium": 48000}
                },
                {
                    "manager_name": "Malee",
                    "rows": [
                        {"age_range": "18-30", "member_count": 1, "total_premium": 15000}
                    ],
                    "subtotal": {"member_count": 1, "total_premium": 15000}
                }
            ],
            "grand_total": {"member_count": 4, "total_premium": 63000}
        }"#;

        let stats: PolicyStatistics = serde_json::from_str(json).unwrap();
        assert!(stats.is_grouped());
        assert_eq!(stats.totals().total_premium, 63_000);

        let rows = stats.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].0, Some("Somchai"));
        assert_eq!(rows[2].0, Some("Malee"));
    }

    #[test]
    fn test_totals_are_not_recomputed() {
        // Deliberately inconsistent: the store's summary is shown as-is
        let stats = PolicyStatistics::Flat {
            rows: vec![AgeRangeStat {
                age_range: "18-30".to_string(),
                member_count: 1,
                total_premium: 100,
            }],
            summary: StatisticsTotals {
                member_count: 9,
                total_premium: 999,
            },
        };
        assert_eq!(stats.totals().member_count, 9);
        assert_eq!(stats.rows()[0].0, None);
    }
}

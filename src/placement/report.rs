use super::engine::{BalanceHalt, OptimizationOutcome};
use super::roster::Roster;
use super::stats;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSummary {
    pub ordinal: usize,
    pub name: String,
    pub headcount: usize,
    /// Employees per role; roles absent from the location are omitted.
    pub role_headcounts: BTreeMap<String, usize>,
    /// `None` when the location ended up empty.
    pub fte_mean: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleBalanceSummary {
    pub role: String,
    pub swaps: usize,
    pub halt: BalanceHalt,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassSummary {
    pub balance_swaps: usize,
    pub balance_by_role: Vec<RoleBalanceSummary>,
    pub mismatch_swaps: usize,
    pub unresolved_mismatches: usize,
    pub preference_swaps: usize,
}

/// End-of-run figures: FTE means and how well preferences were honoured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementReport {
    pub employees: usize,
    pub roles: Vec<String>,
    pub global_fte_mean: Option<f64>,
    pub locations: Vec<LocationSummary>,
    pub first_preference: usize,
    pub second_preference: usize,
    pub satisfied_pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passes: Option<PassSummary>,
}

impl PlacementReport {
    pub fn build(roster: &Roster, outcome: Option<&OptimizationOutcome>) -> Self {
        let locations = roster
            .locations()
            .iter()
            .enumerate()
            .map(|(index, location)| LocationSummary {
                ordinal: index + 1,
                name: location.name().to_string(),
                headcount: location.len(),
                role_headcounts: roster
                    .roles()
                    .iter()
                    .filter(|role| location.has_role(role))
                    .map(|role| (role.clone(), location.count_in_role(role)))
                    .collect(),
                fte_mean: defined(location.fte_mean()),
            })
            .collect();

        let first_preference = stats::count_at_first_preference(roster.locations());
        let second_preference = stats::count_at_second_preference(roster.locations());
        let employees = roster.employees().len();
        let satisfied_pct = if employees == 0 {
            0.0
        } else {
            100.0 * (first_preference + second_preference) as f64 / employees as f64
        };

        Self {
            employees,
            roles: roster.roles().to_vec(),
            global_fte_mean: defined(stats::global_fte_mean(roster.employees())),
            locations,
            first_preference,
            second_preference,
            satisfied_pct,
            passes: outcome.map(|outcome| PassSummary {
                balance_swaps: outcome.balance_swaps(),
                balance_by_role: outcome
                    .balance
                    .iter()
                    .map(|role| RoleBalanceSummary {
                        role: role.role.clone(),
                        swaps: role.swaps.len(),
                        halt: role.halt,
                    })
                    .collect(),
                mismatch_swaps: outcome.mismatches.swaps.len(),
                unresolved_mismatches: outcome.mismatches.unresolved.len(),
                preference_swaps: outcome.preferences.swaps.len(),
            }),
        }
    }
}

fn defined(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::{AssignmentEngine, Employee, Location};

    #[test]
    fn report_counts_preferences_and_means() {
        let roster = Roster::from_partition(vec![
            Location::with_employees(
                "North",
                vec![
                    Employee::new("Ada", "North", "South", 41, 0.8, "Nurse"),
                    Employee::new("Bo", "South", "North", 29, 0.4, "Nurse"),
                ],
            ),
            Location::with_employees(
                "South",
                vec![Employee::new("Cy", "East", "West", 35, 0.6, "Porter")],
            ),
            Location::new("East"),
        ]);

        let report = PlacementReport::build(&roster, None);
        assert_eq!(report.employees, 3);
        assert_eq!(report.first_preference, 1);
        assert_eq!(report.second_preference, 1);
        assert!((report.satisfied_pct - 200.0 / 3.0).abs() < 1e-9);
        assert!((report.global_fte_mean.expect("mean defined") - 0.6).abs() < 1e-9);
        assert_eq!(report.locations[0].ordinal, 1);
        assert!((report.locations[0].fte_mean.expect("north mean") - 0.6).abs() < 1e-9);
        assert_eq!(report.locations[2].fte_mean, None);
        assert_eq!(
            report.locations[0].role_headcounts,
            BTreeMap::from([("Nurse".to_string(), 2)])
        );
        assert!(report.locations[2].role_headcounts.is_empty());
        assert!(report.passes.is_none());
    }

    #[test]
    fn pass_summary_records_why_each_role_stopped() {
        let mut roster = Roster::discover(vec![
            Employee::new("A", "X", "Y", 30, 0.8, "Eng"),
            Employee::new("B", "Y", "X", 28, 0.4, "Eng"),
            Employee::new("C", "X", "Z", 35, 0.6, "Eng"),
            Employee::new("D", "X", "Y", 40, 0.5, "Ops"),
        ]);
        roster.seed_round_robin();
        let outcome = AssignmentEngine::new().optimize(&mut roster);

        let report = PlacementReport::build(&roster, Some(&outcome));
        let passes = report.passes.expect("pass summary");
        assert_eq!(
            passes.balance_by_role,
            [
                RoleBalanceSummary {
                    role: "Eng".to_string(),
                    swaps: 1,
                    halt: BalanceHalt::RepeatedState,
                },
                RoleBalanceSummary {
                    role: "Ops".to_string(),
                    swaps: 0,
                    halt: BalanceHalt::TooFewEmployees,
                },
            ]
        );
        assert_eq!(passes.balance_swaps, 1);
    }
}

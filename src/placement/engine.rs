use super::roster::{Roster, SlotRef};
use super::stats;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Balancing of a role stops once lowest/highest mean exceeds this ratio.
pub const SPREAD_TOLERANCE: f64 = 0.9;

/// Roles with fewer employees than this are left alone by the balancer.
pub const MIN_ROLE_SIZE: usize = 3;

/// One employee moved from one location to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relocation {
    pub employee: String,
    pub from: String,
    pub to: String,
}

/// A slot exchange between two locations: `first` and `second` trade places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Swap {
    pub first: Relocation,
    pub second: Relocation,
}

/// Why the balancer stopped working on a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceHalt {
    TooFewEmployees,
    WithinTolerance,
    RepeatedState,
    AttemptsExhausted,
}

impl BalanceHalt {
    pub const fn label(self) -> &'static str {
        match self {
            Self::TooFewEmployees => "too few employees",
            Self::WithinTolerance => "spread within tolerance",
            Self::RepeatedState => "repeated mean detected",
            Self::AttemptsExhausted => "attempts exhausted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleBalance {
    pub role: String,
    pub headcount: usize,
    pub attempts: usize,
    pub swaps: Vec<Swap>,
    pub halt: BalanceHalt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedMismatch {
    pub employee: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MismatchOutcome {
    pub swaps: Vec<Swap>,
    pub unresolved: Vec<UnresolvedMismatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreferenceOutcome {
    pub swaps: Vec<Swap>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationOutcome {
    pub balance: Vec<RoleBalance>,
    pub mismatches: MismatchOutcome,
    pub preferences: PreferenceOutcome,
}

impl OptimizationOutcome {
    pub fn balance_swaps(&self) -> usize {
        self.balance.iter().map(|role| role.swaps.len()).sum()
    }

    pub fn total_swaps(&self) -> usize {
        self.balance_swaps() + self.mismatches.swaps.len() + self.preferences.swaps.len()
    }
}

/// Runs the three greedy passes over a seeded roster. Every pass is bounded
/// by role, location and employee counts, and only ever exchanges slots, so
/// the roster always ends as a complete partition.
#[derive(Debug, Clone)]
pub struct AssignmentEngine {
    spread_tolerance: f64,
    min_role_size: usize,
}

impl Default for AssignmentEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AssignmentEngine {
    pub fn new() -> Self {
        Self {
            spread_tolerance: SPREAD_TOLERANCE,
            min_role_size: MIN_ROLE_SIZE,
        }
    }

    pub fn optimize(&self, roster: &mut Roster) -> OptimizationOutcome {
        let balance = self.balance_fte_spread(roster);
        let mismatches = self.resolve_location_mismatches(roster);
        let preferences = self.maximize_preferences(roster);
        info!(
            balance_swaps = balance.iter().map(|role| role.swaps.len()).sum::<usize>(),
            mismatch_swaps = mismatches.swaps.len(),
            unresolved = mismatches.unresolved.len(),
            preference_swaps = preferences.swaps.len(),
            "optimizations finished"
        );
        OptimizationOutcome {
            balance,
            mismatches,
            preferences,
        }
    }

    /// Pass 1: per role, repeatedly trade the lowest-FTE holder in the
    /// lowest-mean location for the highest-FTE holder in the highest-mean one.
    pub fn balance_fte_spread(&self, roster: &mut Roster) -> Vec<RoleBalance> {
        info!("optimizing FTE distribution");
        let roles = roster.roles().to_vec();
        roles
            .iter()
            .map(|role| self.balance_role(roster, role))
            .collect()
    }

    fn balance_role(&self, roster: &mut Roster, role: &str) -> RoleBalance {
        let headcount = roster.count_in_role(role);
        let mut balance = RoleBalance {
            role: role.to_string(),
            headcount,
            attempts: 0,
            swaps: Vec::new(),
            halt: BalanceHalt::AttemptsExhausted,
        };

        if headcount < self.min_role_size {
            info!(role, headcount, "skipped FTE balancing, too few employees");
            balance.halt = BalanceHalt::TooFewEmployees;
            return balance;
        }

        for location in roster.locations_mut() {
            location.sort_by_fte();
        }

        // f64 is not Hash; the bit pattern is exact for values seen twice.
        let mut seen_lowest: HashSet<u64> = HashSet::with_capacity(headcount);
        let mut seen_highest: HashSet<u64> = HashSet::with_capacity(headcount);

        for _ in 0..headcount {
            balance.attempts += 1;
            let locations = roster.locations();
            let (Some(low), Some(high)) = (
                stats::location_with_lowest_fte_mean(locations, role),
                stats::location_with_highest_fte_mean(locations, role),
            ) else {
                continue;
            };

            let lowest = locations[low].fte_mean_for_role(role);
            let highest = locations[high].fte_mean_for_role(role);
            if seen_lowest.contains(&lowest.to_bits()) || seen_highest.contains(&highest.to_bits()) {
                info!(role, lowest, highest, "stopped FTE balancing, mean repeats an earlier state");
                balance.halt = BalanceHalt::RepeatedState;
                return balance;
            }
            seen_lowest.insert(lowest.to_bits());
            seen_highest.insert(highest.to_bits());

            if lowest / highest > self.spread_tolerance {
                info!(role, lowest, highest, "FTE mean spread already within tolerance");
                balance.halt = BalanceHalt::WithinTolerance;
                return balance;
            }

            let (Some(low_index), Some(high_index)) = (
                locations[low].index_of_lowest_fte(role),
                locations[high].index_of_highest_fte(role),
            ) else {
                continue;
            };
            let swap = exchange(
                roster,
                SlotRef::new(low, low_index),
                SlotRef::new(high, high_index),
            );
            balance.swaps.push(swap);
        }

        balance
    }

    /// Pass 2: move employees stationed at neither preference to a location
    /// they asked for, trading with an interchangeable employee who wants the
    /// vacated location. Each location is swept once.
    pub fn resolve_location_mismatches(&self, roster: &mut Roster) -> MismatchOutcome {
        info!("minimizing location mismatches");
        let mut outcome = MismatchOutcome::default();

        for home in 0..roster.locations().len() {
            if roster.locations()[home].index_of_location_mismatch(0).is_none() {
                debug!(location = roster.locations()[home].name(), "no location mismatches");
                continue;
            }

            let mut cursor = 0;
            while cursor < roster.locations()[home].len() {
                let Some(index) = roster.locations()[home].index_of_location_mismatch(cursor) else {
                    break;
                };
                cursor = index + 1;

                let slot = SlotRef::new(home, index);
                match find_mismatch_partner(roster, slot) {
                    Some(partner) => outcome.swaps.push(exchange(roster, slot, partner)),
                    None => {
                        let location = &roster.locations()[home];
                        let employee = &location.employees()[index];
                        warn!(
                            employee = %employee.name,
                            location = location.name(),
                            "unable to solve location mismatch"
                        );
                        outcome.unresolved.push(UnresolvedMismatch {
                            employee: employee.name.clone(),
                            location: location.name().to_string(),
                        });
                    }
                }
            }
        }

        outcome
    }

    /// Pass 3: for each employee parked at their second choice, trade with
    /// every interchangeable employee elsewhere for whom the exchange is also
    /// a move to their first choice. The partner scan does not stop at the
    /// first hit.
    pub fn maximize_preferences(&self, roster: &mut Roster) -> PreferenceOutcome {
        info!("optimizing preferences");
        let mut outcome = PreferenceOutcome::default();
        let location_count = roster.locations().len();

        for home in 0..location_count {
            let mut cursor = 0;
            while cursor < roster.locations()[home].len() {
                let Some(index) = roster.locations()[home].index_of_second_preference_holder(cursor)
                else {
                    break;
                };
                cursor = index + 1;

                let holder = roster.locations()[home].employees()[index].clone();
                for other in 0..location_count {
                    if other == home {
                        continue;
                    }
                    let locations = roster.locations();
                    let Some(partner) = locations[other]
                        .index_of_first_preference_holder(&holder, locations[home].name())
                    else {
                        continue;
                    };
                    let swap = exchange(
                        roster,
                        SlotRef::new(home, index),
                        SlotRef::new(other, partner),
                    );
                    outcome.swaps.push(swap);
                }
            }
        }

        if outcome.swaps.is_empty() {
            info!("no employees were moved to their first preference");
        }
        outcome
    }
}

fn find_mismatch_partner(roster: &Roster, slot: SlotRef) -> Option<SlotRef> {
    let locations = roster.locations();
    let home = &locations[slot.location];
    let stranded = &home.employees()[slot.index];

    // Only the first preferred location is tried.
    let (candidate, location) = locations
        .iter()
        .enumerate()
        .find(|(index, location)| *index != slot.location && stranded.prefers(location.name()))?;

    location
        .index_of_location_match(stranded, home.name())
        .map(|index| SlotRef::new(candidate, index))
}

fn exchange(roster: &mut Roster, a: SlotRef, b: SlotRef) -> Swap {
    let locations = roster.locations();
    let (from_a, from_b) = (locations[a.location].name(), locations[b.location].name());
    let (moving_a, moving_b) = (
        &locations[a.location].employees()[a.index],
        &locations[b.location].employees()[b.index],
    );
    debug!(employee = %moving_b.name, fte = moving_b.fte, from = from_b, to = from_a, "moving employee");
    debug!(employee = %moving_a.name, fte = moving_a.fte, from = from_a, to = from_b, "moving employee");

    let swap = Swap {
        first: Relocation {
            employee: moving_a.name.clone(),
            from: from_a.to_string(),
            to: from_b.to_string(),
        },
        second: Relocation {
            employee: moving_b.name.clone(),
            from: from_b.to_string(),
            to: from_a.to_string(),
        },
    };
    roster.swap(a, b);
    swap
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::{Employee, Location};

    fn names(roster: &Roster, location: usize) -> Vec<&str> {
        roster.locations()[location]
            .employees()
            .iter()
            .map(|employee| employee.name.as_str())
            .collect()
    }

    fn seeded(employees: Vec<Employee>) -> Roster {
        let mut roster = Roster::discover(employees);
        roster.seed_round_robin();
        roster
    }

    #[test]
    fn balancer_skips_roles_below_minimum_size() {
        let mut roster = seeded(vec![
            Employee::new("Ada", "North", "South", 41, 0.2, "Nurse"),
            Employee::new("Bo", "South", "North", 29, 1.0, "Nurse"),
        ]);

        let balance = AssignmentEngine::new().balance_fte_spread(&mut roster);
        assert_eq!(balance.len(), 1);
        assert_eq!(balance[0].halt, BalanceHalt::TooFewEmployees);
        assert_eq!(balance[0].attempts, 0);
        assert_eq!(names(&roster, 0), ["Ada"]);
    }

    #[test]
    fn balancer_stops_when_a_mean_repeats() {
        let mut roster = seeded(vec![
            Employee::new("A", "X", "Y", 30, 0.8, "Eng"),
            Employee::new("B", "Y", "X", 28, 0.4, "Eng"),
            Employee::new("C", "X", "Z", 35, 0.6, "Eng"),
        ]);

        let balance = AssignmentEngine::new().balance_fte_spread(&mut roster);
        assert_eq!(balance[0].swaps.len(), 1);
        assert_eq!(balance[0].halt, BalanceHalt::RepeatedState);
        assert!(balance[0].attempts <= balance[0].headcount);
        assert_eq!(names(&roster, 0), ["B"]);
        assert_eq!(names(&roster, 1), ["A"]);
        assert_eq!(names(&roster, 2), ["C"]);
    }

    #[test]
    fn balancer_leaves_even_spread_untouched() {
        let mut roster = seeded(vec![
            Employee::new("Ada", "North", "South", 41, 0.5, "Nurse"),
            Employee::new("Bo", "South", "North", 29, 0.5, "Nurse"),
            Employee::new("Cy", "North", "South", 35, 0.5, "Nurse"),
            Employee::new("Di", "South", "North", 35, 0.5, "Nurse"),
        ]);

        let balance = AssignmentEngine::new().balance_fte_spread(&mut roster);
        assert_eq!(balance[0].halt, BalanceHalt::WithinTolerance);
        assert!(balance[0].swaps.is_empty());
        assert_eq!(balance[0].attempts, 1);
    }

    #[test]
    fn mismatch_is_resolved_with_an_interchangeable_partner() {
        let mut roster = Roster::from_partition(vec![
            Location::with_employees(
                "North",
                vec![Employee::new("Ada", "South", "East", 41, 0.5, "Nurse")],
            ),
            Location::with_employees(
                "South",
                vec![Employee::new("Bo", "North", "West", 29, 0.5, "Nurse")],
            ),
        ]);

        let outcome = AssignmentEngine::new().resolve_location_mismatches(&mut roster);
        assert_eq!(outcome.swaps.len(), 1);
        assert!(outcome.unresolved.is_empty());
        assert_eq!(
            outcome.swaps[0].first,
            Relocation {
                employee: "Ada".to_string(),
                from: "North".to_string(),
                to: "South".to_string(),
            }
        );
        assert_eq!(names(&roster, 0), ["Bo"]);
        assert_eq!(names(&roster, 1), ["Ada"]);
    }

    #[test]
    fn mismatch_only_tries_the_first_preferred_location() {
        let mut roster = Roster::from_partition(vec![
            Location::with_employees(
                "North",
                vec![Employee::new("Ada", "South", "East", 41, 0.5, "Nurse")],
            ),
            Location::with_employees(
                "South",
                vec![Employee::new("Bo", "North", "South", 29, 0.6, "Nurse")],
            ),
            Location::with_employees(
                "East",
                vec![Employee::new("Cy", "North", "East", 35, 0.5, "Nurse")],
            ),
        ]);

        let outcome = AssignmentEngine::new().resolve_location_mismatches(&mut roster);
        assert!(outcome.swaps.is_empty());
        assert_eq!(
            outcome.unresolved,
            [UnresolvedMismatch {
                employee: "Ada".to_string(),
                location: "North".to_string(),
            }]
        );
        assert_eq!(names(&roster, 0), ["Ada"]);
    }

    #[test]
    fn preference_swap_moves_both_to_first_choice() {
        let mut roster = Roster::from_partition(vec![
            Location::with_employees(
                "North",
                vec![
                    Employee::new("Ada", "South", "North", 41, 0.5, "Nurse"),
                    Employee::new("Ed", "North", "South", 50, 0.5, "Nurse"),
                ],
            ),
            Location::with_employees(
                "South",
                vec![
                    Employee::new("Bo", "North", "South", 29, 0.5, "Nurse"),
                    Employee::new("Cy", "North", "South", 35, 0.7, "Nurse"),
                ],
            ),
        ]);
        let before = stats::count_at_first_preference(roster.locations());

        let outcome = AssignmentEngine::new().maximize_preferences(&mut roster);
        assert_eq!(outcome.swaps.len(), 1);
        assert_eq!(names(&roster, 0), ["Bo", "Ed"]);
        assert_eq!(names(&roster, 1), ["Ada", "Cy"]);
        assert_eq!(stats::count_at_first_preference(roster.locations()), before + 2);
    }

    #[test]
    fn optimize_totals_every_pass() {
        let mut roster = seeded(vec![
            Employee::new("A", "X", "Y", 30, 0.8, "Eng"),
            Employee::new("B", "Y", "X", 28, 0.4, "Eng"),
            Employee::new("C", "X", "Z", 35, 0.6, "Eng"),
        ]);

        let outcome = AssignmentEngine::new().optimize(&mut roster);
        assert_eq!(outcome.balance_swaps(), 1);
        assert_eq!(outcome.total_swaps(), 1);
        assert!(outcome.mismatches.unresolved.is_empty());
    }
}

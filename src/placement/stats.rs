//! Roster-wide derivations used by the partitioner, the passes and the report.

use super::employee::Employee;
use super::location::Location;
use std::collections::{BTreeSet, HashSet};

/// Distinct roles, sorted.
pub fn distinct_roles(employees: &[Employee]) -> Vec<String> {
    employees
        .iter()
        .map(|employee| employee.role.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// One empty location per distinct preference value, in order of first
/// appearance (pref1 before pref2, row by row).
pub fn discover_locations(employees: &[Employee]) -> Vec<Location> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut locations = Vec::new();
    for employee in employees {
        for name in [employee.pref1.as_str(), employee.pref2.as_str()] {
            if seen.insert(name) {
                locations.push(Location::new(name));
            }
        }
    }
    locations
}

pub fn count_in_role(employees: &[Employee], role: &str) -> usize {
    employees
        .iter()
        .filter(|employee| employee.role == role)
        .count()
}

pub fn fte_mean(employees: &[Employee]) -> f64 {
    mean(employees.iter().map(|employee| employee.fte))
}

pub fn fte_mean_for_role(employees: &[Employee], role: &str) -> f64 {
    mean(
        employees
            .iter()
            .filter(|employee| employee.role == role)
            .map(|employee| employee.fte),
    )
}

/// Alias of [`fte_mean`] for the whole roster.
pub fn global_fte_mean(employees: &[Employee]) -> f64 {
    fte_mean(employees)
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Index of the location with the lowest role mean among those holding the
/// role. Ties go to the earliest location.
pub fn location_with_lowest_fte_mean(locations: &[Location], role: &str) -> Option<usize> {
    location_with_extreme_fte_mean(locations, role, |candidate, best| candidate < best)
}

/// Index of the location with the highest role mean among those holding the
/// role. Ties go to the earliest location.
pub fn location_with_highest_fte_mean(locations: &[Location], role: &str) -> Option<usize> {
    location_with_extreme_fte_mean(locations, role, |candidate, best| candidate > best)
}

fn location_with_extreme_fte_mean(
    locations: &[Location],
    role: &str,
    beats: impl Fn(f64, f64) -> bool,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, location) in locations.iter().enumerate() {
        if !location.has_role(role) {
            continue;
        }
        let mean = location.fte_mean_for_role(role);
        match best {
            Some((_, best_mean)) if !beats(mean, best_mean) => {}
            _ => best = Some((index, mean)),
        }
    }
    best.map(|(index, _)| index)
}

pub fn count_at_first_preference(locations: &[Location]) -> usize {
    locations
        .iter()
        .map(|location| {
            location
                .employees()
                .iter()
                .filter(|employee| employee.is_first_preference(location.name()))
                .count()
        })
        .sum()
}

/// Employees at their second choice. An employee whose two preferences are
/// the same location counts as a first-preference holder only.
pub fn count_at_second_preference(locations: &[Location]) -> usize {
    locations
        .iter()
        .map(|location| {
            location
                .employees()
                .iter()
                .filter(|employee| {
                    employee.is_second_preference(location.name())
                        && !employee.is_first_preference(location.name())
                })
                .count()
        })
        .sum()
}

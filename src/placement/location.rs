use super::employee::Employee;
use super::stats;
use serde::Serialize;
use std::fmt;

/// A named bucket of employees. Slot order only matters transiently: the
/// balancing pass sorts by FTE so the extreme holders are found positionally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    name: String,
    employees: Vec<Employee>,
}

impl Location {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            employees: Vec::with_capacity(20),
        }
    }

    pub fn with_employees(name: impl Into<String>, employees: Vec<Employee>) -> Self {
        Self {
            name: name.into(),
            employees,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn employee(&self, index: usize) -> Option<&Employee> {
        self.employees.get(index)
    }

    pub fn add_employee(&mut self, employee: Employee) {
        self.employees.push(employee);
    }

    pub(crate) fn clear(&mut self) {
        self.employees.clear();
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut Employee {
        &mut self.employees[index]
    }

    pub(crate) fn swap_slots(&mut self, a: usize, b: usize) {
        self.employees.swap(a, b);
    }

    /// Mean FTE over every employee here; NaN when empty.
    pub fn fte_mean(&self) -> f64 {
        stats::fte_mean(&self.employees)
    }

    /// Mean FTE restricted to `role`; NaN when nobody here holds it.
    pub fn fte_mean_for_role(&self, role: &str) -> f64 {
        stats::fte_mean_for_role(&self.employees, role)
    }

    pub fn count_in_role(&self, role: &str) -> usize {
        stats::count_in_role(&self.employees, role)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.employees.iter().any(|employee| employee.role == role)
    }

    pub fn sort_by_fte(&mut self) {
        self.employees.sort_by(|a, b| a.fte.total_cmp(&b.fte));
    }

    /// First holder of the smallest FTE within `role`.
    pub fn index_of_lowest_fte(&self, role: &str) -> Option<usize> {
        self.index_of_extreme_fte(role, |candidate, best| candidate < best)
    }

    /// First holder of the largest FTE within `role`.
    pub fn index_of_highest_fte(&self, role: &str) -> Option<usize> {
        self.index_of_extreme_fte(role, |candidate, best| candidate > best)
    }

    fn index_of_extreme_fte(&self, role: &str, beats: impl Fn(f64, f64) -> bool) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, employee) in self.employees.iter().enumerate() {
            if employee.role != role {
                continue;
            }
            match best {
                Some((_, fte)) if !beats(employee.fte, fte) => {}
                _ => best = Some((index, employee.fte)),
            }
        }
        best.map(|(index, _)| index)
    }

    /// First employee at or after `from` stationed somewhere they never asked for.
    pub fn index_of_location_mismatch(&self, from: usize) -> Option<usize> {
        self.position_from(from, |employee| !employee.prefers(&self.name))
    }

    /// First employee interchangeable with `target` who would accept a move to
    /// `wanted_location`.
    pub fn index_of_location_match(&self, target: &Employee, wanted_location: &str) -> Option<usize> {
        self.employees.iter().position(|employee| {
            employee.is_interchangeable_with(target) && employee.prefers(wanted_location)
        })
    }

    /// First employee at or after `from` who sits at their second choice.
    pub fn index_of_second_preference_holder(&self, from: usize) -> Option<usize> {
        self.position_from(from, |employee| employee.is_second_preference(&self.name))
    }

    /// First employee interchangeable with `target` whose first choice is
    /// `source_location`, provided `target`'s own first choice is this location.
    /// Swapping the two puts both at their first preference.
    pub fn index_of_first_preference_holder(
        &self,
        target: &Employee,
        source_location: &str,
    ) -> Option<usize> {
        if !target.is_first_preference(&self.name) {
            return None;
        }
        self.employees.iter().position(|employee| {
            employee.is_interchangeable_with(target) && employee.is_first_preference(source_location)
        })
    }

    fn position_from(&self, from: usize, predicate: impl Fn(&Employee) -> bool) -> Option<usize> {
        self.employees
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, employee)| predicate(employee))
            .map(|(index, _)| index)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

use serde::Serialize;
use std::fmt;

/// A single roster entry. Never mutated after import; the optimization passes
/// only move values between location slots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Employee {
    pub name: String,
    pub pref1: String,
    pub pref2: String,
    pub age: u32,
    pub fte: f64,
    pub role: String,
}

impl Employee {
    pub fn new(
        name: impl Into<String>,
        pref1: impl Into<String>,
        pref2: impl Into<String>,
        age: u32,
        fte: f64,
        role: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            pref1: pref1.into(),
            pref2: pref2.into(),
            age,
            fte,
            role: role.into(),
        }
    }

    /// True when the location is either of the employee's preferences.
    pub fn prefers(&self, location: &str) -> bool {
        self.pref1 == location || self.pref2 == location
    }

    pub fn is_first_preference(&self, location: &str) -> bool {
        self.pref1 == location
    }

    pub fn is_second_preference(&self, location: &str) -> bool {
        self.pref2 == location
    }

    /// Same FTE and same role, so exchanging the two leaves every per-role
    /// mean untouched.
    pub fn is_interchangeable_with(&self, other: &Employee) -> bool {
        self.fte == other.fte && self.role == other.role
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{name={};role={};pref1={};pref2={};age={};fte={}}}",
            self.name, self.role, self.pref1, self.pref2, self.age, self.fte
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preference_checks_use_value_equality() {
        let owned_location = String::from("North");
        let employee = Employee::new("Ada", "North", "South", 41, 0.8, "Nurse");

        assert!(employee.prefers(&owned_location));
        assert!(employee.prefers("South"));
        assert!(!employee.prefers("East"));
        assert!(employee.is_first_preference("North"));
        assert!(employee.is_second_preference("South"));
        assert!(!employee.is_second_preference("North"));
    }

    #[test]
    fn interchangeable_requires_matching_fte_and_role() {
        let a = Employee::new("Ada", "North", "South", 41, 0.8, "Nurse");
        let b = Employee::new("Bo", "South", "North", 29, 0.8, "Nurse");
        let c = Employee::new("Cy", "South", "North", 29, 0.8, "Porter");
        let d = Employee::new("Di", "South", "North", 29, 0.6, "Nurse");

        assert!(a.is_interchangeable_with(&b));
        assert!(!a.is_interchangeable_with(&c));
        assert!(!a.is_interchangeable_with(&d));
    }
}

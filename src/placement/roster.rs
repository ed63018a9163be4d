use super::employee::Employee;
use super::location::Location;
use super::stats;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

/// Addresses one employee slot: a location index and a position inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRef {
    pub location: usize,
    pub index: usize,
}

impl SlotRef {
    pub const fn new(location: usize, index: usize) -> Self {
        Self { location, index }
    }
}

/// The loaded employees together with the roles and locations discovered
/// from them. Owns every location bucket; the optimization passes mutate the
/// partition only through [`Roster::swap`].
#[derive(Debug, Clone)]
pub struct Roster {
    employees: Vec<Employee>,
    roles: Vec<String>,
    locations: Vec<Location>,
}

impl Roster {
    pub fn discover(employees: Vec<Employee>) -> Self {
        let roles = stats::distinct_roles(&employees);
        let locations = stats::discover_locations(&employees);
        info!(
            employees = employees.len(),
            roles = roles.len(),
            locations = locations.len(),
            "discovered roster layout"
        );
        debug!(roles = %roles.join(", "), "extracted employee roles");
        debug!(
            locations = %locations
                .iter()
                .map(Location::name)
                .collect::<Vec<_>>()
                .join(", "),
            "extracted location names"
        );
        Self {
            employees,
            roles,
            locations,
        }
    }

    /// Rebuilds a roster around an existing partition, e.g. one produced by
    /// an earlier run. The employee list is the concatenation of all buckets.
    pub fn from_partition(locations: Vec<Location>) -> Self {
        let employees: Vec<Employee> = locations
            .iter()
            .flat_map(|location| location.employees().iter().cloned())
            .collect();
        let roles = stats::distinct_roles(&employees);
        Self {
            employees,
            roles,
            locations,
        }
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub(crate) fn locations_mut(&mut self) -> &mut [Location] {
        &mut self.locations
    }

    pub fn location(&self, index: usize) -> Option<&Location> {
        self.locations.get(index)
    }

    pub fn count_in_role(&self, role: &str) -> usize {
        stats::count_in_role(&self.employees, role)
    }

    /// Number of employees currently placed across all locations.
    pub fn assigned_count(&self) -> usize {
        self.locations.iter().map(Location::len).sum()
    }

    /// Reorders the employee list with a deterministic RNG. Only meaningful
    /// before [`Roster::seed_round_robin`]: it decides which employee of a
    /// role lands where.
    pub fn shuffle(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        self.employees.shuffle(&mut rng);
        debug!(seed, "shuffled employee list");
    }

    /// Initial partition: stable sort by role, then deal employee `i` to
    /// location `i mod n`. Any previous assignment is discarded.
    pub fn seed_round_robin(&mut self) {
        for location in &mut self.locations {
            location.clear();
        }
        if self.locations.is_empty() {
            return;
        }

        let mut by_role: Vec<&Employee> = self.employees.iter().collect();
        by_role.sort_by(|a, b| a.role.cmp(&b.role));

        let count = self.locations.len();
        for (position, employee) in by_role.into_iter().enumerate() {
            self.locations[position % count].add_employee(employee.clone());
        }
        info!(
            employees = self.employees.len(),
            locations = count,
            "seeded locations round-robin by role"
        );
    }

    pub fn employee_at(&self, slot: SlotRef) -> Option<&Employee> {
        self.locations
            .get(slot.location)
            .and_then(|location| location.employee(slot.index))
    }

    /// Exchanges the occupants of two slots. Panics when either slot is out
    /// of range, which would be a bug in the caller's index bookkeeping.
    pub fn swap(&mut self, a: SlotRef, b: SlotRef) {
        if a.location == b.location {
            self.locations[a.location].swap_slots(a.index, b.index);
            return;
        }
        let (first, second) = pair_mut(&mut self.locations, a.location, b.location);
        std::mem::swap(first.slot_mut(a.index), second.slot_mut(b.index));
    }
}

fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (head, tail) = items.split_at_mut(b);
        (&mut head[a], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(a);
        (&mut tail[0], &mut head[b])
    }
}

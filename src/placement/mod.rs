pub mod employee;
pub mod engine;
pub mod location;
pub mod report;
pub mod roster;
pub mod stats;

pub use employee::Employee;
pub use engine::{
    AssignmentEngine, BalanceHalt, MismatchOutcome, OptimizationOutcome, PreferenceOutcome,
    Relocation, RoleBalance, Swap, UnresolvedMismatch, MIN_ROLE_SIZE, SPREAD_TOLERANCE,
};
pub use location::Location;
pub use report::{LocationSummary, PassSummary, PlacementReport, RoleBalanceSummary};
pub use roster::{Roster, SlotRef};

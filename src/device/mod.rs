//! In-memory model of the timer station under test.

pub mod message;
pub mod model;
pub mod snapshot;

pub use self::message::{Penalty, SolveMessage};
pub use self::model::DeviceModel;
pub use self::snapshot::{ButtonEvent, Snapshot, StateDump, SNAPSHOT_FIELDS};

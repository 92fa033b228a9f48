//! Machine-readable outcome of a suite run.

pub mod model;

pub use self::model::status::Status;
pub use self::model::test_result::{FailureDetail, RunReport, StepRecord, TestReport};

use crate::app::context::Context;
use crate::app::{assert, capture, operation};
use crate::configuration::step::Step;
use crate::device::model::DeviceModel;
use crate::error::StepError;

/// Human-readable note of what a step did, or why it failed.
pub type ExecutionResult = Result<String, StepError>;

pub(crate) trait Executable {
    fn execute(&self, model: &mut DeviceModel, ctx: &mut Context) -> ExecutionResult;
}

impl Executable for Step {
    fn execute(&self, model: &mut DeviceModel, ctx: &mut Context) -> ExecutionResult {
        match self {
            Step::Sleep(ms) => operation::sleep(ctx, *ms),
            Step::ScanCard(registrant_id) => operation::scan_card(model, ctx, *registrant_id),
            Step::Snapshot => capture::snapshot(model),
            Step::ResetState => operation::reset_state(model),
            Step::SolveTime(Some(ms)) => operation::solve_time(model, *ms),
            Step::SolveTime(None) | Step::SolveTimeRng => operation::solve_time_rng(model, ctx),
            Step::Button(press) => operation::press(model, ctx, press),
            Step::DelegateResolve(resolution) => {
                operation::delegate_resolve(model, ctx, resolution)
            }
            Step::VerifySolveTime(expected) => assert::verify_solve_time(model, expected),
            Step::VerifySend(expected) => assert::verify_send(model, expected),
            Step::VerifyDelegateSent => assert::verify_delegate_sent(model),
            Step::VerifySnapshot(fields) => capture::verify_snapshot(model, fields.as_deref()),
            Step::Unsupported(kind) => Err(StepError::UnsupportedStep {
                step_type: kind.clone(),
            }),
        }
    }
}

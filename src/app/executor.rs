use crate::app::context::Context;
use crate::app::hooks::Executable;
use crate::configuration::suite::Test;
use crate::device::model::DeviceModel;
use crate::device::snapshot::StateDump;
use crate::reporter::{FailureDetail, StepRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestState {
    Idle,
    Running,
    Passed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunInfo {
    pub sleep_between: u64,
    pub continue_on_failure: bool,
    pub dump_state: bool,
}

impl RunInfo {
    pub fn new(sleep_between: u64, continue_on_failure: bool, dump_state: bool) -> Self {
        Self {
            sleep_between,
            continue_on_failure,
            dump_state,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TestOutcome {
    pub state: TestState,
    pub steps: Vec<StepRecord>,
    pub failures: Vec<FailureDetail>,
    pub dump: Option<StateDump>,
    pub clock_ms: u64,
}

/// Drives the steps of one test against a station it owns.
pub(crate) struct TestRunner<'t> {
    test: &'t Test,
    info: RunInfo,
    state: TestState,
}

impl<'t> TestRunner<'t> {
    pub fn new(test: &'t Test, info: RunInfo) -> Self {
        Self {
            test,
            info,
            state: TestState::Idle,
        }
    }

    #[inline]
    pub fn state(&self) -> TestState {
        self.state
    }

    pub fn run(&mut self, mut ctx: Context) -> TestOutcome {
        let mut model = DeviceModel::new();
        let mut steps = Vec::with_capacity(self.test.steps.len());
        let mut failures = Vec::new();
        self.state = TestState::Running;
        debug!("Test '{}' running with seed {}", self.test.name, ctx.seed());

        for (index, step) in self.test.steps.iter().enumerate() {
            if index > 0 {
                ctx.advance(self.info.sleep_between);
            }
            match step.execute(&mut model, &mut ctx) {
                Ok(message) => {
                    trace!("[{}] {} ok: {}", index, step.name(), message);
                    steps.push(StepRecord::passed(index, step.name(), message));
                }
                Err(error) => {
                    warn!(
                        "Test '{}' step {} ({}) failed: {}",
                        self.test.name,
                        index,
                        step.name(),
                        error
                    );
                    steps.push(StepRecord::failed(index, step.name(), &error));
                    failures.push(FailureDetail {
                        step_index: index,
                        step_type: step.name().to_owned(),
                        error,
                    });
                    if !self.info.continue_on_failure {
                        break;
                    }
                }
            }
        }

        self.state = if failures.is_empty() {
            TestState::Passed
        } else {
            TestState::Failed
        };
        let dump = if self.info.dump_state {
            Some(ctx.dump(&model))
        } else {
            None
        };
        TestOutcome {
            state: self.state,
            steps,
            failures,
            dump,
            clock_ms: ctx.now(),
        }
    }
}

pub(crate) mod assert;
pub(crate) mod capture;
pub(crate) mod context;
pub(crate) mod executor;
pub(crate) mod hooks;
pub(crate) mod operation;

use crate::app::context::ContextPool;
use crate::app::executor::{RunInfo, TestRunner, TestState};
use crate::configuration::settings::Settings;
use crate::configuration::suite::{Suite, Test};
use crate::random::{seed_for_test, SeededTimeProvider};
use crate::reporter::{RunReport, Status, TestReport};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

pub struct App {
    suite: Suite,
    settings: Settings,
    times: SeededTimeProvider,
}

impl App {
    pub fn new(suite: Suite, settings: Settings) -> Self {
        let times = settings.time_provider();
        App {
            suite,
            settings,
            times,
        }
    }

    pub fn run(&self) -> RunReport {
        self.run_until(&AtomicBool::new(false))
    }

    /// Runs every test in declared order. `cancel` and the configured timeout
    /// are checked between tests; once either trips the remaining tests are
    /// left out and the report is marked interrupted.
    pub fn run_until(&self, cancel: &AtomicBool) -> RunReport {
        let started = Instant::now();
        let pool = ContextPool::new(&self.suite, &self.times, self.settings.pacing());
        let mut report = RunReport::new(self.settings.seed);
        info!(
            "Starting {} tests with seed {}",
            self.suite.tests.len(),
            self.settings.seed
        );

        for (index, test) in self.suite.tests.iter().enumerate() {
            if cancel.load(Ordering::SeqCst) {
                warn!("Run cancelled before test '{}'", test.name);
                report.interrupt();
                break;
            }
            if let Some(timeout) = self.settings.timeout {
                if started.elapsed() >= timeout {
                    warn!(
                        "Run timed out after {:?} before test '{}'",
                        timeout, test.name
                    );
                    report.interrupt();
                    break;
                }
            }
            if !self.settings.selects(&test.name) {
                debug!("Skipping test '{}'", test.name);
                match TestReport::builder()
                    .name(test.name.as_str())
                    .status(Status::Skipped)
                    .build()
                {
                    Ok(skipped) => report.push(skipped),
                    Err(e) => error!("Cannot build report of test '{}': {}", test.name, e),
                }
                continue;
            }
            let seed = seed_for_test(
                self.settings.seed,
                index,
                self.settings.per_test_seed,
                test.seed,
            );
            match self.run_test(&pool, test, seed) {
                Ok(test_report) => report.push(test_report),
                Err(e) => error!("Cannot build report of test '{}': {}", test.name, e),
            }
        }

        info!(
            "Finished: {} passed, {} failed, {} skipped{}",
            report.passed(),
            report.failed(),
            report.skipped(),
            if report.is_interrupted() {
                " (interrupted)"
            } else {
                ""
            }
        );
        report
    }

    fn run_test(&self, pool: &ContextPool, test: &Test, seed: u64) -> Result<TestReport, String> {
        info!("Test '{}' ({} steps)", test.name, test.steps.len());
        let now = Instant::now();
        let info = RunInfo::new(
            test.sleep_between,
            self.settings.continue_on_failure,
            self.suite.dump_state_after_test,
        );
        let mut runner = TestRunner::new(test, info);
        let outcome = runner.run(pool.new_context(seed));
        let status = match runner.state() {
            TestState::Passed => Status::Passed,
            _ => Status::Failed,
        };
        info!(
            "Test '{}' {} at logical {} ms, elapsed {:?} ms",
            test.name,
            status,
            outcome.clock_ms,
            now.elapsed().as_millis()
        );
        TestReport::builder()
            .name(test.name.as_str())
            .status(status)
            .seed(Some(seed))
            .clock_ms(outcome.clock_ms)
            .steps(outcome.steps)
            .failures(outcome.failures)
            .dump(outcome.dump)
            .build()
    }
}

use crate::device::snapshot::StateDump;
use crate::error::StepError;
use crate::reporter::model::status::Status;
use serde_derive::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::Path;

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    pub index: usize,
    pub step_type: String,
    pub ok: bool,
    pub message: String,
}

impl StepRecord {
    pub fn passed(index: usize, step_type: &str, message: String) -> Self {
        Self {
            index,
            step_type: step_type.to_owned(),
            ok: true,
            message,
        }
    }

    pub fn failed(index: usize, step_type: &str, error: &StepError) -> Self {
        Self {
            index,
            step_type: step_type.to_owned(),
            ok: false,
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FailureDetail {
    pub step_index: usize,
    pub step_type: String,
    pub error: StepError,
}

#[derive(Debug, Serialize, Clone, Builder)]
#[serde(rename_all = "camelCase")]
pub struct TestReport {
    #[builder(setter(into))]
    name: String,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default = "None")]
    seed: Option<u64>,
    /// Logical time at which the test stopped.
    #[builder(default = "0")]
    clock_ms: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[builder(default = "Vec::new()")]
    steps: Vec<StepRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[builder(default = "Vec::new()")]
    failures: Vec<FailureDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default = "None")]
    dump: Option<StateDump>,
}

impl TestReport {
    pub fn builder() -> TestReportBuilder {
        TestReportBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn failures(&self) -> &[FailureDetail] {
        &self.failures
    }

    pub fn dump(&self) -> Option<&StateDump> {
        self.dump.as_ref()
    }
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    started_at: String,
    seed: u64,
    interrupted: bool,
    passed: usize,
    failed: usize,
    skipped: usize,
    tests: Vec<TestReport>,
}

impl RunReport {
    pub fn new(seed: u64) -> Self {
        Self {
            started_at: chrono::Local::now().to_rfc3339(),
            seed,
            interrupted: false,
            passed: 0,
            failed: 0,
            skipped: 0,
            tests: Vec::new(),
        }
    }

    pub fn push(&mut self, report: TestReport) {
        match report.status {
            Status::Passed => self.passed += 1,
            Status::Failed => self.failed += 1,
            Status::Skipped => self.skipped += 1,
        }
        self.tests.push(report);
    }

    /// Marks the run as stopped before every test got to execute.
    pub fn interrupt(&mut self) {
        self.interrupted = true;
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    pub fn tests(&self) -> &[TestReport] {
        &self.tests
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && !self.interrupted
    }

    pub fn save_into_file(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

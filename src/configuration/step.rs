//! Step vocabulary of both fixture generations.
//!
//! Every step is written as `{"type": "...", "data": ...}`. The older
//! generation verifies with `VerifySolveTime` / `VerifyDelegateSent`, the
//! newer one with `VerifySend` / `VerifySnapshot`; both are accepted by the
//! same [`Step`] type. A `type` that is not recognised parses into
//! [`Step::Unsupported`] and fails its test when executed, while a known
//! `type` with a malformed payload is rejected at load time.

use crate::device::message::Penalty;
use serde::de::{DeserializeOwned, Error};
use serde::{Deserialize, Deserializer};
use serde_derive::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Sleep(u64),
    ScanCard(u64),
    Snapshot,
    ResetState,
    /// `None` is the older spelling of `SolveTimeRng`.
    SolveTime(Option<u64>),
    SolveTimeRng,
    Button(ButtonPress),
    DelegateResolve(DelegateResolution),
    VerifySolveTime(Expectation),
    VerifySend(Expectation),
    VerifyDelegateSent,
    /// `None` compares every snapshot field.
    VerifySnapshot(Option<Vec<String>>),
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ButtonPress {
    pub name: String,
    /// Hold duration in milliseconds.
    #[serde(default)]
    pub time: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DelegateResolution {
    pub should_scan_cards: bool,
    #[serde(default)]
    pub penalty: Option<Penalty>,
    /// Replacement solve time decided by the delegate.
    #[serde(default)]
    pub value: Option<u64>,
}

/// Expected values of a verification; absent fields are not compared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Expectation {
    #[serde(default)]
    pub time: Option<u64>,
    #[serde(default)]
    pub penalty: Option<Penalty>,
    #[serde(default)]
    pub delegate: Option<bool>,
}

#[derive(Deserialize)]
struct RawStep {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

impl RawStep {
    fn payload<T: DeserializeOwned>(&self) -> Result<T, String> {
        serde_json::from_value(self.data.clone())
            .map_err(|err| format!("invalid data for step '{}': {}", self.kind, err))
    }

    fn unit(&self) -> Result<(), String> {
        if self.data.is_null() {
            Ok(())
        } else {
            Err(format!("step '{}' takes no data, found {}", self.kind, self.data))
        }
    }
}

impl<'de> Deserialize<'de> for Step {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawStep::deserialize(deserializer)?;
        let step = match raw.kind.as_str() {
            "Sleep" => raw.payload().map(Step::Sleep),
            "ScanCard" => raw.payload().map(Step::ScanCard),
            "Snapshot" => raw.unit().map(|_| Step::Snapshot),
            "ResetState" => raw.unit().map(|_| Step::ResetState),
            "SolveTime" => raw.payload().map(Step::SolveTime),
            "SolveTimeRng" => raw.unit().map(|_| Step::SolveTimeRng),
            "Button" => raw.payload().map(Step::Button),
            "DelegateResolve" => raw.payload().map(Step::DelegateResolve),
            "VerifySolveTime" => raw.payload().map(Step::VerifySolveTime),
            "VerifySend" => raw.payload().map(Step::VerifySend),
            "VerifyDelegateSent" => raw.unit().map(|_| Step::VerifyDelegateSent),
            "VerifySnapshot" => raw.payload().map(Step::VerifySnapshot),
            other => Ok(Step::Unsupported(other.to_owned())),
        };
        step.map_err(D::Error::custom)
    }
}

impl Step {
    /// The `type` discriminator this step was written with.
    pub fn name(&self) -> &str {
        match self {
            Step::Sleep(_) => "Sleep",
            Step::ScanCard(_) => "ScanCard",
            Step::Snapshot => "Snapshot",
            Step::ResetState => "ResetState",
            Step::SolveTime(_) => "SolveTime",
            Step::SolveTimeRng => "SolveTimeRng",
            Step::Button(_) => "Button",
            Step::DelegateResolve(_) => "DelegateResolve",
            Step::VerifySolveTime(_) => "VerifySolveTime",
            Step::VerifySend(_) => "VerifySend",
            Step::VerifyDelegateSent => "VerifyDelegateSent",
            Step::VerifySnapshot(_) => "VerifySnapshot",
            Step::Unsupported(kind) => kind,
        }
    }

    /// Whether the step belongs to the older verification vocabulary.
    pub fn is_legacy(&self) -> bool {
        matches!(self, Step::VerifySolveTime(_) | Step::VerifyDelegateSent)
    }
}

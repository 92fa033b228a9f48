use crate::configuration::step::Step;
use crate::connection::{ButtonInput, CardReader};
use crate::device::snapshot::SNAPSHOT_FIELDS;
use crate::error::{LoadError, StepError};
use serde_derive::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::convert::TryFrom;
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub can_compete: bool,
    pub name: String,
    pub registrant_id: u64,
    pub wca_id: String,
    #[serde(default)]
    pub groups: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub group_id: String,
    #[serde(default)]
    pub use_inspection: bool,
    #[serde(default)]
    pub secondary_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonAction {
    #[serde(alias = "submit")]
    Submit,
    #[serde(alias = "penalty")]
    Penalty,
    #[serde(alias = "delegate")]
    Delegate,
    #[serde(alias = "inspection")]
    Inspection,
    #[serde(alias = "clear")]
    Clear,
}

impl ButtonAction {
    /// Action implied by a conventional button name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "submit" | "ok" | "confirm" => Some(ButtonAction::Submit),
            "penalty" => Some(ButtonAction::Penalty),
            "delegate" => Some(ButtonAction::Delegate),
            "inspection" => Some(ButtonAction::Inspection),
            "clear" | "reset" => Some(ButtonAction::Clear),
            _ => None,
        }
    }
}

/// Bindings are a pin list in older fixtures and an object in newer ones.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawBinding {
    Pins(Vec<u8>),
    Detailed {
        #[serde(default)]
        pins: Vec<u8>,
        #[serde(default)]
        action: Option<ButtonAction>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonBinding {
    pub pins: Vec<u8>,
    pub action: ButtonAction,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Test {
    pub name: String,
    /// Logical delay between consecutive steps, in milliseconds.
    #[serde(default, with = "crate::configuration::deserialize::millis")]
    pub sleep_between: u64,
    /// Overrides the seed the runner would assign to this test.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// First group, in declared order, the card belongs to.
pub fn group_for<'g>(groups: &'g [Group], card: &Card) -> Option<&'g Group> {
    groups
        .iter()
        .find(|group| card.groups.contains(&group.group_id))
}

/// Fixture document exactly as written, before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuiteDocument {
    #[serde(default)]
    dump_state_after_test: bool,
    #[serde(default)]
    groups: Vec<Group>,
    #[serde(default)]
    cards: BTreeMap<u64, Card>,
    #[serde(default)]
    buttons: BTreeMap<String, RawBinding>,
    tests: Vec<Test>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardTable(BTreeMap<u64, Card>);

impl CardTable {
    pub fn get(&self, registrant_id: u64) -> Option<&Card> {
        self.0.get(&registrant_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl CardReader for CardTable {
    fn scan(&self, registrant_id: u64) -> Result<&Card, StepError> {
        self.get(registrant_id)
            .ok_or(StepError::UnknownCard { registrant_id })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonTable(BTreeMap<String, ButtonBinding>);

impl ButtonTable {
    pub fn get(&self, name: &str) -> Option<&ButtonBinding> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl ButtonInput for ButtonTable {
    fn bind(&self, name: &str) -> Result<ButtonAction, StepError> {
        self.get(name)
            .map(|binding| binding.action)
            .ok_or_else(|| StepError::UnknownButton {
                name: name.to_owned(),
            })
    }
}

/// A validated fixture. Read-only once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Suite {
    pub dump_state_after_test: bool,
    pub groups: Vec<Group>,
    pub cards: CardTable,
    pub buttons: ButtonTable,
    pub tests: Vec<Test>,
}

impl Suite {
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let suite = text.parse::<Suite>()?;
        info!(
            "Loaded fixture {} with {} tests, {} cards, {} buttons",
            path.display(),
            suite.tests.len(),
            suite.cards.len(),
            suite.buttons.len()
        );
        Ok(suite)
    }

    pub fn group_of(&self, card: &Card) -> Option<&Group> {
        group_for(&self.groups, card)
    }

    fn warn_dangling_references(&self) {
        for test in &self.tests {
            for (index, step) in test.steps.iter().enumerate() {
                match step {
                    Step::ScanCard(id) if self.cards.get(*id).is_none() => warn!(
                        "Test '{}' step {} scans card {} which is not in the suite",
                        test.name, index, id
                    ),
                    Step::Button(press) if self.buttons.get(&press.name).is_none() => warn!(
                        "Test '{}' step {} presses unbound button '{}'",
                        test.name, index, press.name
                    ),
                    Step::Unsupported(kind) => warn!(
                        "Test '{}' step {} has unsupported type '{}' and will fail",
                        test.name, index, kind
                    ),
                    _ => {}
                }
            }
        }
    }

    fn warn_legacy_delegate_overrides(&self) {
        let legacy = self
            .tests
            .iter()
            .flat_map(|test| test.steps.iter())
            .any(Step::is_legacy);
        if !legacy {
            return;
        }
        for test in &self.tests {
            for (index, step) in test.steps.iter().enumerate() {
                if let Step::DelegateResolve(resolution) = step {
                    if resolution.penalty.is_none() || resolution.value.is_none() {
                        warn!(
                            "Test '{}' step {} omits penalty or value on DelegateResolve; \
                             older fixtures required both, absent overrides now keep the current result",
                            test.name, index
                        );
                    }
                }
            }
        }
    }
}

impl FromStr for Suite {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let document: SuiteDocument = serde_json::from_str(s)?;
        Suite::try_from(document)
    }
}

impl TryFrom<SuiteDocument> for Suite {
    type Error = LoadError;

    fn try_from(document: SuiteDocument) -> Result<Self, Self::Error> {
        let mut group_ids = HashSet::new();
        for group in &document.groups {
            if !group_ids.insert(group.group_id.as_str()) {
                return Err(LoadError::schema(format!(
                    "group '{}' is declared more than once",
                    group.group_id
                )));
            }
        }

        for (key, card) in &document.cards {
            if *key != card.registrant_id {
                return Err(LoadError::schema(format!(
                    "card under key {} has registrantId {}",
                    key, card.registrant_id
                )));
            }
            if let Some(missing) = card
                .groups
                .iter()
                .find(|group| !group_ids.contains(group.as_str()))
            {
                return Err(LoadError::schema(format!(
                    "card {} belongs to undeclared group '{}'",
                    key, missing
                )));
            }
        }

        let mut buttons = BTreeMap::new();
        for (name, raw) in document.buttons {
            let (pins, action) = match raw {
                RawBinding::Pins(pins) => (pins, None),
                RawBinding::Detailed { pins, action } => (pins, action),
            };
            let action = action
                .or_else(|| ButtonAction::from_name(&name))
                .ok_or_else(|| {
                    LoadError::schema(format!(
                        "button '{}' has no action and its name does not imply one",
                        name
                    ))
                })?;
            buttons.insert(name, ButtonBinding { pins, action });
        }

        for test in &document.tests {
            for step in &test.steps {
                if let Step::VerifySnapshot(Some(fields)) = step {
                    if let Some(unknown) = fields
                        .iter()
                        .find(|field| !SNAPSHOT_FIELDS.contains(&field.as_str()))
                    {
                        return Err(LoadError::schema(format!(
                            "test '{}' verifies unknown snapshot field '{}'",
                            test.name, unknown
                        )));
                    }
                }
            }
        }

        let suite = Suite {
            dump_state_after_test: document.dump_state_after_test,
            groups: document.groups,
            cards: CardTable(document.cards),
            buttons: ButtonTable(buttons),
            tests: document.tests,
        };
        suite.warn_dangling_references();
        suite.warn_legacy_delegate_overrides();
        Ok(suite)
    }
}

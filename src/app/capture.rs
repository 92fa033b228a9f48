use crate::app::hooks::ExecutionResult;
use crate::device::model::DeviceModel;
use crate::device::snapshot::{Snapshot, SNAPSHOT_FIELDS};
use crate::error::{Precondition, StepError};
use serde_json::{Map, Value};

pub(crate) trait Capturable {
    fn capture(&self) -> Result<Map<String, Value>, StepError>;
}

impl Capturable for Snapshot {
    fn capture(&self) -> Result<Map<String, Value>, StepError> {
        into_fields(serde_json::to_value(self))
    }
}

fn into_fields(value: serde_json::Result<Value>) -> Result<Map<String, Value>, StepError> {
    let reason = match value {
        Ok(Value::Object(fields)) => return Ok(fields),
        Ok(other) => format!("snapshot is not an object: {}", other),
        Err(e) => e.to_string(),
    };
    error!("Failed to capture snapshot: {}", reason);
    Err(StepError::Capture { reason })
}

pub(crate) fn snapshot(model: &mut DeviceModel) -> ExecutionResult {
    let snapshot = model.take_snapshot();
    Ok(format!(
        "snapshot taken (card {:?}, time {:?})",
        snapshot.scanned_card.as_ref().map(|card| card.registrant_id),
        snapshot.solve_time
    ))
}

/// Compares the station against the stored snapshot. `fields` narrows the
/// comparison; fields are visited in [`SNAPSHOT_FIELDS`] order.
pub(crate) fn verify_snapshot(model: &DeviceModel, fields: Option<&[String]>) -> ExecutionResult {
    let stored = model
        .last_snapshot()
        .ok_or_else(|| StepError::precondition(Precondition::NoSnapshot))?
        .capture()?;
    let current = model.snapshot().capture()?;
    let selected = SNAPSHOT_FIELDS
        .iter()
        .filter(|field| {
            fields.map_or(true, |list| list.iter().any(|f| f.as_str() == **field))
        });
    let mut compared = 0;
    for field in selected {
        let (expected, actual) = match (stored.get(*field), current.get(*field)) {
            (Some(expected), Some(actual)) => (expected, actual),
            _ => {
                return Err(StepError::Capture {
                    reason: format!("snapshot has no field '{}'", field),
                })
            }
        };
        if expected != actual {
            return Err(StepError::verification(
                *field,
                expected.clone(),
                actual.clone(),
            ));
        }
        compared += 1;
    }
    Ok(format!("{} snapshot fields match", compared))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::configuration::suite::Card;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn card() -> Card {
        Card {
            can_compete: true,
            name: "Ada".to_owned(),
            registrant_id: 42,
            wca_id: "2019LOVE01".to_owned(),
            groups: BTreeSet::new(),
        }
    }

    #[test]
    fn test_verify_without_snapshot() {
        let model = DeviceModel::new();

        assert_eq!(
            verify_snapshot(&model, None),
            Err(StepError::precondition(Precondition::NoSnapshot))
        );
    }

    #[test]
    fn test_snapshot_captures_scanned_card() {
        let mut model = DeviceModel::new();
        model.scan_card(&card(), None).unwrap();
        snapshot(&mut model).unwrap();

        let stored = model.last_snapshot().unwrap().capture().unwrap();

        assert_eq!(stored["scannedCard"]["registrantId"], json!(42));
        assert_eq!(verify_snapshot(&model, None).map(|_| ()), Ok(()));
    }

    #[test]
    fn test_field_subset_ignores_other_changes() {
        let mut model = DeviceModel::new();
        model.scan_card(&card(), None).unwrap();
        snapshot(&mut model).unwrap();
        model.set_solve_time(3000);

        let subset = vec!["scannedCard".to_owned(), "penalty".to_owned()];
        assert!(verify_snapshot(&model, Some(&subset)).is_ok());
        assert_eq!(
            verify_snapshot(&model, None),
            Err(StepError::verification("solveTime", Value::Null, json!(3000)))
        );
    }

    #[test]
    fn test_capture_failure_is_a_step_error() {
        let not_an_object = into_fields(Ok(json!(3)));
        let broken = into_fields(serde_json::from_str::<Value>("{"));

        assert_eq!(not_an_object.unwrap_err().kind(), "Capture");
        assert_eq!(broken.unwrap_err().kind(), "Capture");
    }
}

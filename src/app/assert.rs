use crate::app::hooks::ExecutionResult;
use crate::configuration::step::Expectation;
use crate::device::message::{Penalty, SolveMessage};
use crate::device::model::DeviceModel;
use crate::error::StepError;
use serde_json::{json, Value};

pub trait Assertable<T> {
    fn assert(&self, data: &T) -> Result<(), StepError>;
}

/// Result fields a verification step looks at, from either the station or
/// the last sent message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observed {
    pub time: Option<u64>,
    pub penalty: Penalty,
    pub delegate: bool,
}

impl From<&SolveMessage> for Observed {
    fn from(message: &SolveMessage) -> Self {
        Self {
            time: message.time,
            penalty: message.penalty,
            delegate: message.delegate,
        }
    }
}

impl Assertable<Observed> for Expectation {
    fn assert(&self, data: &Observed) -> Result<(), StepError> {
        trace!("Asserting {:?} against {:?}", self, data);
        if let Some(time) = self.time {
            if data.time != Some(time) {
                return Err(StepError::verification(
                    "time",
                    json!(time),
                    json!(data.time),
                ));
            }
        }
        if let Some(penalty) = self.penalty {
            if data.penalty != penalty {
                return Err(StepError::verification(
                    "penalty",
                    json!(penalty),
                    json!(data.penalty),
                ));
            }
        }
        if let Some(delegate) = self.delegate {
            if data.delegate != delegate {
                return Err(StepError::verification(
                    "delegate",
                    json!(delegate),
                    json!(data.delegate),
                ));
            }
        }
        Ok(())
    }
}

pub(crate) fn verify_solve_time(model: &DeviceModel, expected: &Expectation) -> ExecutionResult {
    let observed = Observed {
        time: model.solve_time(),
        penalty: model.penalty(),
        delegate: model.delegate_pending(),
    };
    expected.assert(&observed)?;
    Ok(format!("solve time matches {:?}", observed.time))
}

pub(crate) fn verify_send(model: &DeviceModel, expected: &Expectation) -> ExecutionResult {
    let message = model.last_sent_message().ok_or_else(|| {
        StepError::verification("lastSent", json!(expected), Value::Null)
    })?;
    expected.assert(&Observed::from(message))?;
    Ok(format!("sent message {} matches", message))
}

pub(crate) fn verify_delegate_sent(model: &DeviceModel) -> ExecutionResult {
    match model.last_sent_message() {
        Some(message) if message.delegate => Ok(format!("delegate message {} sent", message)),
        Some(message) => Err(StepError::verification(
            "delegate",
            json!(true),
            json!(message.delegate),
        )),
        None => Err(StepError::verification("lastSent", json!({"delegate": true}), Value::Null)),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::configuration::suite::{ButtonAction, Card};
    use crate::connection::outbox::Outbox;
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

    fn expect(time: Option<u64>, penalty: Option<Penalty>, delegate: Option<bool>) -> Expectation {
        Expectation {
            time,
            penalty,
            delegate,
        }
    }

    #[test]
    fn test_empty_expectation_is_a_wildcard() {
        let observed = Observed {
            time: None,
            penalty: Penalty::Dnf,
            delegate: true,
        };

        assert_eq!(Expectation::default().assert(&observed), Ok(()));
    }

    #[test]
    fn test_solve_time_mismatch_reports_values() {
        let mut model = DeviceModel::new();
        model.set_solve_time(1500);

        let result = verify_solve_time(&model, &expect(Some(1000), Some(Penalty::None), None));

        assert_eq!(
            result,
            Err(StepError::verification("time", json!(1000), json!(1500)))
        );
    }

    #[test]
    fn test_solve_time_match_with_penalty_none() {
        let mut model = DeviceModel::new();
        model.set_solve_time(1000);

        assert!(verify_solve_time(&model, &expect(Some(1000), Some(Penalty::None), None)).is_ok());
    }

    #[test]
    fn test_first_mismatch_wins() {
        let observed = Observed {
            time: Some(5),
            penalty: Penalty::PlusTwo,
            delegate: false,
        };

        let result = expect(Some(5), Some(Penalty::Dnf), Some(true)).assert(&observed);

        assert_eq!(
            result,
            Err(StepError::verification("penalty", json!(-1), json!(2)))
        );
    }

    #[test]
    fn test_verify_send_without_message() {
        let model = DeviceModel::new();

        match verify_send(&model, &expect(Some(1), None, None)) {
            Err(StepError::Verification { field, actual, .. }) => {
                assert_eq!(field, "lastSent");
                assert_eq!(actual, Value::Null);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_verify_delegate_sent() {
        let mut model = DeviceModel::new();
        let mut outbox = Outbox::default();
        model.scan_card(&card(), None).unwrap();
        model.set_solve_time(2000);
        assert!(verify_delegate_sent(&model).is_err());

        model.press_button(ButtonAction::Submit, &mut outbox).unwrap();
        assert_eq!(
            verify_delegate_sent(&model),
            Err(StepError::verification("delegate", json!(true), json!(false)))
        );

        model.press_button(ButtonAction::Delegate, &mut outbox).unwrap();
        assert!(verify_delegate_sent(&model).is_ok());
        assert!(verify_send(&model, &expect(Some(2000), None, Some(true))).is_ok());
    }
}

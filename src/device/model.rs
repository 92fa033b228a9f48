use crate::configuration::suite::{ButtonAction, Card, Group};
use crate::connection::MessageSink;
use crate::device::message::{Penalty, SolveMessage};
use crate::device::snapshot::Snapshot;
use crate::error::{Precondition, StepError};

/// State machine of one station. Only step executors mutate it; the default
/// value is the idle state every test starts from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceModel {
    scanned_card: Option<Card>,
    active_group: Option<Group>,
    inspection_active: bool,
    solve_time: Option<u64>,
    penalty: Option<Penalty>,
    delegate_pending: bool,
    last_sent: Option<SolveMessage>,
    last_snapshot: Option<Snapshot>,
}

impl DeviceModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a competitor. `group` is the group the competitor is
    /// currently called up in and decides whether inspection runs.
    pub fn scan_card(&mut self, card: &Card, group: Option<&Group>) -> Result<(), StepError> {
        if !card.can_compete {
            return Err(StepError::InvalidCard {
                registrant_id: card.registrant_id,
            });
        }
        self.scanned_card = Some(card.clone());
        self.active_group = group.cloned();
        self.inspection_active = group.map_or(false, |group| group.use_inspection);
        Ok(())
    }

    pub fn reset_state(&mut self) {
        *self = Self::default();
    }

    pub fn set_solve_time(&mut self, ms: u64) {
        self.solve_time = Some(ms);
        self.penalty = None;
        self.inspection_active = false;
    }

    pub fn press_button<S>(&mut self, action: ButtonAction, sink: &mut S) -> Result<(), StepError>
    where
        S: MessageSink + ?Sized,
    {
        match action {
            ButtonAction::Submit => {
                if self.scanned_card.is_none() {
                    return Err(StepError::precondition(Precondition::NoCardScanned));
                }
                let time = self.require_solve_time()?;
                if self.delegate_pending {
                    return Err(StepError::precondition(Precondition::DelegatePending));
                }
                let message = SolveMessage {
                    time: Some(time),
                    penalty: self.penalty(),
                    delegate: false,
                };
                self.send(message, sink);
            }
            ButtonAction::Penalty => {
                self.require_solve_time()?;
                self.penalty = Some(self.penalty().cycle());
            }
            ButtonAction::Delegate => {
                let time = self.require_solve_time()?;
                let message = SolveMessage {
                    time: Some(time),
                    penalty: self.penalty(),
                    delegate: true,
                };
                self.send(message, sink);
                self.delegate_pending = true;
            }
            ButtonAction::Inspection => self.inspection_active = !self.inspection_active,
            ButtonAction::Clear => {
                self.solve_time = None;
                self.penalty = None;
            }
        }
        Ok(())
    }

    /// Applies a delegate's decision and sends the resolved result. Absent
    /// overrides keep the station's current value; with neither a `value` nor
    /// a recorded time the message goes out without one.
    pub fn resolve_delegate<S>(
        &mut self,
        should_scan_cards: bool,
        penalty: Option<Penalty>,
        value: Option<u64>,
        sink: &mut S,
    ) -> Result<SolveMessage, StepError>
    where
        S: MessageSink + ?Sized,
    {
        if should_scan_cards && self.scanned_card.is_none() {
            return Err(StepError::precondition(Precondition::NoCardScanned));
        }
        let time = value.or(self.solve_time);
        let penalty = penalty.unwrap_or_else(|| self.penalty());
        self.solve_time = time;
        self.penalty = Some(penalty);
        self.delegate_pending = false;
        let message = SolveMessage {
            time,
            penalty,
            delegate: true,
        };
        self.send(message.clone(), sink);
        Ok(message)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            scanned_card: self.scanned_card.clone(),
            group_id: self.active_group.as_ref().map(|g| g.group_id.clone()),
            secondary_text: self.active_group.as_ref().map(|g| g.secondary_text.clone()),
            inspection_active: self.inspection_active,
            solve_time: self.solve_time,
            penalty: self.penalty(),
            delegate_pending: self.delegate_pending,
            last_sent: self.last_sent.clone(),
        }
    }

    /// Stores the current snapshot for a later `VerifySnapshot`.
    pub fn take_snapshot(&mut self) -> &Snapshot {
        let snapshot = self.snapshot();
        self.last_snapshot.insert(snapshot)
    }

    pub fn last_snapshot(&self) -> Option<&Snapshot> {
        self.last_snapshot.as_ref()
    }

    pub fn last_sent_message(&self) -> Option<&SolveMessage> {
        self.last_sent.as_ref()
    }

    pub fn scanned_card(&self) -> Option<&Card> {
        self.scanned_card.as_ref()
    }

    pub fn solve_time(&self) -> Option<u64> {
        self.solve_time
    }

    /// No recorded penalty reads as [`Penalty::None`].
    pub fn penalty(&self) -> Penalty {
        self.penalty.unwrap_or_default()
    }

    pub fn delegate_pending(&self) -> bool {
        self.delegate_pending
    }

    pub fn inspection_active(&self) -> bool {
        self.inspection_active
    }

    fn require_solve_time(&self) -> Result<u64, StepError> {
        self.solve_time
            .ok_or_else(|| StepError::precondition(Precondition::NoSolveTime))
    }

    fn send<S>(&mut self, message: SolveMessage, sink: &mut S)
    where
        S: MessageSink + ?Sized,
    {
        sink.send(&message);
        self.last_sent = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::outbox::Outbox;
    use std::collections::BTreeSet;

    fn card(registrant_id: u64, can_compete: bool) -> Card {
        Card {
            can_compete,
            name: format!("Competitor {}", registrant_id),
            registrant_id,
            wca_id: format!("2020TEST{:02}", registrant_id),
            groups: BTreeSet::new(),
        }
    }

    fn group(use_inspection: bool) -> Group {
        Group {
            group_id: "333-r1-g1".to_owned(),
            use_inspection,
            secondary_text: "3x3 Round 1".to_owned(),
        }
    }

    #[test]
    fn test_scan_card_applies_group_inspection() {
        let mut model = DeviceModel::new();
        model.scan_card(&card(1, true), Some(&group(true))).unwrap();

        assert!(model.inspection_active());
        let snapshot = model.snapshot();
        assert_eq!(snapshot.group_id.as_deref(), Some("333-r1-g1"));
        assert_eq!(snapshot.secondary_text.as_deref(), Some("3x3 Round 1"));
    }

    #[test]
    fn test_scan_card_that_cannot_compete() {
        let mut model = DeviceModel::new();
        let result = model.scan_card(&card(7, false), None);

        assert_eq!(result, Err(StepError::InvalidCard { registrant_id: 7 }));
        assert_eq!(model, DeviceModel::default());
    }

    #[test]
    fn test_solve_time_ends_inspection_and_clears_penalty() {
        let mut model = DeviceModel::new();
        let mut outbox = Outbox::default();
        model.scan_card(&card(1, true), Some(&group(true))).unwrap();
        model.set_solve_time(9000);
        model.press_button(ButtonAction::Penalty, &mut outbox).unwrap();
        assert_eq!(model.penalty(), Penalty::PlusTwo);

        model.set_solve_time(8000);

        assert!(!model.inspection_active());
        assert_eq!(model.penalty(), Penalty::None);
        assert_eq!(model.solve_time(), Some(8000));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut model = DeviceModel::new();
        let mut outbox = Outbox::default();
        model.scan_card(&card(1, true), None).unwrap();
        model.set_solve_time(1234);
        model.press_button(ButtonAction::Delegate, &mut outbox).unwrap();
        model.take_snapshot();

        model.reset_state();
        assert_eq!(model, DeviceModel::default());
        model.reset_state();
        assert_eq!(model, DeviceModel::default());
    }

    #[test]
    fn test_submit_requires_card_and_time() {
        let mut model = DeviceModel::new();
        let mut outbox = Outbox::default();

        assert_eq!(
            model.press_button(ButtonAction::Submit, &mut outbox),
            Err(StepError::precondition(Precondition::NoCardScanned))
        );
        model.scan_card(&card(1, true), None).unwrap();
        assert_eq!(
            model.press_button(ButtonAction::Submit, &mut outbox),
            Err(StepError::precondition(Precondition::NoSolveTime))
        );
        model.set_solve_time(10_500);
        model.press_button(ButtonAction::Submit, &mut outbox).unwrap();

        let expected = SolveMessage {
            time: Some(10_500),
            penalty: Penalty::None,
            delegate: false,
        };
        assert_eq!(model.last_sent_message(), Some(&expected));
        assert_eq!(outbox.sent(), &[expected]);
    }

    #[test]
    fn test_submit_blocked_while_delegate_pending() {
        let mut model = DeviceModel::new();
        let mut outbox = Outbox::default();
        model.scan_card(&card(1, true), None).unwrap();
        model.set_solve_time(10_500);
        model.press_button(ButtonAction::Delegate, &mut outbox).unwrap();

        assert!(model.delegate_pending());
        assert_eq!(
            model.press_button(ButtonAction::Submit, &mut outbox),
            Err(StepError::precondition(Precondition::DelegatePending))
        );
    }

    #[test]
    fn test_resolve_delegate_requires_scan_when_asked() {
        let mut model = DeviceModel::new();
        let mut outbox = Outbox::default();
        model.set_solve_time(2000);

        let result = model.resolve_delegate(true, None, None, &mut outbox);

        assert_eq!(
            result,
            Err(StepError::precondition(Precondition::NoCardScanned))
        );
        assert!(model.last_sent_message().is_none());
        assert!(outbox.sent().is_empty());
    }

    #[test]
    fn test_resolve_delegate_applies_overrides() {
        let mut model = DeviceModel::new();
        let mut outbox = Outbox::default();
        model.scan_card(&card(1, true), None).unwrap();
        model.set_solve_time(2000);
        model.press_button(ButtonAction::Delegate, &mut outbox).unwrap();

        let message = model
            .resolve_delegate(true, Some(Penalty::Dnf), Some(2500), &mut outbox)
            .unwrap();

        assert_eq!(
            message,
            SolveMessage {
                time: Some(2500),
                penalty: Penalty::Dnf,
                delegate: true
            }
        );
        assert!(!model.delegate_pending());
        assert_eq!(model.solve_time(), Some(2500));
        assert_eq!(outbox.sent().len(), 2);
    }

    #[test]
    fn test_resolve_delegate_after_scan_without_time() {
        let mut model = DeviceModel::new();
        let mut outbox = Outbox::default();
        model.scan_card(&card(42, true), None).unwrap();

        let message = model
            .resolve_delegate(true, None, None, &mut outbox)
            .unwrap();

        assert_eq!(
            message,
            SolveMessage {
                time: None,
                penalty: Penalty::None,
                delegate: true
            }
        );
        assert_eq!(model.last_sent_message(), Some(&message));
        assert_eq!(model.solve_time(), None);

        model
            .resolve_delegate(false, None, Some(700), &mut outbox)
            .unwrap();
        assert_eq!(model.solve_time(), Some(700));
        assert_eq!(outbox.sent().len(), 2);
    }

    #[test]
    fn test_clear_and_inspection_buttons() {
        let mut model = DeviceModel::new();
        let mut outbox = Outbox::default();
        model.set_solve_time(3000);
        model.press_button(ButtonAction::Inspection, &mut outbox).unwrap();
        assert!(model.inspection_active());

        model.press_button(ButtonAction::Clear, &mut outbox).unwrap();

        assert_eq!(model.solve_time(), None);
        assert!(model.inspection_active());
        assert!(outbox.sent().is_empty());
    }
}

use crate::configuration::suite::{group_for, ButtonAction, Card, Group, Suite};
use crate::connection::outbox::Outbox;
use crate::connection::{ButtonInput, CardReader};
use crate::device::model::DeviceModel;
use crate::device::snapshot::{ButtonEvent, StateDump};
use crate::error::StepError;
use crate::random::{RngCursor, TimeProvider};
use crate::time::clock::{LogicalClock, Pacing};
use derivative::*;

/// Suite-wide, read-only collaborators shared by every test of a run.
#[derive(Derivative)]
#[derivative(Debug)]
pub(crate) struct ContextPool<'a> {
    #[derivative(Debug = "ignore")]
    cards: &'a dyn CardReader,
    #[derivative(Debug = "ignore")]
    buttons: &'a dyn ButtonInput,
    #[derivative(Debug = "ignore")]
    times: &'a dyn TimeProvider,
    groups: &'a [Group],
    pacing: Pacing,
}

impl<'a> ContextPool<'a> {
    pub fn new(suite: &'a Suite, times: &'a dyn TimeProvider, pacing: Pacing) -> Self {
        Self {
            cards: &suite.cards,
            buttons: &suite.buttons,
            times,
            groups: &suite.groups,
            pacing,
        }
    }

    /// Fresh per-test state: clock at zero, empty outbox, RNG at call zero.
    pub fn new_context(&self, seed: u64) -> Context<'a> {
        Context {
            cards: self.cards,
            buttons: self.buttons,
            times: self.times,
            groups: self.groups,
            clock: LogicalClock::new(self.pacing),
            rng: RngCursor::new(seed),
            outbox: Outbox::default(),
            button_events: Vec::new(),
        }
    }
}

#[derive(Derivative)]
#[derivative(Debug)]
pub struct Context<'a> {
    #[derivative(Debug = "ignore")]
    cards: &'a dyn CardReader,
    #[derivative(Debug = "ignore")]
    buttons: &'a dyn ButtonInput,
    #[derivative(Debug = "ignore")]
    times: &'a dyn TimeProvider,
    groups: &'a [Group],
    clock: LogicalClock,
    rng: RngCursor,
    outbox: Outbox,
    button_events: Vec<ButtonEvent>,
}

impl<'a> Context<'a> {
    pub fn scan(&self, registrant_id: u64) -> Result<&'a Card, StepError> {
        let cards: &'a dyn CardReader = self.cards;
        cards.scan(registrant_id)
    }

    pub fn group_of(&self, card: &Card) -> Option<&'a Group> {
        group_for(self.groups, card)
    }

    pub fn bind(&self, name: &str) -> Result<ButtonAction, StepError> {
        self.buttons.bind(name)
    }

    pub fn draw_time(&mut self) -> u64 {
        self.rng.draw(self.times)
    }

    #[inline]
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    pub fn advance(&mut self, ms: u64) {
        self.clock.advance(ms);
    }

    pub fn record_press(&mut self, event: ButtonEvent) {
        self.button_events.push(event);
    }

    pub fn outbox_mut(&mut self) -> &mut Outbox {
        &mut self.outbox
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn dump(&self, model: &DeviceModel) -> StateDump {
        StateDump {
            snapshot: model.snapshot(),
            last_snapshot: model.last_snapshot().cloned(),
            clock_ms: self.clock.now(),
            button_events: self.button_events.clone(),
            sent: self.outbox.sent().to_vec(),
            rng_draws: self.rng.drawn().to_vec(),
        }
    }
}

//! Capability seams between the interpreter and the station's peripherals.
//!
//! The interpreter only ever talks to a card reader, a set of input buttons
//! and an upstream message channel through these traits. The suite's card
//! and button tables implement the first two, [`outbox::Outbox`] records
//! everything written to the third.

pub mod outbox;

use crate::configuration::suite::{ButtonAction, Card};
use crate::device::message::SolveMessage;
use crate::error::StepError;

pub trait CardReader {
    fn scan(&self, registrant_id: u64) -> Result<&Card, StepError>;
}

pub trait ButtonInput {
    fn bind(&self, name: &str) -> Result<ButtonAction, StepError>;
}

pub trait MessageSink {
    fn send(&mut self, message: &SolveMessage);
}

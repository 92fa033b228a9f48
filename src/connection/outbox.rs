use crate::connection::MessageSink;
use crate::device::message::SolveMessage;

/// Sink that keeps every message in send order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outbox {
    sent: Vec<SolveMessage>,
}

impl Outbox {
    pub fn sent(&self) -> &[SolveMessage] {
        &self.sent
    }
}

impl MessageSink for Outbox {
    fn send(&mut self, message: &SolveMessage) {
        debug!("Sending result: {}", message);
        self.sent.push(message.clone());
    }
}

//! Event types and handling for the exchange model
//!
//! The dependency graph between fields and the readiness flag is small and
//! static, so notifications are delivered through a typed handler trait
//! rather than a string-keyed observer table. Consumers can observe either
//! by closure or through a crossbeam channel.

use std::fmt;

use crossbeam_channel::{Receiver, Sender, unbounded};

/// Fields of the exchange model that raise change notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Command class (CLA)
    Class,
    /// Instruction code (INS)
    Ins,
    /// First parameter (P1)
    P1,
    /// Second parameter (P2)
    P2,
    /// Expected response length (Le)
    Le,
    /// Command data payload
    Data,
    /// First response status byte
    Sw1,
    /// Second response status byte
    Sw2,
    /// Response data payload
    ResponseData,
    /// Status line summarizing the last transmit outcome
    Status,
}

impl Field {
    /// The field name used to key notifications
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Class => "Class",
            Self::Ins => "Ins",
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::Le => "Le",
            Self::Data => "Data",
            Self::Sw1 => "SW1",
            Self::Sw2 => "SW2",
            Self::ResponseData => "ResponseData",
            Self::Status => "Status",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Events emitted by the exchange model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeEvent {
    /// A field's display text or derived value changed
    FieldChanged(Field),
    /// The transmit-readiness predicate was recomputed
    TransmitReady(bool),
}

/// Trait for handling exchange events
pub trait ExchangeEventHandler {
    /// Handle an exchange event
    fn handle_event(&mut self, event: ExchangeEvent);
}

// Implement the handler for closures
impl<F> ExchangeEventHandler for F
where
    F: FnMut(ExchangeEvent),
{
    fn handle_event(&mut self, event: ExchangeEvent) {
        self(event)
    }
}

/// Sender for exchange events
pub type ExchangeEventSender = Sender<ExchangeEvent>;
/// Receiver for exchange events
pub type ExchangeEventReceiver = Receiver<ExchangeEvent>;

/// Create an unbounded channel for exchange events
///
/// Subscribe the sender through a closure:
///
/// ```
/// use cardlab_apdu_exchange::event::exchange_event_channel;
///
/// let (tx, rx) = exchange_event_channel();
/// let handler = move |event| {
///     let _ = tx.send(event);
/// };
/// # let _ = (handler, rx);
/// ```
pub fn exchange_event_channel() -> (ExchangeEventSender, ExchangeEventReceiver) {
    unbounded()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names() {
        assert_eq!(Field::Class.name(), "Class");
        assert_eq!(Field::Sw1.name(), "SW1");
        assert_eq!(Field::ResponseData.to_string(), "ResponseData");
    }

    #[test]
    fn test_channel_delivery() {
        let (tx, rx) = exchange_event_channel();
        let mut handler = move |event| {
            let _ = tx.send(event);
        };

        handler.handle_event(ExchangeEvent::FieldChanged(Field::Data));
        handler.handle_event(ExchangeEvent::TransmitReady(false));

        assert_eq!(rx.recv().unwrap(), ExchangeEvent::FieldChanged(Field::Data));
        assert_eq!(rx.recv().unwrap(), ExchangeEvent::TransmitReady(false));
    }
}

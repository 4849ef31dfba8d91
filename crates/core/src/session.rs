//! Card session trait for APDU exchange
//!
//! A session is responsible for carrying one command to the card and
//! returning its response. It has no knowledge of field editing, validation
//! or display concerns; connection lifecycle (readers, protocols,
//! transactions) belongs to the implementation behind the trait.

use std::fmt;

use tracing::{debug, instrument, trace};

use crate::command::Command;
use crate::error::Error;
use crate::response::Response;

/// Trait for an established card session
///
/// `transmit` is synchronous and blocks until the implementation returns or
/// its own timeout elapses. Implementations must report a descriptive error
/// on any session-level or device-level fault.
pub trait CardSession: fmt::Debug {
    /// Check whether a card session is currently established
    fn is_connected(&self) -> bool;

    /// Exchange one command with the card and return its response
    #[instrument(level = "trace", skip_all, fields(session = std::any::type_name::<Self>()))]
    fn transmit(&mut self, command: &Command) -> Result<Response, Error> {
        trace!(command = ?hex::encode(command.to_bytes()), "Transmitting command");
        let result = self.do_transmit(command);
        match &result {
            Ok(response) => {
                trace!(response = ?hex::encode(response.to_bytes()), "Received response");
            }
            Err(e) => {
                debug!(error = ?e, "Session error during transmission");
            }
        }
        result
    }

    /// Internal implementation of transmit
    /// This is the method that concrete implementations should override
    fn do_transmit(&mut self, command: &Command) -> Result<Response, Error>;
}

/// Scripted in-memory session for tests and examples
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone, Default)]
pub struct MockSession {
    /// Scripted responses to replay
    pub responses: Vec<Response>,
    /// Commands that were transmitted
    pub commands: Vec<Command>,
    /// Whether the session reports itself connected
    pub connected: bool,
}

#[cfg(any(test, feature = "mock"))]
impl MockSession {
    /// Create a connected session replaying the given responses
    pub fn new(responses: Vec<Response>) -> Self {
        Self {
            responses,
            commands: Vec::new(),
            connected: true,
        }
    }

    /// Create a connected session that always returns the given response
    pub fn with_response(response: Response) -> Self {
        Self::new(vec![response])
    }

    /// Create a connected session that always returns success (90 00)
    pub fn with_success() -> Self {
        Self::with_response(Response::success(bytes::Bytes::new()))
    }

    /// Create a session that reports itself disconnected
    pub fn disconnected() -> Self {
        Self {
            responses: Vec::new(),
            commands: Vec::new(),
            connected: false,
        }
    }

    /// Flip the reported connection state
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }
}

#[cfg(any(test, feature = "mock"))]
impl CardSession for MockSession {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn do_transmit(&mut self, command: &Command) -> Result<Response, Error> {
        if !self.connected {
            return Err(Error::Disconnected);
        }

        self.commands.push(command.clone());

        if self.responses.is_empty() {
            return Err(Error::transmit("no scripted response"));
        }

        // Either clone the single response or take the next one
        if self.responses.len() == 1 {
            Ok(self.responses[0].clone())
        } else {
            Ok(self.responses.remove(0))
        }
    }
}

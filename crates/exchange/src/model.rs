//! Exchange model implementation
//!
//! This module provides the [`ExchangeModel`], which owns one editable APDU
//! command and at most one response, and delegates the actual exchange to a
//! [`CardSession`].

use std::fmt;

use cardlab_apdu_core::{CardSession, Command, Error, Response, hex};
use tracing::debug;

use crate::event::{ExchangeEvent, ExchangeEventHandler, Field};
use crate::field::{ByteField, DataField, DecimalField};

/// Interactive APDU exchange model over a card session
///
/// Every command field is exposed as an independently settable hex-text
/// property. The raw text is always stored for display; the byte value
/// underneath only changes on a successful parse, so partial input never
/// corrupts the command that will be transmitted. After each mutation a
/// `FieldChanged` notification is raised unconditionally, followed by a
/// `TransmitReady` notification carrying the recomputed readiness predicate.
///
/// The model is not thread-safe: callers serialize field mutations and
/// transmit calls on one logical thread of control.
pub struct ExchangeModel<S>
where
    S: CardSession,
{
    /// The session used for the exchange
    session: S,
    cla: ByteField,
    ins: ByteField,
    p1: ByteField,
    p2: ByteField,
    le: DecimalField,
    data: DataField,
    /// The last response received
    response: Option<Response>,
    /// Human-readable summary of the last transmit outcome
    status_line: String,
    handlers: Vec<Box<dyn ExchangeEventHandler>>,
}

impl<S> fmt::Debug for ExchangeModel<S>
where
    S: CardSession,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExchangeModel")
            .field("session", &self.session)
            .field("command", &self.command())
            .field("response", &self.response)
            .field("handler_count", &self.handlers.len())
            .finish()
    }
}

impl<S> ExchangeModel<S>
where
    S: CardSession,
{
    /// Create a model over the given session, editing the select-MF preset
    pub fn new(session: S) -> Self {
        Self::with_command(session, Command::select_mf())
    }

    /// Create a model over the given session, editing the given command
    pub fn with_command(session: S, command: Command) -> Self {
        Self {
            session,
            cla: ByteField::new(command.cla),
            ins: ByteField::new(command.ins),
            p1: ByteField::new(command.p1),
            p2: ByteField::new(command.p2),
            le: DecimalField::new(command.le),
            data: DataField::new(command.data),
            response: None,
            status_line: String::new(),
            handlers: Vec::new(),
        }
    }

    /// Register a handler for field-changed and readiness notifications
    pub fn subscribe(&mut self, handler: impl ExchangeEventHandler + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Get a reference to the session
    pub const fn session(&self) -> &S {
        &self.session
    }

    /// Get a mutable reference to the session
    pub const fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    /// The command assembled from the last successfully parsed field values
    pub fn command(&self) -> Command {
        Command {
            cla: self.cla.value(),
            ins: self.ins.value(),
            p1: self.p1.value(),
            p2: self.p2.value(),
            le: self.le.value(),
            data: self.data.value().clone(),
        }
    }

    /// The last response received, if any
    pub const fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    /// Summary of the last transmit outcome, empty before the first attempt
    pub fn status_line(&self) -> &str {
        &self.status_line
    }

    /// Whether the command is well-formed and the session connected
    ///
    /// True iff the class, instruction, P1 and P2 texts are each exactly two
    /// valid hex digits, the data text is empty or even-length valid hex,
    /// and the session reports itself connected. The Le text does not
    /// participate.
    pub fn transmit_ready(&self) -> bool {
        self.cla.is_valid()
            && self.ins.is_valid()
            && self.p1.is_valid()
            && self.p2.is_valid()
            && self.data.is_valid()
            && self.session.is_connected()
    }

    /// Transmit the current command over the session
    ///
    /// Callers gate this on [`transmit_ready`](Self::transmit_ready); the
    /// connection state is still checked defensively and a disconnected
    /// session reports [`Error::Disconnected`] without touching the stored
    /// response. On success the stored response is replaced and notifications
    /// are raised for each response-derived field. On failure the previous
    /// response stays untouched and the session's error is surfaced with its
    /// message. One attempt per invocation, no retry.
    pub fn transmit(&mut self) -> Result<(), Error> {
        if !self.session.is_connected() {
            let error = Error::Disconnected;
            self.set_status(error.to_string());
            return Err(error);
        }

        let command = self.command();
        match self.session.transmit(&command) {
            Ok(response) => {
                debug!(status = %response.status(), "Exchange complete");
                self.response = Some(response);
                self.set_status("Transmit successful.");
                self.emit(ExchangeEvent::FieldChanged(Field::Sw1));
                self.emit(ExchangeEvent::FieldChanged(Field::Sw2));
                self.emit(ExchangeEvent::FieldChanged(Field::ResponseData));
                Ok(())
            }
            Err(error) => {
                self.set_status(error.to_string());
                Err(error)
            }
        }
    }

    fn emit(&mut self, event: ExchangeEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(event);
        }
    }

    fn set_status(&mut self, status: impl Into<String>) {
        self.status_line = status.into();
        self.emit(ExchangeEvent::FieldChanged(Field::Status));
    }

    fn after_field_update(&mut self, field: Field) {
        self.emit(ExchangeEvent::FieldChanged(field));
        let ready = self.transmit_ready();
        self.emit(ExchangeEvent::TransmitReady(ready));
    }
}

// Command field accessors. Setters store the raw text unconditionally and
// notify even when only the display text changed.
impl<S> ExchangeModel<S>
where
    S: CardSession,
{
    /// Class field display text
    pub fn class_text(&self) -> &str {
        self.cla.text()
    }

    /// Set the class field from hex text
    pub fn set_class_text(&mut self, text: impl Into<String>) {
        self.cla.set_text(text);
        self.after_field_update(Field::Class);
    }

    /// Instruction field display text
    pub fn ins_text(&self) -> &str {
        self.ins.text()
    }

    /// Set the instruction field from hex text
    pub fn set_ins_text(&mut self, text: impl Into<String>) {
        self.ins.set_text(text);
        self.after_field_update(Field::Ins);
    }

    /// P1 field display text
    pub fn p1_text(&self) -> &str {
        self.p1.text()
    }

    /// Set the P1 field from hex text
    pub fn set_p1_text(&mut self, text: impl Into<String>) {
        self.p1.set_text(text);
        self.after_field_update(Field::P1);
    }

    /// P2 field display text
    pub fn p2_text(&self) -> &str {
        self.p2.text()
    }

    /// Set the P2 field from hex text
    pub fn set_p2_text(&mut self, text: impl Into<String>) {
        self.p2.set_text(text);
        self.after_field_update(Field::P2);
    }

    /// Le field display text, decimal
    pub fn le_text(&self) -> &str {
        self.le.text()
    }

    /// Set the Le field from decimal text (0-255)
    pub fn set_le_text(&mut self, text: impl Into<String>) {
        self.le.set_text(text);
        self.after_field_update(Field::Le);
    }

    /// Data field display text
    pub fn data_text(&self) -> &str {
        self.data.text()
    }

    /// Set the data field from hex text
    pub fn set_data_text(&mut self, text: impl Into<String>) {
        self.data.set_text(text);
        self.after_field_update(Field::Data);
    }
}

// Response field accessors, formatted via the hex codec. Each returns the
// empty string while no response has been received.
impl<S> ExchangeModel<S>
where
    S: CardSession,
{
    /// First status byte as two uppercase hex characters
    pub fn sw1_text(&self) -> String {
        self.response
            .as_ref()
            .map_or_else(String::new, |r| hex::byte_to_hex(r.status().sw1))
    }

    /// Second status byte as two uppercase hex characters
    pub fn sw2_text(&self) -> String {
        self.response
            .as_ref()
            .map_or_else(String::new, |r| hex::byte_to_hex(r.status().sw2))
    }

    /// Response data as uppercase hex, no separators
    pub fn response_data_text(&self) -> String {
        self.response
            .as_ref()
            .map_or_else(String::new, |r| hex::buffer_to_hex(r.data()))
    }
}

impl<S> ExchangeModel<S>
where
    S: CardSession,
{
    /// Consume the model and return the session
    pub fn into_session(self) -> S {
        self.session
    }

    /// Clear the stored response and status line
    pub fn clear_response(&mut self) {
        self.response = None;
        self.status_line.clear();
        self.emit(ExchangeEvent::FieldChanged(Field::Sw1));
        self.emit(ExchangeEvent::FieldChanged(Field::Sw2));
        self.emit(ExchangeEvent::FieldChanged(Field::ResponseData));
        self.emit(ExchangeEvent::FieldChanged(Field::Status));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use cardlab_apdu_core::MockSession;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn connected_model() -> ExchangeModel<MockSession> {
        ExchangeModel::new(MockSession::with_response(Response::new(
            (0x90, 0x00),
            Bytes::from_static(&[0x85, 0x10]),
        )))
    }

    #[test]
    fn default_command_is_select_mf() {
        let model = connected_model();
        assert_eq!(model.class_text(), "A0");
        assert_eq!(model.ins_text(), "A4");
        assert_eq!(model.p1_text(), "00");
        assert_eq!(model.p2_text(), "00");
        assert_eq!(model.le_text(), "0");
        assert_eq!(model.data_text(), "3F00");
        assert_eq!(model.command(), Command::select_mf());
    }

    #[test]
    fn readiness_requires_connected_session() {
        let model = ExchangeModel::new(MockSession::disconnected());
        // All fields valid, session down
        assert!(!model.transmit_ready());

        let model = connected_model();
        assert!(model.transmit_ready());
    }

    #[test]
    fn partial_class_text_keeps_parsed_byte() {
        let mut model = connected_model();
        model.set_class_text("A");

        assert_eq!(model.class_text(), "A");
        assert_eq!(model.command().cla, 0xA0);
        assert!(!model.transmit_ready());

        model.set_class_text("00");
        assert_eq!(model.command().cla, 0x00);
        assert!(model.transmit_ready());
    }

    #[test]
    fn odd_data_text_keeps_parsed_buffer() {
        let mut model = connected_model();
        model.set_data_text("3F0");

        assert_eq!(model.data_text(), "3F0");
        assert_eq!(model.command().data.as_ref(), &[0x3F, 0x00]);
        assert!(!model.transmit_ready());
    }

    #[test]
    fn empty_data_text_is_ready() {
        let mut model = connected_model();
        model.set_data_text("");
        assert_eq!(model.data_text(), "");
        assert!(model.command().data.is_empty());
        assert!(model.transmit_ready());
    }

    #[test]
    fn le_text_is_decimal() {
        let mut model = connected_model();
        model.set_le_text("16");
        assert_eq!(model.command().le, 16);

        // Hex digits are not accepted for Le
        model.set_le_text("0F");
        assert_eq!(model.le_text(), "0F");
        assert_eq!(model.command().le, 16);

        // Le validity never gates readiness
        assert!(model.transmit_ready());
    }

    #[test]
    fn transmit_replaces_response_and_formats_status_bytes() {
        let mut model = connected_model();
        assert_eq!(model.sw1_text(), "");
        assert_eq!(model.sw2_text(), "");
        assert_eq!(model.response_data_text(), "");

        model.transmit().unwrap();

        assert_eq!(model.sw1_text(), "90");
        assert_eq!(model.sw2_text(), "00");
        assert_eq!(model.response_data_text(), "8510");
        assert_eq!(model.status_line(), "Transmit successful.");

        let sent = &model.session().commands[0];
        assert_eq!(sent, &Command::select_mf());
    }

    #[test]
    fn transmit_failure_keeps_previous_response() {
        let mut model = ExchangeModel::new(MockSession::new(vec![Response::success(
            Bytes::from_static(&[0xAB]),
        )]));
        model.transmit().unwrap();
        assert_eq!(model.response_data_text(), "AB");

        // Exhaust the script: the next transmit fails at the session level
        model.session_mut().responses.clear();
        let err = model.transmit().unwrap_err();
        assert!(matches!(err, Error::Transmit(_)));

        assert_eq!(model.response_data_text(), "AB");
        assert_eq!(model.status_line(), err.to_string());
    }

    #[test]
    fn forced_transmit_while_disconnected() {
        let mut model = connected_model();
        model.transmit().unwrap();
        assert_eq!(model.sw1_text(), "90");

        model.session_mut().set_connected(false);
        assert!(!model.transmit_ready());

        let err = model.transmit().unwrap_err();
        assert!(matches!(err, Error::Disconnected));

        // Prior response untouched, nothing was sent
        assert_eq!(model.sw1_text(), "90");
        assert_eq!(model.session().commands.len(), 1);
    }

    #[test]
    fn field_set_notifies_unconditionally() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);

        let mut model = connected_model();
        model.subscribe(move |event| sink.borrow_mut().push(event));

        // Invalid text still raises FieldChanged, then readiness
        model.set_class_text("zz");
        assert_eq!(
            events.borrow().as_slice(),
            &[
                ExchangeEvent::FieldChanged(Field::Class),
                ExchangeEvent::TransmitReady(false),
            ]
        );

        events.borrow_mut().clear();
        model.set_class_text("A0");
        assert_eq!(
            events.borrow().as_slice(),
            &[
                ExchangeEvent::FieldChanged(Field::Class),
                ExchangeEvent::TransmitReady(true),
            ]
        );
    }

    #[test]
    fn transmit_notifies_response_fields() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);

        let mut model = connected_model();
        model.subscribe(move |event| sink.borrow_mut().push(event));

        model.transmit().unwrap();
        assert_eq!(
            events.borrow().as_slice(),
            &[
                ExchangeEvent::FieldChanged(Field::Status),
                ExchangeEvent::FieldChanged(Field::Sw1),
                ExchangeEvent::FieldChanged(Field::Sw2),
                ExchangeEvent::FieldChanged(Field::ResponseData),
            ]
        );
    }

    #[test]
    fn clear_response_resets_display() {
        let mut model = connected_model();
        model.transmit().unwrap();
        assert_eq!(model.sw1_text(), "90");

        model.clear_response();
        assert_eq!(model.sw1_text(), "");
        assert_eq!(model.response_data_text(), "");
        assert_eq!(model.status_line(), "");
    }
}

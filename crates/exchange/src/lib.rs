//! Interactive APDU exchange model
//!
//! This crate provides a small model for composing and exchanging APDU
//! commands field by field, the way an interactive tool edits them:
//!
//! - Each command field (class, instruction, P1, P2, Le, data) is an
//!   independently settable text property with its own validity rule
//! - Invalid intermediate input is retained for display but never overwrites
//!   the last well-formed value used for transmission
//! - A derived transmit-readiness predicate gates the exchange
//! - Mutations raise typed change notifications, observable by closure or
//!   through a channel
//!
//! The actual exchange is delegated to a
//! [`CardSession`](cardlab_apdu_core::CardSession); this crate never talks
//! to a reader itself.
//!
//! ```
//! use cardlab_apdu_core::{MockSession, Response, Bytes};
//! use cardlab_apdu_exchange::ExchangeModel;
//!
//! let session = MockSession::with_response(Response::new((0x90, 0x00), Bytes::new()));
//! let mut model = ExchangeModel::new(session);
//!
//! model.set_data_text("3F00");
//! assert!(model.transmit_ready());
//!
//! model.transmit().unwrap();
//! assert_eq!(model.sw1_text(), "90");
//! assert_eq!(model.sw2_text(), "00");
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

pub mod event;
pub mod field;
pub mod model;

pub use event::{ExchangeEvent, ExchangeEventHandler, Field, exchange_event_channel};
pub use field::{ByteField, DataField, DecimalField};
pub use model::ExchangeModel;

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use crate::event::{
        ExchangeEvent, ExchangeEventHandler, ExchangeEventReceiver, ExchangeEventSender, Field,
        exchange_event_channel,
    };
    pub use crate::model::ExchangeModel;
    pub use cardlab_apdu_core::prelude::*;
}

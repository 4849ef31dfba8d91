//! Core types for APDU (Application Protocol Data Unit) exchange
//!
//! This crate provides the value layer for exchanging smart card APDU
//! commands and responses according to ISO/IEC 7816-4:
//!
//! - Converting between bytes and textual hexadecimal field input
//! - Creating and parsing APDU commands and responses
//! - Interpreting status words
//! - The [`CardSession`] capability an exchange delegates to
//!
//! Connection lifecycle (readers, protocols, transactions) is deliberately
//! not modeled here; it lives behind the [`CardSession`] trait.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

// Main modules
pub mod command;
pub mod hex;
pub mod response;
pub mod session;

// Core error types
mod error;
pub use error::{Error, Result, ResultExt};

// Re-exports for common types
pub use command::Command;
pub use response::Response;
pub use response::status::StatusWord;
pub use session::CardSession;

#[cfg(any(test, feature = "mock"))]
pub use session::MockSession;

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use crate::{
        Bytes, BytesMut, Command, Error, Response, Result, ResultExt,
        response::status::{StatusWord, common as status},
        session::CardSession,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test the basic types are re-exported correctly
    #[test]
    fn test_reexports() {
        let cmd = Command::new(0x00, 0xA4, 0x04, 0x00);
        assert_eq!(cmd.cla, 0x00);
        assert_eq!(cmd.ins, 0xA4);

        let resp = Response::success(Bytes::from_static(&[0x01, 0x02, 0x03]));
        assert!(resp.is_success());
        assert_eq!(resp.status(), StatusWord::new(0x90, 0x00));

        assert_eq!(hex::byte_to_hex(0x0A), "0A");
    }
}

//! APDU command definitions
//!
//! This module provides the command type exchanged with a card session,
//! following the header layout of ISO/IEC 7816-4: class, instruction, the
//! two parameter bytes, the expected response length and the data payload.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::Error;

/// Generic APDU command structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command class byte (CLA)
    pub cla: u8,
    /// Instruction byte (INS)
    pub ins: u8,
    /// Parameter 1
    pub p1: u8,
    /// Parameter 2
    pub p2: u8,
    /// Expected response length (Le)
    pub le: u8,
    /// Command data payload, possibly empty
    pub data: Bytes,
}

impl Command {
    /// Create a new command with just the header bytes
    pub const fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            le: 0,
            data: Bytes::new(),
        }
    }

    /// SELECT the master file (3F 00), the conventional first command
    pub fn select_mf() -> Self {
        Self::new(0xA0, 0xA4, 0x00, 0x00).with_data(Bytes::from_static(&[0x3F, 0x00]))
    }

    /// Set the data payload
    pub fn with_data<T: Into<Bytes>>(mut self, data: T) -> Self {
        self.data = data.into();
        self
    }

    /// Set the expected response length
    pub const fn with_le(mut self, le: u8) -> Self {
        self.le = le;
        self
    }

    /// Serialized length: five header bytes plus the data payload
    pub fn command_length(&self) -> usize {
        5 + self.data.len()
    }

    /// Convert to raw bytes: CLA, INS, P1, P2, Le, then the trailing data
    pub fn to_bytes(&self) -> Bytes {
        let mut buffer = BytesMut::with_capacity(self.command_length());

        buffer.put_u8(self.cla);
        buffer.put_u8(self.ins);
        buffer.put_u8(self.p1);
        buffer.put_u8(self.p2);
        buffer.put_u8(self.le);
        buffer.put_slice(&self.data);

        buffer.freeze()
    }

    /// Parse a command from raw bytes
    ///
    /// Fails with [`Error::InvalidCommandLength`] if the input is shorter
    /// than the five-byte header.
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        if data.len() < 5 {
            return Err(Error::InvalidCommandLength(data.len()));
        }

        Ok(Self {
            cla: data[0],
            ins: data[1],
            p1: data[2],
            p2: data[3],
            le: data[4],
            data: Bytes::copy_from_slice(&data[5..]),
        })
    }
}

impl Default for Command {
    fn default() -> Self {
        Self::select_mf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serialization() {
        let cmd = Command::new(0xA0, 0xA4, 0x00, 0x00)
            .with_data(Bytes::from_static(&[0x3F, 0x00]))
            .with_le(0x10);
        let bytes = cmd.to_bytes();

        assert_eq!(bytes[0], 0xA0); // CLA
        assert_eq!(bytes[1], 0xA4); // INS
        assert_eq!(bytes[2], 0x00); // P1
        assert_eq!(bytes[3], 0x00); // P2
        assert_eq!(bytes[4], 0x10); // Le
        assert_eq!(&bytes[5..], &[0x3F, 0x00]); // Data
    }

    #[test]
    fn test_command_length() {
        let cmd1 = Command::new(0x00, 0xB0, 0x00, 0x00);
        assert_eq!(cmd1.command_length(), 5);

        let cmd2 = cmd1.with_data(Bytes::from_static(&[0x01, 0x02, 0x03]));
        assert_eq!(cmd2.command_length(), 8);
        assert_eq!(cmd2.to_bytes().len(), 8);
    }

    #[test]
    fn test_command_from_bytes() {
        let raw = [0xA0, 0xA4, 0x00, 0x00, 0x00, 0x3F, 0x00];
        let cmd = Command::from_bytes(&raw).unwrap();
        assert_eq!(cmd, Command::select_mf());

        // Header only, no data
        let raw = [0x00, 0xB0, 0x00, 0x00, 0xFF];
        let cmd = Command::from_bytes(&raw).unwrap();
        assert_eq!(cmd.le, 0xFF);
        assert!(cmd.data.is_empty());

        // Shorter than the header
        assert!(matches!(
            Command::from_bytes(&[0x00, 0xA4, 0x04, 0x00]),
            Err(Error::InvalidCommandLength(4))
        ));
    }

    #[test]
    fn test_round_trip() {
        let cmd = Command::new(0x00, 0xC0, 0x01, 0x02)
            .with_le(0x20)
            .with_data(Bytes::from_static(&[0xDE, 0xAD, 0xBE, 0xEF]));
        assert_eq!(Command::from_bytes(&cmd.to_bytes()).unwrap(), cmd);
    }

    #[test]
    fn test_default_is_select_mf() {
        let cmd = Command::default();
        assert_eq!(cmd.cla, 0xA0);
        assert_eq!(cmd.ins, 0xA4);
        assert_eq!(cmd.p1, 0x00);
        assert_eq!(cmd.p2, 0x00);
        assert_eq!(cmd.le, 0);
        assert_eq!(cmd.data.as_ref(), &[0x3F, 0x00]);
    }
}

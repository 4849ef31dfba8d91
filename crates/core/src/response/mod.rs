//! APDU response definitions
//!
//! This module provides the response type returned by a card session: the
//! two status bytes followed by the variable-length response data.

pub mod status;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::error::Error;
use status::StatusWord;

/// Basic APDU response structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status word
    status: StatusWord,
    /// Response data, possibly empty
    data: Bytes,
}

impl Response {
    /// Create a new response with status and data
    pub fn new(status: impl Into<StatusWord>, data: impl Into<Bytes>) -> Self {
        Self {
            status: status.into(),
            data: data.into(),
        }
    }

    /// Create a success response (90 00)
    pub const fn success(data: Bytes) -> Self {
        Self {
            status: StatusWord::new(0x90, 0x00),
            data,
        }
    }

    /// Create a data-less response from a status word
    pub fn error(status: impl Into<StatusWord>) -> Self {
        Self {
            status: status.into(),
            data: Bytes::new(),
        }
    }

    /// Parse a response from raw bytes: SW1, SW2, then the trailing data
    ///
    /// Fails with [`Error::IncompleteResponse`] if the input is shorter than
    /// the two status bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        if data.len() < 2 {
            return Err(Error::IncompleteResponse(data.len()));
        }

        let status = StatusWord::new(data[0], data[1]);

        trace!(
            sw1 = format_args!("{:#04x}", status.sw1),
            sw2 = format_args!("{:#04x}", status.sw2),
            data_len = data.len() - 2,
            "Parsed APDU response"
        );

        Ok(Self {
            status,
            data: Bytes::copy_from_slice(&data[2..]),
        })
    }

    /// Serialize to raw bytes: SW1, SW2, then the trailing data
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(2 + self.data.len());
        buf.put_u8(self.status.sw1);
        buf.put_u8(self.status.sw2);
        buf.put_slice(&self.data);
        buf.freeze()
    }

    /// Get the status word
    pub const fn status(&self) -> StatusWord {
        self.status
    }

    /// Get the status word as a tuple (SW1, SW2)
    pub const fn status_tuple(&self) -> (u8, u8) {
        (self.status.sw1, self.status.sw2)
    }

    /// Get the response data
    pub const fn data(&self) -> &Bytes {
        &self.data
    }

    /// Check if the response indicates success
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl TryFrom<&[u8]> for Response {
    type Error = Error;

    fn try_from(data: &[u8]) -> Result<Self, Error> {
        Self::from_bytes(data)
    }
}

impl From<Response> for Bytes {
    fn from(response: Response) -> Self {
        response.to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_creation() {
        let resp = Response::new((0x90, 0x00), Bytes::from_static(&[0x01, 0x02, 0x03]));
        assert_eq!(resp.status(), StatusWord::new(0x90, 0x00));
        assert_eq!(resp.data().as_ref(), &[0x01, 0x02, 0x03]);
        assert!(resp.is_success());
    }

    #[test]
    fn test_response_from_bytes() {
        let resp = Response::from_bytes(&[0x90, 0x00, 0x3F, 0x00]).unwrap();
        assert_eq!(resp.status_tuple(), (0x90, 0x00));
        assert_eq!(resp.data().as_ref(), &[0x3F, 0x00]);

        let resp = Response::from_bytes(&[0x6A, 0x82]).unwrap();
        assert_eq!(resp.status_tuple(), (0x6A, 0x82));
        assert!(resp.data().is_empty());
        assert!(!resp.is_success());

        assert!(matches!(
            Response::from_bytes(&[0x90]),
            Err(Error::IncompleteResponse(1))
        ));
        assert!(matches!(
            Response::from_bytes(&[]),
            Err(Error::IncompleteResponse(0))
        ));
    }

    #[test]
    fn test_response_round_trip() {
        let resp = Response::success(Bytes::from_static(&[0xDE, 0xAD]));
        assert_eq!(Response::from_bytes(&resp.to_bytes()).unwrap(), resp);

        let resp = Response::error((0x67, 0x00));
        assert_eq!(resp.to_bytes().as_ref(), &[0x67, 0x00]);
    }
}

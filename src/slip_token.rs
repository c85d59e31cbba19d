//! Slip token codec
//!
//! Encodes a slip id into a compact, URL-safe token that survives being
//! printed, scanned, or typed by hand. A CRC32 trailer catches mangled
//! scans before any storage lookup happens.
//!
//! Token layout:
//!
//! ```text
//! "ST1" + base64url_nopad( slip_id[16 bytes] || crc32(slip_id)[4 bytes, BE] )
//! ```
//!
//! The checksum is an integrity check only. Possession of a token grants
//! nothing by itself; every operation behind it is PIN-gated.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use thiserror::Error;

use crate::core_types::SlipId;

/// Version prefix, outside the base64 body so tokens are recognizable at a glance
pub const TOKEN_PREFIX: &str = "ST1";

const ID_LEN: usize = 16;
const CRC_LEN: usize = 4;
const PAYLOAD_LEN: usize = ID_LEN + CRC_LEN;

/// Token decode failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("missing '{TOKEN_PREFIX}' prefix")]
    MissingPrefix,

    #[error("invalid base64 body")]
    BadEncoding,

    #[error("payload length {got} (expected {PAYLOAD_LEN})")]
    BadLength { got: usize },

    #[error("checksum mismatch")]
    ChecksumMismatch,
}

/// Encode a slip id into its printable token
pub fn encode(slip_id: SlipId) -> String {
    let id_bytes = slip_id.to_bytes();
    let crc = crc32fast::hash(&id_bytes);

    let mut payload = [0u8; PAYLOAD_LEN];
    payload[..ID_LEN].copy_from_slice(&id_bytes);
    payload[ID_LEN..].copy_from_slice(&crc.to_be_bytes());

    format!("{}{}", TOKEN_PREFIX, URL_SAFE_NO_PAD.encode(payload))
}

/// Decode a token back into its slip id, verifying the checksum
pub fn decode(token: &str) -> Result<SlipId, TokenError> {
    let body = token
        .strip_prefix(TOKEN_PREFIX)
        .ok_or(TokenError::MissingPrefix)?;

    let payload = URL_SAFE_NO_PAD
        .decode(body)
        .map_err(|_| TokenError::BadEncoding)?;

    if payload.len() != PAYLOAD_LEN {
        return Err(TokenError::BadLength { got: payload.len() });
    }

    let mut id_bytes = [0u8; ID_LEN];
    id_bytes.copy_from_slice(&payload[..ID_LEN]);

    let mut crc_bytes = [0u8; CRC_LEN];
    crc_bytes.copy_from_slice(&payload[ID_LEN..]);
    let stored_crc = u32::from_be_bytes(crc_bytes);

    if crc32fast::hash(&id_bytes) != stored_crc {
        return Err(TokenError::ChecksumMismatch);
    }

    Ok(SlipId::from_bytes(id_bytes))
}

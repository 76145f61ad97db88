//! Check-in pass encoding and decoding.
//!
//! The pass is the payload behind the scannable code an instructor projects
//! while a session's check-in window is open. It is a URL-safe base64
//! wrapping of a small JSON document and is deliberately unsigned: scanning
//! one proves only that the student saw the code, which is why scanned
//! check-ins always wait for reviewer approval. The payload is
//! self-describing so an offline scanner can show course details and judge
//! expiry without a server round trip.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Decoded check-in pass.
///
/// Course code and name are denormalized into the payload so a scanner can
/// render them offline. `expires_at` is the pass's own lifetime; a refresh
/// of the session window supersedes a pass but never extends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInPass {
    pub session_id: Uuid,
    pub course_id: Uuid,
    pub course_code: String,
    pub course_name: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CheckInPass {
    /// Whether the pass has outlived its own expiry at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Errors returned by [`decode_pass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PassDecodeError {
    /// Not base64, not JSON, missing fields, or nonsense timestamps.
    #[error("malformed pass payload")]
    Malformed,
}

/// Wire form of the pass: compact keys, timestamps as UNIX seconds.
#[derive(Debug, Serialize, Deserialize)]
struct PassWire {
    sid: Uuid,
    cid: Uuid,
    code: String,
    name: String,
    iat: i64,
    exp: i64,
}

/// Encode a pass into the payload handed to the code renderer.
pub fn encode_pass(pass: &CheckInPass) -> String {
    let wire = PassWire {
        sid: pass.session_id,
        cid: pass.course_id,
        code: pass.course_code.clone(),
        name: pass.course_name.clone(),
        iat: pass.issued_at.timestamp(),
        exp: pass.expires_at.timestamp(),
    };
    let json = serde_json::to_vec(&wire).expect("pass wire form is always serializable");
    URL_SAFE_NO_PAD.encode(json)
}

/// Decode a scanned payload back into a typed pass.
///
/// An *expired* pass still decodes successfully; expiry is a value
/// judgment made by the caller via [`CheckInPass::is_expired`], so a
/// scanner can tell "expired" apart from "garbage" before submitting.
pub fn decode_pass(payload: &str) -> Result<CheckInPass, PassDecodeError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim())
        .map_err(|_| PassDecodeError::Malformed)?;
    let wire: PassWire = serde_json::from_slice(&bytes).map_err(|_| PassDecodeError::Malformed)?;

    let issued_at = DateTime::from_timestamp(wire.iat, 0).ok_or(PassDecodeError::Malformed)?;
    let expires_at = DateTime::from_timestamp(wire.exp, 0).ok_or(PassDecodeError::Malformed)?;
    // A pass that expires at or before its issue time was never valid.
    if expires_at <= issued_at {
        return Err(PassDecodeError::Malformed);
    }

    Ok(CheckInPass {
        session_id: wire.sid,
        course_id: wire.cid,
        course_code: wire.code,
        course_name: wire.name,
        issued_at,
        expires_at,
    })
}

//! Attendance check-in enums.

use serde::{Deserialize, Serialize};

/// How a check-in reached the system.
///
/// Wire format: `u8` (0 = Beacon, 1 = Code, 2 = Manual). A record whose
/// check-in was rejected carries no method at all (`Option::None` at the
/// record level), as if the check-in had never happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInMethod {
    /// Short-range radio proximity signal; strong evidence, auto-verified.
    Beacon = 0,
    /// Scanned ephemeral pass; weak evidence, requires reviewer approval.
    Code = 1,
    /// Instructor override; a human already made the judgment.
    Manual = 2,
}

impl CheckInMethod {
    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Beacon),
            1 => Some(Self::Code),
            2 => Some(Self::Manual),
            _ => None,
        }
    }

    /// Convert to `u8` wire value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Outcome state of one student's attendance for one session.
///
/// Wire format: `u8` (0 = Pending, 1 = Verified, 2 = Absent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Awaiting a reviewer decision; only scanned-code check-ins pend.
    Pending = 0,
    Verified = 1,
    Absent = 2,
}

impl AttendanceStatus {
    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Pending),
            1 => Some(Self::Verified),
            2 => Some(Self::Absent),
            _ => None,
        }
    }

    /// Convert to `u8` wire value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

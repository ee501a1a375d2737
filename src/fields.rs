//! Wire field enums shared by the per-generation records.
//!
//! Every closed byte domain decodes through a `NotSupported` catch-all:
//! an out-of-enumeration value is the device signaling a capability the
//! firmware does not have, not a protocol error.

use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::constants::{AUTO_LOCK_MAX_D, AUTO_LOCK_MAX_V2};

/// Handing direction of the installed lock body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoPrimitive, FromPrimitive)]
#[repr(u8)]
pub enum Direction {
    Right = 0xA0,
    Left = 0xA1,
    Uncalibrated = 0xA2,
    #[num_enum(catch_all)]
    NotSupported(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoPrimitive, FromPrimitive)]
#[repr(u8)]
pub enum LockState {
    Unlocked = 0x00,
    Locked = 0x01,
    Jammed = 0x02,
    #[num_enum(catch_all)]
    NotSupported(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoPrimitive, FromPrimitive)]
#[repr(u8)]
pub enum DoorState {
    Closed = 0x00,
    Open = 0x01,
    Ajar = 0x02,
    #[num_enum(catch_all)]
    NotSupported(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoPrimitive, FromPrimitive)]
#[repr(u8)]
pub enum DeadboltState {
    Retracted = 0x00,
    Extended = 0x01,
    Jammed = 0x02,
    #[num_enum(catch_all)]
    NotSupported(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoPrimitive, FromPrimitive)]
#[repr(u8)]
pub enum SoundVolume {
    Off = 0x00,
    Low = 0x01,
    High = 0x02,
    #[num_enum(catch_all)]
    NotSupported(u8),
}

/// Generic on/off field (vacation mode, guiding code, security bolt,
/// door sense, wifi, keypad backlight, relay, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoPrimitive, FromPrimitive)]
#[repr(u8)]
pub enum Toggle {
    Off = 0x00,
    On = 0x01,
    #[num_enum(catch_all)]
    NotSupported(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoPrimitive, FromPrimitive)]
#[repr(u8)]
pub enum WifiState {
    Disconnected = 0x00,
    Connecting = 0x01,
    Connected = 0x02,
    #[num_enum(catch_all)]
    NotSupported(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoPrimitive, FromPrimitive)]
#[repr(u8)]
pub enum CredentialKind {
    Pin = 0x01,
    Fingerprint = 0x02,
    Card = 0x03,
    Face = 0x04,
    Ble = 0x05,
    #[num_enum(catch_all)]
    NotSupported(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoPrimitive, FromPrimitive)]
#[repr(u8)]
pub enum UserRole {
    Admin = 0x01,
    Normal = 0x02,
    Temporary = 0x03,
    #[num_enum(catch_all)]
    NotSupported(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoPrimitive, FromPrimitive)]
#[repr(u8)]
pub enum UserStatus {
    Normal = 0x00,
    Suspended = 0x01,
    #[num_enum(catch_all)]
    NotSupported(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoPrimitive, FromPrimitive)]
#[repr(u8)]
pub enum EventKind {
    LockOp = 0x01,
    UnlockOp = 0x02,
    WrongCode = 0x03,
    Tamper = 0x04,
    AutoLock = 0x05,
    DoorBell = 0x06,
    #[num_enum(catch_all)]
    NotSupported(u8),
}

/// Permission carried by a token, transmitted as a single ASCII char.
/// Any unrecognized char maps to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum Permission {
    Owner,
    Manager,
    All,
    Limited,
    None,
}

impl Permission {
    pub fn from_wire(byte: u8) -> Self {
        match byte {
            b'O' => Permission::Owner,
            b'M' => Permission::Manager,
            b'A' => Permission::All,
            b'L' => Permission::Limited,
            _ => Permission::None,
        }
    }

    pub fn to_wire(self) -> u8 {
        match self {
            Permission::Owner => b'O',
            Permission::Manager => b'M',
            Permission::All => b'A',
            Permission::Limited => b'L',
            Permission::None => b'N',
        }
    }
}

/// D-series auto-lock delay: 0 disables, 1..=90 seconds, anything else
/// falls back to the 1-second minimum.
pub fn auto_lock_seconds_d(byte: u8) -> u8 {
    match byte {
        0 => 0,
        b if b <= AUTO_LOCK_MAX_D => b,
        _ => 1,
    }
}

/// V2/V3 auto-lock delay: 0 disables, 1..=900 seconds, else 1.
pub fn auto_lock_seconds_v2(raw: u16) -> u16 {
    match raw {
        0 => 0,
        s if s <= AUTO_LOCK_MAX_V2 => s,
        _ => 1,
    }
}

/// Battery level reports above 100% are clamped, not rejected.
pub fn battery_percent(byte: u8) -> u8 {
    byte.min(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_raw_values() {
        assert_eq!(Direction::from_primitive(0xA0), Direction::Right);
        assert_eq!(Direction::from_primitive(0xA1), Direction::Left);
        assert_eq!(Direction::from_primitive(0x07), Direction::NotSupported(0x07));
        assert_eq!(u8::from(Direction::Right), 0xA0);
    }

    #[test]
    fn test_out_of_domain_bytes_are_not_errors() {
        assert_eq!(LockState::from_primitive(0x77), LockState::NotSupported(0x77));
        assert_eq!(Toggle::from_primitive(0x02), Toggle::NotSupported(0x02));
        assert_eq!(
            CredentialKind::from_primitive(0xFE),
            CredentialKind::NotSupported(0xFE)
        );
    }

    #[test]
    fn test_permission_chars() {
        assert_eq!(Permission::from_wire(b'O'), Permission::Owner);
        assert_eq!(Permission::from_wire(b'M'), Permission::Manager);
        assert_eq!(Permission::from_wire(b'A'), Permission::All);
        assert_eq!(Permission::from_wire(b'L'), Permission::Limited);
        assert_eq!(Permission::from_wire(b'z'), Permission::None);
        assert_eq!(Permission::Owner.to_wire(), b'O');
    }

    #[test]
    fn test_auto_lock_fallback() {
        assert_eq!(auto_lock_seconds_d(0), 0);
        assert_eq!(auto_lock_seconds_d(90), 90);
        assert_eq!(auto_lock_seconds_d(95), 1);
        assert_eq!(auto_lock_seconds_v2(900), 900);
        assert_eq!(auto_lock_seconds_v2(901), 1);
    }

    #[test]
    fn test_battery_clamp() {
        assert_eq!(battery_percent(100), 100);
        assert_eq!(battery_percent(104), 100);
        assert_eq!(battery_percent(3), 3);
    }
}

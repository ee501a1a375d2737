//! Function code table spanning the three lock generations.
//!
//! Legacy D-series locks answer 0xD0-0xDF, V2 hardware answers the
//! A-series, V3 hardware the 0x80/0x90 ranges. The session, access-code,
//! event and token codes are shared by all generations.

use num_enum::{FromPrimitive, IntoPrimitive};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoPrimitive, FromPrimitive)]
#[repr(u8)]
pub enum FunctionCode {
    // Session establishment
    NonceExchange = 0xC0,
    TokenValidate = 0xC1,
    /// Pushed by the device, never requested directly
    TokenDetail = 0xE5,
    /// Sentinel substituted for any reply while no admin code is set
    AdminCodeNotSet = 0xEF,

    // Legacy D-series
    GetBattery = 0xD0,
    Lock = 0xD1,
    Unlock = 0xD2,
    GetLockState = 0xD3,
    GetConfig = 0xD4,
    SetConfig = 0xD5,
    GetDeviceStatus = 0xD6,
    SetAdminCode = 0xD7,
    VerifyAdminCode = 0xD8,
    GetTime = 0xD9,
    SetTime = 0xDA,
    GetAutoLockTime = 0xDB,
    SetAutoLockTime = 0xDC,
    GetFirmwareVersion = 0xDD,
    FactoryReset = 0xDE,
    GetModelNumber = 0xDF,

    // V2 A-series
    GetConfigV2 = 0xA0,
    SetConfigV2 = 0xA1,
    GetStatusV2 = 0xA2,
    LockV2 = 0xA3,
    UnlockV2 = 0xA4,
    GetBatteryV2 = 0xA5,
    SetSoundVolume = 0xA6,
    GetSoundVolume = 0xA7,
    SetVacationMode = 0xA8,
    AutoLockPush = 0xA9,
    GetDoorState = 0xAA,
    CalibrateDoorSense = 0xAB,
    SetDirection = 0xAC,
    GetSerialNumber = 0xAD,
    SetGeoLocation = 0xAE,
    StatusPush = 0xAF,

    // V3 core + BLE-user management
    GetConfigV3 = 0x80,
    SetConfigV3 = 0x81,
    GetStatusV3 = 0x82,
    LockV3 = 0x83,
    UnlockV3 = 0x84,
    GetDeadboltAngle = 0x85,
    SetDeadboltAngle = 0x86,
    OtaBegin = 0x87,
    OtaData = 0x88,
    OtaEnd = 0x89,
    AddBleUser = 0x8A,
    DeleteBleUser = 0x8B,
    EditBleUser = 0x8C,
    QueryBleUser = 0x8D,
    ListBleUsers = 0x8E,

    // V3 user/credential management
    AddUser = 0x90,
    DeleteUser = 0x91,
    EditUser = 0x92,
    QueryUser = 0x93,
    ListUsers = 0x94,
    AddCredential = 0x95,
    DeleteCredential = 0x96,
    EditCredential = 0x97,
    QueryCredential = 0x98,
    ListCredentials = 0x99,

    // Offline access codes
    ListAccessCodes = 0xEA,
    QueryAccessCode = 0xEB,
    AddAccessCode = 0xEC,
    EditAccessCode = 0xED,
    DeleteAccessCode = 0xEE,

    // Event log and token management
    GetEventCount = 0xE0,
    ReadEvent = 0xE1,
    ClearEvents = 0xE2,
    ListTokens = 0xE3,
    DeleteToken = 0xE4,
    EditTokenName = 0xE6,
    GetTokenCount = 0xE7,
    EventPush = 0xE8,

    // WiFi-variant and plug accessories
    GetWifiStatus = 0xF0,
    WifiLockControl = 0xF1,
    GetPlugStatus = 0xB0,
    PlugControl = 0xB1,

    #[num_enum(catch_all)]
    Unknown(u8),
}

/// How the length byte of an outgoing frame is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredLength {
    /// Declared length equals the actual payload length
    Payload,
    /// Fixed declared length regardless of the payload handed in
    Fixed(u8),
    /// Payload is replaced by fresh random bytes of the requested size
    Nonce,
}

impl FunctionCode {
    /// Declared-length rule for building a command carrying this code.
    /// `None` means the code cannot be sent as a command.
    pub fn declared_length(&self) -> Option<DeclaredLength> {
        match self {
            FunctionCode::Unknown(_) => None,
            FunctionCode::NonceExchange => Some(DeclaredLength::Nonce),
            // V2 set-config always declares the full 28-byte record
            FunctionCode::SetConfigV2 => Some(DeclaredLength::Fixed(28)),
            _ => Some(DeclaredLength::Payload),
        }
    }

    /// Codes the device sends spontaneously rather than as a reply.
    pub fn is_push(&self) -> bool {
        matches!(
            self,
            FunctionCode::TokenDetail
                | FunctionCode::AutoLockPush
                | FunctionCode::StatusPush
                | FunctionCode::EventPush
        )
    }
}

//! Response resolution: decrypt a notification frame and decode its
//! payload into the strongly-typed result for the function that was
//! asked for.
//!
//! The admin-code sentinel (0xEF) takes precedence over the generic
//! function-mismatch check: a device with no admin PIN configured
//! substitutes 0xEF for whatever reply was requested.

use bytes::Bytes;
use tracing::trace;

use crate::access::{AccessCode, AccessCodePage};
use crate::cipher;
use crate::codec;
use crate::config::{LockConfigA0, LockConfigD4, LockConfigV3};
use crate::constants::{ADMIN_CODE_NOT_SET, HEADER_SIZE};
use crate::error::LockError;
use crate::events::{EventRecord, TokenList};
use crate::fields::{battery_percent, auto_lock_seconds_d, DoorState, LockState, SoundVolume};
use crate::frame::Frame;
use crate::function::FunctionCode;
use crate::status::{DeviceStatusA2, DeviceStatusD6, DeviceStatusV3, PlugStatus, WifiStatus};
use crate::token::{PermanentToken, TokenValidation};
use crate::users::{BleUser, BleUserList, CredentialPage, CredentialRecord, UserPage, UserRecord};

/// Every result shape a lock can answer with. One variant per logical
/// reply family; the dispatch in [`resolve`] fixes the variant for each
/// function code at compile time.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedResult {
    Ack(bool),
    Battery(u8),
    LockState(LockState),
    DoorState(DoorState),
    SoundVolume(SoundVolume),
    AutoLockTime(u8),
    Time(u32),
    Count(u32),
    DeadboltAngle(i16),
    OtaAck(u16),
    Text(String),
    HexString(String),
    Raw(Bytes),
    Nonce(Bytes),
    TokenValidation(TokenValidation),
    TokenDetail(PermanentToken),
    TokenList(TokenList),
    ConfigD4(LockConfigD4),
    StatusD6(DeviceStatusD6),
    ConfigV2(LockConfigA0),
    StatusV2(DeviceStatusA2),
    ConfigV3(LockConfigV3),
    StatusV3(DeviceStatusV3),
    WifiStatus(WifiStatus),
    PlugStatus(PlugStatus),
    AccessCode(AccessCode),
    AccessCodePage(AccessCodePage),
    BleUser(BleUser),
    BleUserList(BleUserList),
    User(UserRecord),
    UserPage(UserPage),
    Credential(CredentialRecord),
    CredentialPage(CredentialPage),
    Event(EventRecord),
    /// Well-formed reply carrying no record (e.g. event index not found)
    Empty,
}

/// Decrypt `ciphertext` and decode the reply expected for `expected`.
///
/// `context` carries the request-side index for paged/indexed queries
/// (event index, list page); decoding never requires it.
pub fn resolve(
    expected: FunctionCode,
    key: &[u8; 16],
    ciphertext: &[u8],
    context: Option<usize>,
) -> Result<DecodedResult, LockError> {
    let plaintext = cipher::decrypt(key, ciphertext)?;
    let actual = *plaintext.get(2).ok_or(LockError::TruncatedRecord {
        expected: HEADER_SIZE,
        actual: plaintext.len(),
    })?;
    let expected_byte = u8::from(expected);
    // sentinel precedence: an unset admin code masks every other reply
    if actual == ADMIN_CODE_NOT_SET && expected_byte != ADMIN_CODE_NOT_SET {
        return Err(LockError::AdminCodeNotSet);
    }
    if actual != expected_byte {
        return Err(LockError::FunctionMismatch {
            expected: expected_byte,
            actual,
        });
    }
    let frame = Frame::from_plaintext(&plaintext)?;
    decode_payload(expected, &frame.payload, context)
}

fn decode_payload(
    function: FunctionCode,
    payload: &Bytes,
    context: Option<usize>,
) -> Result<DecodedResult, LockError> {
    use FunctionCode::*;

    Ok(match function {
        // single-byte acknowledgements
        Lock | Unlock | SetConfig | SetAdminCode | VerifyAdminCode | SetTime
        | SetAutoLockTime | FactoryReset | SetConfigV2 | LockV2 | UnlockV2 | SetSoundVolume
        | SetVacationMode | CalibrateDoorSense | SetDirection | SetGeoLocation | SetConfigV3
        | LockV3 | UnlockV3 | SetDeadboltAngle | OtaEnd | AddBleUser | DeleteBleUser
        | EditBleUser | AddUser | DeleteUser | EditUser | AddCredential | DeleteCredential
        | EditCredential | AddAccessCode | EditAccessCode | DeleteAccessCode | ClearEvents
        | DeleteToken | EditTokenName | WifiLockControl | PlugControl => {
            DecodedResult::Ack(decode_bool(payload)?)
        }

        GetBattery | GetBatteryV2 => DecodedResult::Battery(battery_percent(first_byte(payload)?)),
        GetLockState | AutoLockPush => {
            DecodedResult::LockState(LockState::from(first_byte(payload)?))
        }
        GetDoorState => DecodedResult::DoorState(DoorState::from(first_byte(payload)?)),
        GetSoundVolume => DecodedResult::SoundVolume(SoundVolume::from(first_byte(payload)?)),
        GetAutoLockTime => {
            DecodedResult::AutoLockTime(auto_lock_seconds_d(first_byte(payload)?))
        }
        GetTime => {
            first_byte(payload)?;
            DecodedResult::Time(codec::u32_from_le(payload))
        }
        GetEventCount | GetTokenCount => {
            first_byte(payload)?;
            DecodedResult::Count(codec::u32_from_le(payload))
        }
        GetDeadboltAngle => {
            first_byte(payload)?;
            DecodedResult::DeadboltAngle(codec::i16_from_le(payload))
        }
        OtaData => {
            first_byte(payload)?;
            DecodedResult::OtaAck(codec::u16_from_le(payload))
        }
        GetFirmwareVersion | GetModelNumber => DecodedResult::Text(
            String::from_utf8_lossy(payload)
                .trim_end_matches('\0')
                .to_string(),
        ),
        GetSerialNumber => DecodedResult::HexString(codec::bytes_to_hex(payload)),
        OtaBegin => DecodedResult::Raw(payload.clone()),

        NonceExchange => DecodedResult::Nonce(payload.clone()),
        TokenValidate => DecodedResult::TokenValidation(TokenValidation::decode(payload)?),
        TokenDetail => DecodedResult::TokenDetail(PermanentToken::decode(payload)?),
        ListTokens => DecodedResult::TokenList(TokenList::decode(payload)?),

        GetConfig => DecodedResult::ConfigD4(LockConfigD4::decode(payload)?),
        GetDeviceStatus => DecodedResult::StatusD6(DeviceStatusD6::decode(payload)?),
        GetConfigV2 => DecodedResult::ConfigV2(LockConfigA0::decode(payload)?),
        GetStatusV2 | StatusPush => DecodedResult::StatusV2(DeviceStatusA2::decode(payload)?),
        GetConfigV3 => DecodedResult::ConfigV3(LockConfigV3::decode(payload)?),
        GetStatusV3 => DecodedResult::StatusV3(DeviceStatusV3::decode(payload)?),
        GetWifiStatus => DecodedResult::WifiStatus(WifiStatus::decode(payload)?),
        GetPlugStatus => DecodedResult::PlugStatus(PlugStatus::decode(payload)?),

        QueryAccessCode => DecodedResult::AccessCode(AccessCode::decode(payload)?),
        ListAccessCodes => {
            trace!(page = ?context, "decoding access code page");
            DecodedResult::AccessCodePage(AccessCodePage::decode(payload)?)
        }
        QueryBleUser => DecodedResult::BleUser(BleUser::decode(payload)?),
        ListBleUsers => DecodedResult::BleUserList(BleUserList::decode(payload)?),
        QueryUser => DecodedResult::User(UserRecord::decode(payload)?),
        ListUsers => {
            trace!(page = ?context, "decoding user page");
            DecodedResult::UserPage(UserPage::decode(payload)?)
        }
        QueryCredential => DecodedResult::Credential(CredentialRecord::decode(payload)?),
        ListCredentials => {
            trace!(page = ?context, "decoding credential page");
            DecodedResult::CredentialPage(CredentialPage::decode(payload)?)
        }

        ReadEvent | EventPush => {
            let event = EventRecord::decode(payload)?;
            if event.is_not_found() {
                trace!(requested = ?context, "event index not found");
                DecodedResult::Empty
            } else {
                DecodedResult::Event(event)
            }
        }

        // the dedicated admin-code-query reply carries nothing
        AdminCodeNotSet => DecodedResult::Empty,

        Unknown(byte) => return Err(LockError::UnsupportedFunction(byte)),
    })
}

fn first_byte(payload: &[u8]) -> Result<u8, LockError> {
    payload
        .first()
        .copied()
        .ok_or(LockError::TruncatedRecord {
            expected: 1,
            actual: 0,
        })
}

fn decode_bool(payload: &[u8]) -> Result<bool, LockError> {
    match first_byte(payload)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(LockError::InvalidBooleanValue(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;

    const KEY: [u8; 16] = *b"resolver-test-ky";

    fn reply(function: FunctionCode, payload: &[u8]) -> Vec<u8> {
        Frame::new(0x0101, function, Bytes::copy_from_slice(payload))
            .encode(&KEY)
            .unwrap()
    }

    #[test]
    fn test_admin_sentinel_beats_mismatch() {
        let ciphertext = reply(FunctionCode::AdminCodeNotSet, &[]);
        assert!(matches!(
            resolve(FunctionCode::GetDeviceStatus, &KEY, &ciphertext, None),
            Err(LockError::AdminCodeNotSet)
        ));
    }

    #[test]
    fn test_function_mismatch() {
        let ciphertext = reply(FunctionCode::Lock, &[1]);
        assert!(matches!(
            resolve(FunctionCode::Unlock, &KEY, &ciphertext, None),
            Err(LockError::FunctionMismatch {
                expected: 0xD2,
                actual: 0xD1
            })
        ));
    }

    #[test]
    fn test_bool_decoding() {
        let ciphertext = reply(FunctionCode::Lock, &[1]);
        assert_eq!(
            resolve(FunctionCode::Lock, &KEY, &ciphertext, None).unwrap(),
            DecodedResult::Ack(true)
        );
        let ciphertext = reply(FunctionCode::Lock, &[7]);
        assert!(matches!(
            resolve(FunctionCode::Lock, &KEY, &ciphertext, None),
            Err(LockError::InvalidBooleanValue(7))
        ));
    }

    #[test]
    fn test_expected_admin_code_query_is_empty() {
        let ciphertext = reply(FunctionCode::AdminCodeNotSet, &[]);
        assert_eq!(
            resolve(FunctionCode::AdminCodeNotSet, &KEY, &ciphertext, None).unwrap(),
            DecodedResult::Empty
        );
    }

    #[test]
    fn test_scalar_decodes_zero_extend() {
        let ciphertext = reply(FunctionCode::GetEventCount, &[0x2A]);
        assert_eq!(
            resolve(FunctionCode::GetEventCount, &KEY, &ciphertext, None).unwrap(),
            DecodedResult::Count(42)
        );
    }

    #[test]
    fn test_empty_scalar_payload_is_truncated() {
        let ciphertext = reply(FunctionCode::GetBattery, &[]);
        assert!(matches!(
            resolve(FunctionCode::GetBattery, &KEY, &ciphertext, None),
            Err(LockError::TruncatedRecord { .. })
        ));
    }
}

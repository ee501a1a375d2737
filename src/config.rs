//! Lock configuration records, one layout per protocol generation.
//!
//! The D-series record (D4/D5) is 22 bytes, V2 (A0/A1) is 28, V3 (80/81)
//! extends the V2 layout to 32. Each record both decodes device replies
//! and encodes set-config payloads.

use serde::{Deserialize, Serialize};

use crate::codec::{self, take};
use crate::error::LockError;
use crate::fields::{
    auto_lock_seconds_d, auto_lock_seconds_v2, Direction, SoundVolume, Toggle,
};

/// A coordinate pair in the protocol's split fixed-point encoding:
/// integer degrees and base-10⁹ fraction, each a little-endian i32.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    pub const WIRE_LEN: usize = 16;

    pub fn decode(bytes: &[u8]) -> Result<Self, LockError> {
        let (raw, _) = take(bytes, Self::WIRE_LEN)?;
        let latitude = codec::geo_decode(
            codec::i32_from_le(&raw[0..4]),
            codec::i32_from_le(&raw[4..8]),
        );
        let longitude = codec::geo_decode(
            codec::i32_from_le(&raw[8..12]),
            codec::i32_from_le(&raw[12..16]),
        );
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn encode(&self) -> [u8; Self::WIRE_LEN] {
        let mut out = [0u8; Self::WIRE_LEN];
        let (lat_int, lat_frac) = codec::geo_encode(self.latitude);
        let (long_int, long_frac) = codec::geo_encode(self.longitude);
        out[0..4].copy_from_slice(&lat_int.to_le_bytes());
        out[4..8].copy_from_slice(&lat_frac.to_le_bytes());
        out[8..12].copy_from_slice(&long_int.to_le_bytes());
        out[12..16].copy_from_slice(&long_frac.to_le_bytes());
        out
    }
}

/// D-series configuration (function 0xD4 reply / 0xD5 payload).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockConfigD4 {
    pub direction: Direction,
    pub sound: SoundVolume,
    pub vacation: Toggle,
    pub auto_lock_seconds: u8,
    pub guiding_code: Toggle,
    pub geo: GeoCoordinate,
}

impl LockConfigD4 {
    pub const WIRE_LEN: usize = 22;

    pub fn decode(payload: &[u8]) -> Result<Self, LockError> {
        let (raw, _) = take(payload, Self::WIRE_LEN)?;
        Ok(Self {
            direction: Direction::from(raw[0]),
            sound: SoundVolume::from(raw[1]),
            vacation: Toggle::from(raw[2]),
            auto_lock_seconds: auto_lock_seconds_d(raw[3]),
            guiding_code: Toggle::from(raw[4]),
            // raw[5] reserved
            geo: GeoCoordinate::decode(&raw[6..22])?,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::WIRE_LEN);
        out.push(self.direction.into());
        out.push(self.sound.into());
        out.push(self.vacation.into());
        out.push(self.auto_lock_seconds);
        out.push(self.guiding_code.into());
        out.push(0);
        out.extend_from_slice(&self.geo.encode());
        out
    }
}

/// V2 configuration (function 0xA0 reply / 0xA1 payload).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockConfigA0 {
    pub direction: Direction,
    pub sound: SoundVolume,
    pub vacation: Toggle,
    pub auto_lock_seconds: u16,
    pub guiding_code: Toggle,
    pub security_bolt: Toggle,
    pub door_sense: Toggle,
    pub geo: GeoCoordinate,
    pub wrong_code_limit: u8,
    pub lockout_minutes: u8,
    pub language: u8,
}

impl LockConfigA0 {
    pub const WIRE_LEN: usize = 28;

    pub fn decode(payload: &[u8]) -> Result<Self, LockError> {
        let (raw, _) = take(payload, Self::WIRE_LEN)?;
        Ok(Self {
            direction: Direction::from(raw[0]),
            sound: SoundVolume::from(raw[1]),
            vacation: Toggle::from(raw[2]),
            auto_lock_seconds: auto_lock_seconds_v2(codec::u16_from_le(&raw[3..5])),
            guiding_code: Toggle::from(raw[5]),
            security_bolt: Toggle::from(raw[6]),
            door_sense: Toggle::from(raw[7]),
            geo: GeoCoordinate::decode(&raw[8..24])?,
            wrong_code_limit: raw[24],
            lockout_minutes: raw[25],
            language: raw[26],
            // raw[27] reserved
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::WIRE_LEN);
        out.push(self.direction.into());
        out.push(self.sound.into());
        out.push(self.vacation.into());
        out.extend_from_slice(&codec::u16_to_le(self.auto_lock_seconds));
        out.push(self.guiding_code.into());
        out.push(self.security_bolt.into());
        out.push(self.door_sense.into());
        out.extend_from_slice(&self.geo.encode());
        out.push(self.wrong_code_limit);
        out.push(self.lockout_minutes);
        out.push(self.language);
        out.push(0);
        out
    }
}

/// V3 configuration (function 0x80 reply / 0x81 payload): the V2 record
/// plus four trailing option bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockConfigV3 {
    pub v2: LockConfigA0,
    pub wifi: Toggle,
    pub keypad_backlight: Toggle,
    pub auto_lock_by_door: Toggle,
}

impl LockConfigV3 {
    pub const WIRE_LEN: usize = 32;

    pub fn decode(payload: &[u8]) -> Result<Self, LockError> {
        let (raw, _) = take(payload, Self::WIRE_LEN)?;
        Ok(Self {
            v2: LockConfigA0::decode(&raw[0..LockConfigA0::WIRE_LEN])?,
            wifi: Toggle::from(raw[28]),
            keypad_backlight: Toggle::from(raw[29]),
            auto_lock_by_door: Toggle::from(raw[30]),
            // raw[31] reserved
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = self.v2.encode();
        out.push(self.wifi.into());
        out.push(self.keypad_backlight.into());
        out.push(self.auto_lock_by_door.into());
        out.push(0);
        out
    }
}

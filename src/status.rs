//! Device status snapshots: D6 (legacy), A2 (V2), 0x82 (V3), plus the
//! WiFi-bridge and smart-plug accessory reports.

use serde::{Deserialize, Serialize};

use crate::codec::{self, take};
use crate::error::LockError;
use crate::fields::{
    auto_lock_seconds_d, auto_lock_seconds_v2, battery_percent, DeadboltState, Direction,
    DoorState, LockState, SoundVolume, Toggle, WifiState,
};

/// Diagnostic flags packed into one byte, LSB first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFlags {
    pub low_battery: bool,
    pub tamper: bool,
    pub storage_full: bool,
    pub clock_unset: bool,
}

impl StatusFlags {
    pub fn from_byte(byte: u8) -> Self {
        let bits = codec::bitmask_to_bool_list(byte);
        Self {
            low_battery: bits[0],
            tamper: bits[1],
            storage_full: bits[2],
            clock_unset: bits[3],
        }
    }
}

/// Legacy device status (function 0xD6), 13 bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatusD6 {
    pub direction: Direction,
    pub vacation: Toggle,
    pub deadbolt: DeadboltState,
    pub door: DoorState,
    pub lock: LockState,
    pub security_bolt: Toggle,
    pub battery_percent: u8,
    pub auto_lock_seconds: u8,
    pub sound: SoundVolume,
    pub guiding_code: Toggle,
    pub operation_count: u16,
    pub flags: StatusFlags,
}

impl DeviceStatusD6 {
    pub const WIRE_LEN: usize = 13;

    pub fn decode(payload: &[u8]) -> Result<Self, LockError> {
        let (raw, _) = take(payload, Self::WIRE_LEN)?;
        Ok(Self {
            direction: Direction::from(raw[0]),
            vacation: Toggle::from(raw[1]),
            deadbolt: DeadboltState::from(raw[2]),
            door: DoorState::from(raw[3]),
            lock: LockState::from(raw[4]),
            security_bolt: Toggle::from(raw[5]),
            battery_percent: battery_percent(raw[6]),
            auto_lock_seconds: auto_lock_seconds_d(raw[7]),
            sound: SoundVolume::from(raw[8]),
            guiding_code: Toggle::from(raw[9]),
            operation_count: codec::u16_from_le(&raw[10..12]),
            flags: StatusFlags::from_byte(raw[12]),
        })
    }
}

/// V2 device status (function 0xA2 and the 0xAF push), 8 bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatusA2 {
    pub direction: Direction,
    pub vacation: Toggle,
    pub deadbolt: DeadboltState,
    pub door: DoorState,
    pub lock: LockState,
    pub security_bolt: Toggle,
    pub battery_percent: u8,
    pub flags: StatusFlags,
}

impl DeviceStatusA2 {
    pub const WIRE_LEN: usize = 8;

    pub fn decode(payload: &[u8]) -> Result<Self, LockError> {
        let (raw, _) = take(payload, Self::WIRE_LEN)?;
        Ok(Self {
            direction: Direction::from(raw[0]),
            vacation: Toggle::from(raw[1]),
            deadbolt: DeadboltState::from(raw[2]),
            door: DoorState::from(raw[3]),
            lock: LockState::from(raw[4]),
            security_bolt: Toggle::from(raw[5]),
            battery_percent: battery_percent(raw[6]),
            flags: StatusFlags::from_byte(raw[7]),
        })
    }
}

/// V3 device status (function 0x82), 16 bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatusV3 {
    pub direction: Direction,
    pub vacation: Toggle,
    pub deadbolt: DeadboltState,
    pub door: DoorState,
    pub lock: LockState,
    pub security_bolt: Toggle,
    pub battery_percent: u8,
    pub auto_lock_seconds: u16,
    pub sound: SoundVolume,
    pub wifi: WifiState,
    pub flags: StatusFlags,
    pub operation_count: u32,
}

impl DeviceStatusV3 {
    pub const WIRE_LEN: usize = 16;

    pub fn decode(payload: &[u8]) -> Result<Self, LockError> {
        let (raw, _) = take(payload, Self::WIRE_LEN)?;
        Ok(Self {
            direction: Direction::from(raw[0]),
            vacation: Toggle::from(raw[1]),
            deadbolt: DeadboltState::from(raw[2]),
            door: DoorState::from(raw[3]),
            lock: LockState::from(raw[4]),
            security_bolt: Toggle::from(raw[5]),
            battery_percent: battery_percent(raw[6]),
            auto_lock_seconds: auto_lock_seconds_v2(codec::u16_from_le(&raw[7..9])),
            sound: SoundVolume::from(raw[9]),
            wifi: WifiState::from(raw[10]),
            flags: StatusFlags::from_byte(raw[11]),
            operation_count: codec::u32_from_le(&raw[12..16]),
        })
    }
}

/// WiFi bridge status (function 0xF0), 7 bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WifiStatus {
    pub state: WifiState,
    pub rssi_dbm: i8,
    pub ip: [u8; 4],
    pub cloud_synced: Toggle,
}

impl WifiStatus {
    pub const WIRE_LEN: usize = 7;

    pub fn decode(payload: &[u8]) -> Result<Self, LockError> {
        let (raw, _) = take(payload, Self::WIRE_LEN)?;
        Ok(Self {
            state: WifiState::from(raw[0]),
            rssi_dbm: raw[1] as i8,
            ip: raw[2..6].try_into()?,
            cloud_synced: Toggle::from(raw[6]),
        })
    }
}

/// Smart plug status (function 0xB0), 6 bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlugStatus {
    pub relay: Toggle,
    pub load_milliwatts: u32,
    pub schedule_enabled: Toggle,
}

impl PlugStatus {
    pub const WIRE_LEN: usize = 6;

    pub fn decode(payload: &[u8]) -> Result<Self, LockError> {
        let (raw, _) = take(payload, Self::WIRE_LEN)?;
        Ok(Self {
            relay: Toggle::from(raw[0]),
            load_milliwatts: codec::u32_from_le(&raw[1..5]),
            schedule_enabled: Toggle::from(raw[5]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_d6_decode_with_out_of_range_auto_lock() {
        // auto-lock byte 95 is outside 1..=90 and falls back to 1
        let payload = [
            0xA0, 0x01, 0x01, 0x00, 0x01, 0x00, 95, 95, 0x02, 0x01, 0x34, 0x12, 0b0000_0011,
        ];
        let status = DeviceStatusD6::decode(&payload).unwrap();
        assert_eq!(status.direction, Direction::Right);
        assert_eq!(status.lock, LockState::Locked);
        assert_eq!(status.battery_percent, 95);
        assert_eq!(status.auto_lock_seconds, 1);
        assert_eq!(status.operation_count, 0x1234);
        assert!(status.flags.low_battery);
        assert!(status.flags.tamper);
        assert!(!status.flags.storage_full);
    }

    #[test]
    fn test_a2_decode() {
        let payload = [0xA1, 0x00, 0x01, 0x02, 0x02, 0x01, 104, 0x00];
        let status = DeviceStatusA2::decode(&payload).unwrap();
        assert_eq!(status.direction, Direction::Left);
        assert_eq!(status.door, DoorState::Ajar);
        assert_eq!(status.lock, LockState::Jammed);
        // over-100 battery reads clamp
        assert_eq!(status.battery_percent, 100);
    }

    #[test]
    fn test_v3_decode() {
        let mut payload = [0u8; 16];
        payload[0] = 0xA0;
        payload[4] = 0x01;
        payload[6] = 80;
        payload[7..9].copy_from_slice(&300u16.to_le_bytes());
        payload[10] = 0x02;
        payload[12..16].copy_from_slice(&70_000u32.to_le_bytes());
        let status = DeviceStatusV3::decode(&payload).unwrap();
        assert_eq!(status.auto_lock_seconds, 300);
        assert_eq!(status.wifi, WifiState::Connected);
        assert_eq!(status.operation_count, 70_000);
    }

    #[test]
    fn test_truncated_status() {
        assert!(matches!(
            DeviceStatusD6::decode(&[0u8; 12]),
            Err(LockError::TruncatedRecord { .. })
        ));
        assert!(matches!(
            PlugStatus::decode(&[0u8; 5]),
            Err(LockError::TruncatedRecord { .. })
        ));
    }

    #[test]
    fn test_wifi_status_decode() {
        let payload = [0x02, 0xC4, 192, 168, 1, 40, 0x01];
        let status = WifiStatus::decode(&payload).unwrap();
        assert_eq!(status.state, WifiState::Connected);
        assert_eq!(status.rssi_dbm, -60);
        assert_eq!(status.ip, [192, 168, 1, 40]);
        assert_eq!(status.cloud_synced, Toggle::On);
    }
}

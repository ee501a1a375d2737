//! Byte-level codec helpers shared by every frame and record decoder.
//!
//! Integer decodes are little-endian and zero-extend when the device sends
//! fewer bytes than the target width (missing high bytes are zero). Bounds
//! checks live in [`take`]; decoders never index past a slice.

use crate::error::LockError;

const NANO: f64 = 1_000_000_000.0;

/// Split off the first `n` bytes or fail with `TruncatedRecord`.
pub(crate) fn take(bytes: &[u8], n: usize) -> Result<(&[u8], &[u8]), LockError> {
    if bytes.len() < n {
        return Err(LockError::TruncatedRecord {
            expected: n,
            actual: bytes.len(),
        });
    }
    Ok(bytes.split_at(n))
}

/// Read one length-prefixed sub-field: `[len:1][bytes:len]`. The prefix
/// bounds the read; a declared length past the end is a truncated record.
pub(crate) fn take_prefixed(bytes: &[u8]) -> Result<(&[u8], &[u8]), LockError> {
    let (len, rest) = take(bytes, 1)?;
    take(rest, len[0] as usize)
}

pub fn u16_to_le(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}

pub fn u32_to_le(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

pub fn u16_from_le(bytes: &[u8]) -> u16 {
    let mut buf = [0u8; 2];
    let n = bytes.len().min(2);
    buf[..n].copy_from_slice(&bytes[..n]);
    u16::from_le_bytes(buf)
}

pub fn u32_from_le(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    let n = bytes.len().min(4);
    buf[..n].copy_from_slice(&bytes[..n]);
    u32::from_le_bytes(buf)
}

pub fn i32_from_le(bytes: &[u8]) -> i32 {
    u32_from_le(bytes) as i32
}

pub fn i16_from_le(bytes: &[u8]) -> i16 {
    u16_from_le(bytes) as i16
}

pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

pub fn hex_to_bytes(hex_str: &str) -> Result<Vec<u8>, LockError> {
    hex::decode(hex_str).map_err(|e| LockError::InvalidInput(format!("bad hex string: {e}")))
}

/// Unpack one flag byte into eight booleans, LSB first.
pub fn bitmask_to_bool_list(byte: u8) -> [bool; 8] {
    std::array::from_fn(|i| byte & (1 << i) != 0)
}

/// Encode a decimal degree as (integer part, base-10⁹ fraction).
///
/// Both halves carry the sign of the input and travel as their own
/// little-endian i32 on the wire. A fraction that rounds up to a whole
/// degree carries into the integer part.
pub fn geo_encode(degrees: f64) -> (i32, i32) {
    let mut int_part = degrees.trunc() as i32;
    let mut frac_part = ((degrees - degrees.trunc()) * NANO).round() as i64;
    if frac_part.abs() >= 1_000_000_000 {
        int_part += frac_part.signum() as i32;
        frac_part = 0;
    }
    (int_part, frac_part as i32)
}

/// Inverse of [`geo_encode`]; exact to within 1e-9 degrees.
pub fn geo_decode(int_part: i32, nano_frac: i32) -> f64 {
    int_part as f64 + nano_frac as f64 / NANO
}

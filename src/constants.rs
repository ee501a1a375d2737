// Protocol constants for the lock wire format

/// AES block size; every ciphertext frame is a multiple of this
pub const BLOCK_SIZE: usize = 16;

/// Size of an AES-128 key and of the exchanged nonces
pub const KEY_SIZE: usize = 16;

/// Frame header: serial (2) + function (1) + declared length (1)
pub const HEADER_SIZE: usize = 4;

/// Largest payload the one-byte length field can declare
pub const MAX_PAYLOAD: usize = u8::MAX as usize;

/// Function code a device substitutes for any reply when no admin code
/// has been configured yet
pub const ADMIN_CODE_NOT_SET: u8 = 0xEF;

/// Permanent token length on the wire
pub const TOKEN_SIZE: usize = 8;

/// Longest name accepted for users, access codes and tokens
pub const MAX_NAME_LEN: usize = 20;

/// Event index a device echoes when the requested record does not exist
pub const EVENT_NOT_FOUND: u32 = u32::MAX;

/// Auto-lock delay bounds for the legacy D-series, in seconds
pub const AUTO_LOCK_MAX_D: u8 = 90;

/// Auto-lock delay bounds for V2/V3, in seconds
pub const AUTO_LOCK_MAX_V2: u16 = 900;

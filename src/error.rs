use std::array::TryFromSliceError;
use std::io;
use thiserror::Error;

/// The primary error type for the `lockproto` library.
#[derive(Error, Debug)]
pub enum LockError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Timeout waiting for lock notification: {0}")]
    Timeout(#[from] tokio::time::error::Elapsed),

    #[error("Decryption failed: empty or non-block-aligned ciphertext")]
    Decrypt,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unsupported function code: 0x{0:02X}")]
    UnsupportedFunction(u8),

    #[error("Function mismatch: expected 0x{expected:02X}, got 0x{actual:02X}")]
    FunctionMismatch { expected: u8, actual: u8 },

    #[error("Admin code has not been configured on the device")]
    AdminCodeNotSet,

    #[error("Connection token rejected as illegal")]
    IllegalToken,

    #[error("One-time token was already exchanged on the device")]
    TokenRefused,

    #[error("Unexpected token state byte: 0x{0:02X}")]
    IllegalTokenState(u8),

    #[error("Shared lock has already been claimed by another phone")]
    SharedLockAlreadyUsed,

    #[error("Truncated record: needed {expected} bytes, {actual} available")]
    TruncatedRecord { expected: usize, actual: usize },

    #[error("Invalid boolean value: 0x{0:02X}")]
    InvalidBooleanValue(u8),

    #[error("Not connected")]
    NotConnected,

    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl From<TryFromSliceError> for LockError {
    fn from(_: TryFromSliceError) -> Self {
        LockError::Protocol("failed to convert slice to array".to_string())
    }
}

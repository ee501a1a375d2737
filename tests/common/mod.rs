//! Common test utilities and shared imports

// Allow unused imports and dead code since this is a shared module
// used across multiple test files - not all items are used in every test file
#[allow(unused_imports)]
pub use bytes::Bytes;
#[allow(unused_imports)]
pub use lockproto::error::LockError;
#[allow(unused_imports)]
pub use lockproto::frame::Frame;
#[allow(unused_imports)]
pub use lockproto::function::FunctionCode;
#[allow(unused_imports)]
pub use lockproto::resolver::{resolve, DecodedResult};

/// Fixed key used across tests
#[allow(dead_code)]
pub const TEST_KEY: [u8; 16] = *b"integration-key0";

/// Decode hex string to bytes for testing
#[allow(dead_code)]
pub fn hex_to_bytes(hex_data: &str) -> Bytes {
    Bytes::from(hex::decode(hex_data).expect("Failed to decode hex"))
}

/// Build an encrypted device notification carrying `payload`
#[allow(dead_code)]
pub fn notification(function: FunctionCode, payload: &[u8]) -> Vec<u8> {
    Frame::new(0x0001, function, Bytes::copy_from_slice(payload))
        .encode(&TEST_KEY)
        .expect("Failed to encode notification")
}

//! Command/response protocol engine for a BLE smart-lock family.
//!
//! Locks exchange AES-128-ECB-encrypted, serial-numbered frames over one
//! notify/write characteristic. This crate is the codec and handshake
//! core: frame encryption and framing, per-function payload decoders
//! across three protocol generations, and the C0/C1/E5 key-exchange
//! state machine. The BLE transport itself is a collaborator behind the
//! [`handshake::Transport`] trait.

pub mod access;
pub mod cipher;
pub mod codec;
pub mod command;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod fields;
pub mod frame;
pub mod function;
pub mod handshake;
pub mod resolver;
pub mod status;
pub mod token;
pub mod users;
pub mod validator;

pub use command::CommandBuilder;
pub use error::LockError;
pub use frame::Frame;
pub use function::FunctionCode;
pub use handshake::{HandshakeConfig, HandshakeEngine, Session, Transport};
pub use resolver::{resolve, DecodedResult};
pub use token::{ConnectionToken, PermanentToken, TokenState};

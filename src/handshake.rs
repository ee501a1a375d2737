//! Key-exchange handshake: C0 (nonce exchange) → C1 (token validation)
//! → optional E5 (one-time token upgrade).
//!
//! The engine owns the transport for the duration of the handshake and
//! hands it back together with the established [`Session`]. No key
//! material survives a failed handshake; the engine must be rebuilt.

use std::time::Duration;

use bytes::Bytes;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::command::CommandBuilder;
use crate::constants::KEY_SIZE;
use crate::error::LockError;
use crate::fields::Permission;
use crate::function::FunctionCode;
use crate::resolver::{self, DecodedResult};
use crate::token::{ConnectionToken, PermanentToken, TokenState};
use crate::validator;

/// What the engine needs from the BLE layer: write one ciphertext frame,
/// yield device notifications in arrival order. Cancellation is dropping
/// the returned future; the engine never half-consumes a notification.
pub trait Transport {
    async fn write(&mut self, frame: &[u8]) -> Result<(), LockError>;
    async fn next_notification(&mut self) -> Result<Bytes, LockError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    Idle,
    AwaitingC0Ack,
    AwaitingC1Ack,
    AwaitingE5,
    SessionReady,
    Failed,
}

#[derive(Debug, Clone)]
pub struct HandshakeConfig {
    /// Pre-shared key from provisioning; used only for the C0 exchange
    pub key_one: [u8; KEY_SIZE],
    pub token: ConnectionToken,
    /// Connection originates from a shared/guest flow; token trust
    /// failures then surface as `SharedLockAlreadyUsed`
    pub from_sharing: bool,
    /// Per-step reply timeout; expiry aborts the whole handshake
    pub step_timeout: Duration,
}

/// An established session: the derived key, the (possibly upgraded)
/// permanent token and the serial counter for subsequent commands.
#[derive(Debug)]
pub struct Session {
    pub key: [u8; KEY_SIZE],
    pub token: PermanentToken,
    pub builder: CommandBuilder,
}

impl Session {
    pub fn permission(&self) -> Permission {
        self.token.permission
    }
}

/// XOR the two exchanged nonces into the session key.
pub fn derive_session_key(one: &[u8; KEY_SIZE], two: &[u8; KEY_SIZE]) -> [u8; KEY_SIZE] {
    std::array::from_fn(|i| one[i] ^ two[i])
}

pub struct HandshakeEngine<T: Transport> {
    transport: T,
    config: HandshakeConfig,
    state: HandshakeState,
}

impl<T: Transport> HandshakeEngine<T> {
    pub fn new(transport: T, config: HandshakeConfig) -> Self {
        Self {
            transport,
            config,
            state: HandshakeState::Idle,
        }
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// Run the handshake to completion, returning the transport together
    /// with the established session.
    pub async fn run(mut self) -> Result<(T, Session), LockError> {
        match self.drive().await {
            Ok(session) => {
                self.state = HandshakeState::SessionReady;
                Ok((self.transport, session))
            }
            Err(e) => {
                self.state = HandshakeState::Failed;
                Err(e)
            }
        }
    }

    async fn drive(&mut self) -> Result<Session, LockError> {
        let mut builder = CommandBuilder::new();

        // C0: exchange nonces under the pre-shared key
        let key_one = self.config.key_one;
        let (command, nonce_sent) = builder.build_nonce_exchange(&key_one)?;
        self.transport.write(&command).await?;
        self.state = HandshakeState::AwaitingC0Ack;
        let reply = self
            .await_function(&key_one, FunctionCode::NonceExchange)
            .await?;
        let nonce_echoed: [u8; KEY_SIZE] =
            match resolver::resolve(FunctionCode::NonceExchange, &key_one, &reply, None)? {
                DecodedResult::Nonce(bytes) if bytes.len() == KEY_SIZE => {
                    bytes.as_ref().try_into()?
                }
                DecodedResult::Nonce(bytes) => {
                    return Err(LockError::Protocol(format!(
                        "nonce echo of {} bytes, expected {KEY_SIZE}",
                        bytes.len()
                    )));
                }
                other => {
                    return Err(LockError::Protocol(format!(
                        "unexpected C0 decode result: {other:?}"
                    )));
                }
            };
        let key_two = derive_session_key(&nonce_sent, &nonce_echoed);
        debug!("session key derived from nonce exchange");

        // C1: present the connection token under the session key
        self.state = HandshakeState::AwaitingC1Ack;
        let command = builder.build(
            FunctionCode::TokenValidate,
            &key_two,
            self.config.token.bytes(),
        )?;
        self.transport.write(&command).await?;
        let reply = self
            .await_function(&key_two, FunctionCode::TokenValidate)
            .await?;
        let validation =
            match resolver::resolve(FunctionCode::TokenValidate, &key_two, &reply, None)? {
                DecodedResult::TokenValidation(v) => v,
                other => {
                    return Err(LockError::Protocol(format!(
                        "unexpected C1 decode result: {other:?}"
                    )));
                }
            };
        match validation.state {
            TokenState::Illegal => return Err(self.token_failure(LockError::IllegalToken)),
            TokenState::Refused => return Err(self.token_failure(LockError::TokenRefused)),
            TokenState::Valid => {
                let token = PermanentToken {
                    is_valid: true,
                    is_permanent: true,
                    is_owner: validation.permission == Permission::Owner,
                    permission: validation.permission,
                    token: validation
                        .token_echo
                        .unwrap_or(*self.config.token.bytes()),
                    name: String::new(),
                };
                info!(permission = %token.permission, "session ready");
                return Ok(Session {
                    key: key_two,
                    token,
                    builder,
                });
            }
            TokenState::OneTime => {}
        }

        // E5: the device pushes the upgraded token asynchronously; only
        // the first matching push is consumed, repeats are left alone
        self.state = HandshakeState::AwaitingE5;
        debug!("one-time token accepted, awaiting upgrade push");
        let push = self
            .await_function(&key_two, FunctionCode::TokenDetail)
            .await?;
        let detail = match resolver::resolve(FunctionCode::TokenDetail, &key_two, &push, None)? {
            DecodedResult::TokenDetail(t) => t,
            other => {
                return Err(LockError::Protocol(format!(
                    "unexpected E5 decode result: {other:?}"
                )));
            }
        };
        if !detail.is_permanent {
            return Err(LockError::Protocol(
                "token upgrade did not grant a permanent token".to_string(),
            ));
        }
        info!(permission = %detail.permission, "one-time token upgraded, session ready");
        Ok(Session {
            key: key_two,
            token: detail,
            builder,
        })
    }

    fn token_failure(&self, fallback: LockError) -> LockError {
        if self.config.from_sharing {
            LockError::SharedLockAlreadyUsed
        } else {
            fallback
        }
    }

    /// Filter-first-match: skip notifications that do not decrypt to the
    /// expected function byte. The 0xEF sentinel aborts immediately; the
    /// step timeout bounds the whole wait.
    async fn await_function(
        &mut self,
        key: &[u8; KEY_SIZE],
        expected: FunctionCode,
    ) -> Result<Bytes, LockError> {
        let step_timeout = self.config.step_timeout;
        timeout(step_timeout, async {
            loop {
                let frame = self.transport.next_notification().await?;
                if validator::is_valid(key, &frame, expected)? {
                    return Ok(frame);
                }
            }
        })
        .await?
    }
}

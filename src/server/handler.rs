//! Connection Handler
//!
//! Reads request lines, executes them against the store and writes the
//! responses back.

use crate::error::ProtocolError;
use crate::metrics::Metrics;
use crate::protocol::{Command, LineCodec, Response};
use crate::storage::Store;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::Framed;
use tracing::debug;

/// Connection handler
pub struct Handler {
    store: Store,
    metrics: Arc<Metrics>,
}

impl Handler {
    /// Create a new handler
    pub fn new(store: Store, metrics: Arc<Metrics>) -> Self {
        Self { store, metrics }
    }

    /// Run the handler until the peer disconnects or the framing fails
    pub async fn run<T>(self, mut framed: Framed<T, LineCodec>) -> Result<(), ProtocolError>
    where
        T: AsyncRead + AsyncWrite + Unpin,
    {
        while let Some(result) = framed.next().await {
            let line = match result {
                Ok(line) => line,
                Err(e) => {
                    if !matches!(e, ProtocolError::Io(_)) {
                        let _ = framed.send(Response::Error(e.to_string())).await;
                    }
                    return Err(e);
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            let response = match Command::parse(&line) {
                Ok(cmd) => {
                    let start = Instant::now();
                    let name = cmd.name();
                    let response = self.execute(cmd);

                    let elapsed = start.elapsed();
                    self.metrics
                        .record_operation(name, elapsed, response.is_error());
                    debug!(cmd = name, latency = ?elapsed, "Command executed");
                    response
                }
                Err(e) => {
                    self.metrics.record_rejected();
                    Response::from(e)
                }
            };

            framed.send(response).await?;
        }

        Ok(())
    }

    /// Execute a command and return response
    pub fn execute(&self, cmd: Command) -> Response {
        let store = &self.store;
        match cmd {
            Command::Ping => Response::Pong,

            Command::Get { key } => match store.get(&key) {
                Ok(value) => Response::Value(value),
                Err(e) => e.into(),
            },
            Command::Set { key, value } => ok(store.set(key, value)),
            Command::SetEx { key, value, ttl } => ok(store.set_ex(key, value, ttl)),
            Command::Del { key } => ok(store.del(&key)),
            Command::MGet { keys } => Response::Array(store.mget(&keys)),
            Command::Expire { key, ttl } => ok(store.expire(&key, ttl)),
            Command::Persist { key } => ok(store.persist(&key)),
            Command::Exists { key } => Response::Bool(store.exists(&key)),
            Command::Keys => Response::strings(store.keys()),
            Command::Ttl { key } => match store.ttl(&key) {
                Ok(Some(secs)) => Response::Integer(secs.round() as i64),
                Ok(None) => Response::Integer(-1),
                Err(e) => e.into(),
            },
            Command::ExpireTime { key } => match store.expire_time(&key) {
                Ok(Some(at)) => Response::Integer(at.timestamp()),
                Ok(None) => Response::Integer(-1),
                Err(e) => e.into(),
            },

            Command::SAdd { set, elements } => {
                let added = elements
                    .into_iter()
                    .map(|e| store.sadd(&set, e))
                    .filter(|&added| added)
                    .count();
                Response::Integer(added as i64)
            }
            Command::SRem { set, element } => ok(store.srem(&set, &element)),
            Command::SCard { set } => count(store.scard(&set)),
            Command::SMembers { set } => strings(store.smembers(&set)),
            Command::SIsMember { set, element } => boolean(store.sismember(&set, &element)),
            Command::SDiff { first, second } => strings(store.sdiff(&first, &second)),
            Command::SDiffStore {
                first,
                second,
                dest,
            } => ok(store.sdiffstore(&first, &second, &dest)),
            Command::SInter { first, second } => strings(store.sinter(&first, &second)),
            Command::SInterStore {
                first,
                second,
                dest,
            } => ok(store.sinterstore(&first, &second, &dest)),
            Command::SUnion { first, second } => strings(store.sunion(&first, &second)),

            Command::ZAdd { set, elements } => {
                let added = elements
                    .into_iter()
                    .map(|e| store.zadd(&set, e))
                    .filter(|&added| added)
                    .count();
                Response::Integer(added as i64)
            }
            Command::ZRem { set, element } => ok(store.zrem(&set, &element)),
            Command::ZCard { set } => count(store.zcard(&set)),
            Command::ZMembers { set } => strings(store.zmembers(&set)),
            Command::ZIsMember { set, element } => boolean(store.zismember(&set, &element)),
            Command::ZDiff { first, second } => strings(store.zdiff(&first, &second)),
            Command::ZDiffStore {
                first,
                second,
                dest,
            } => ok(store.zdiffstore(&first, &second, &dest)),
            Command::ZInter { first, second } => strings(store.zinter(&first, &second)),
            Command::ZInterStore {
                first,
                second,
                dest,
            } => ok(store.zinterstore(&first, &second, &dest)),
            Command::ZUnion { first, second } => strings(store.zunion(&first, &second)),
        }
    }
}

fn ok(result: crate::Result<()>) -> Response {
    match result {
        Ok(()) => Response::Ok,
        Err(e) => e.into(),
    }
}

fn count(result: crate::Result<usize>) -> Response {
    match result {
        Ok(n) => Response::Integer(n as i64),
        Err(e) => e.into(),
    }
}

fn boolean(result: crate::Result<bool>) -> Response {
    match result {
        Ok(b) => Response::Bool(b),
        Err(e) => e.into(),
    }
}

fn strings(result: crate::Result<Vec<String>>) -> Response {
    match result {
        Ok(items) => Response::strings(items),
        Err(e) => e.into(),
    }
}

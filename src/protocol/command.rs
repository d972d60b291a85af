//! Command Parsing
//!
//! Turns one request line into a typed command. Tokens are separated by
//! whitespace and the verb is case-insensitive.

use std::time::Duration;

use crate::error::ProtocolError;

/// Parsed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Health check
    Ping,

    Get { key: String },
    Set { key: String, value: String },
    /// `ttl == None` stores a persistent record (`-1` on the wire)
    SetEx { key: String, value: String, ttl: Option<Duration> },
    Del { key: String },
    MGet { keys: Vec<String> },
    Expire { key: String, ttl: Option<Duration> },
    Persist { key: String },
    Exists { key: String },
    Keys,
    Ttl { key: String },
    ExpireTime { key: String },

    SAdd { set: String, elements: Vec<String> },
    SRem { set: String, element: String },
    SCard { set: String },
    SMembers { set: String },
    SIsMember { set: String, element: String },
    SDiff { first: String, second: String },
    SDiffStore { first: String, second: String, dest: String },
    SInter { first: String, second: String },
    SInterStore { first: String, second: String, dest: String },
    SUnion { first: String, second: String },

    ZAdd { set: String, elements: Vec<String> },
    ZRem { set: String, element: String },
    ZCard { set: String },
    ZMembers { set: String },
    ZIsMember { set: String, element: String },
    ZDiff { first: String, second: String },
    ZDiffStore { first: String, second: String, dest: String },
    ZInter { first: String, second: String },
    ZInterStore { first: String, second: String, dest: String },
    ZUnion { first: String, second: String },
}

impl Command {
    /// Parse a single request line (without its line terminator)
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let mut tokens = line.split_whitespace();
        let verb = tokens.next().ok_or(ProtocolError::Empty)?.to_ascii_uppercase();
        let args: Vec<&str> = tokens.collect();

        let cmd = match verb.as_str() {
            "PING" => {
                exact::<0>("PING", &args)?;
                Command::Ping
            }
            "GET" => {
                let [key] = exact("GET", &args)?;
                Command::Get { key: key.into() }
            }
            "SET" => {
                let [key, value] = exact("SET", &args)?;
                Command::Set {
                    key: key.into(),
                    value: value.into(),
                }
            }
            "SETEX" => {
                let [key, value, ttl] = exact("SETEX", &args)?;
                Command::SetEx {
                    key: key.into(),
                    value: value.into(),
                    ttl: parse_ttl(ttl)?,
                }
            }
            "DEL" => {
                let [key] = exact("DEL", &args)?;
                Command::Del { key: key.into() }
            }
            "MGET" => Command::MGet {
                keys: at_least("MGET", &args, 1)?,
            },
            "EXPIRE" => {
                let [key, ttl] = exact("EXPIRE", &args)?;
                Command::Expire {
                    key: key.into(),
                    ttl: parse_ttl(ttl)?,
                }
            }
            "PERSIST" => {
                let [key] = exact("PERSIST", &args)?;
                Command::Persist { key: key.into() }
            }
            "EXISTS" => {
                let [key] = exact("EXISTS", &args)?;
                Command::Exists { key: key.into() }
            }
            "KEYS" => {
                exact::<0>("KEYS", &args)?;
                Command::Keys
            }
            "TTL" => {
                let [key] = exact("TTL", &args)?;
                Command::Ttl { key: key.into() }
            }
            "EXPIRETIME" => {
                let [key] = exact("EXPIRETIME", &args)?;
                Command::ExpireTime { key: key.into() }
            }

            "SADD" => {
                let mut elements = at_least("SADD", &args, 2)?;
                let set = elements.remove(0);
                Command::SAdd { set, elements }
            }
            "SREM" => {
                let [set, element] = exact("SREM", &args)?;
                Command::SRem {
                    set: set.into(),
                    element: element.into(),
                }
            }
            "SCARD" => {
                let [set] = exact("SCARD", &args)?;
                Command::SCard { set: set.into() }
            }
            "SMEMBERS" => {
                let [set] = exact("SMEMBERS", &args)?;
                Command::SMembers { set: set.into() }
            }
            "SISMEMBER" => {
                let [set, element] = exact("SISMEMBER", &args)?;
                Command::SIsMember {
                    set: set.into(),
                    element: element.into(),
                }
            }
            "SDIFF" => {
                let [first, second] = exact("SDIFF", &args)?;
                Command::SDiff {
                    first: first.into(),
                    second: second.into(),
                }
            }
            "SDIFFSTORE" => {
                let [first, second, dest] = exact("SDIFFSTORE", &args)?;
                Command::SDiffStore {
                    first: first.into(),
                    second: second.into(),
                    dest: dest.into(),
                }
            }
            "SINTER" => {
                let [first, second] = exact("SINTER", &args)?;
                Command::SInter {
                    first: first.into(),
                    second: second.into(),
                }
            }
            "SINTERSTORE" => {
                let [first, second, dest] = exact("SINTERSTORE", &args)?;
                Command::SInterStore {
                    first: first.into(),
                    second: second.into(),
                    dest: dest.into(),
                }
            }
            "SUNION" => {
                let [first, second] = exact("SUNION", &args)?;
                Command::SUnion {
                    first: first.into(),
                    second: second.into(),
                }
            }

            "ZADD" => {
                let mut elements = at_least("ZADD", &args, 2)?;
                let set = elements.remove(0);
                Command::ZAdd { set, elements }
            }
            "ZREM" => {
                let [set, element] = exact("ZREM", &args)?;
                Command::ZRem {
                    set: set.into(),
                    element: element.into(),
                }
            }
            "ZCARD" => {
                let [set] = exact("ZCARD", &args)?;
                Command::ZCard { set: set.into() }
            }
            "ZMEMBERS" => {
                let [set] = exact("ZMEMBERS", &args)?;
                Command::ZMembers { set: set.into() }
            }
            "ZISMEMBER" => {
                let [set, element] = exact("ZISMEMBER", &args)?;
                Command::ZIsMember {
                    set: set.into(),
                    element: element.into(),
                }
            }
            "ZDIFF" => {
                let [first, second] = exact("ZDIFF", &args)?;
                Command::ZDiff {
                    first: first.into(),
                    second: second.into(),
                }
            }
            "ZDIFFSTORE" => {
                let [first, second, dest] = exact("ZDIFFSTORE", &args)?;
                Command::ZDiffStore {
                    first: first.into(),
                    second: second.into(),
                    dest: dest.into(),
                }
            }
            "ZINTER" => {
                let [first, second] = exact("ZINTER", &args)?;
                Command::ZInter {
                    first: first.into(),
                    second: second.into(),
                }
            }
            "ZINTERSTORE" => {
                let [first, second, dest] = exact("ZINTERSTORE", &args)?;
                Command::ZInterStore {
                    first: first.into(),
                    second: second.into(),
                    dest: dest.into(),
                }
            }
            "ZUNION" => {
                let [first, second] = exact("ZUNION", &args)?;
                Command::ZUnion {
                    first: first.into(),
                    second: second.into(),
                }
            }

            _ => return Err(ProtocolError::UnknownCommand(verb)),
        };

        Ok(cmd)
    }

    /// Verb name, used for metrics and logging
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ping => "PING",
            Command::Get { .. } => "GET",
            Command::Set { .. } => "SET",
            Command::SetEx { .. } => "SETEX",
            Command::Del { .. } => "DEL",
            Command::MGet { .. } => "MGET",
            Command::Expire { .. } => "EXPIRE",
            Command::Persist { .. } => "PERSIST",
            Command::Exists { .. } => "EXISTS",
            Command::Keys => "KEYS",
            Command::Ttl { .. } => "TTL",
            Command::ExpireTime { .. } => "EXPIRETIME",
            Command::SAdd { .. } => "SADD",
            Command::SRem { .. } => "SREM",
            Command::SCard { .. } => "SCARD",
            Command::SMembers { .. } => "SMEMBERS",
            Command::SIsMember { .. } => "SISMEMBER",
            Command::SDiff { .. } => "SDIFF",
            Command::SDiffStore { .. } => "SDIFFSTORE",
            Command::SInter { .. } => "SINTER",
            Command::SInterStore { .. } => "SINTERSTORE",
            Command::SUnion { .. } => "SUNION",
            Command::ZAdd { .. } => "ZADD",
            Command::ZRem { .. } => "ZREM",
            Command::ZCard { .. } => "ZCARD",
            Command::ZMembers { .. } => "ZMEMBERS",
            Command::ZIsMember { .. } => "ZISMEMBER",
            Command::ZDiff { .. } => "ZDIFF",
            Command::ZDiffStore { .. } => "ZDIFFSTORE",
            Command::ZInter { .. } => "ZINTER",
            Command::ZInterStore { .. } => "ZINTERSTORE",
            Command::ZUnion { .. } => "ZUNION",
        }
    }
}

fn exact<'a, const N: usize>(
    name: &'static str,
    args: &[&'a str],
) -> Result<[&'a str; N], ProtocolError> {
    <[&str; N]>::try_from(args).map_err(|_| ProtocolError::WrongArity(name))
}

fn at_least(name: &'static str, args: &[&str], min: usize) -> Result<Vec<String>, ProtocolError> {
    if args.len() < min {
        return Err(ProtocolError::WrongArity(name));
    }
    Ok(args.iter().map(|s| s.to_string()).collect())
}

/// Seconds, or `-1` for a persistent record
fn parse_ttl(raw: &str) -> Result<Option<Duration>, ProtocolError> {
    let secs: i64 = raw
        .parse()
        .map_err(|_| ProtocolError::InvalidInteger(raw.to_string()))?;
    match secs {
        -1 => Ok(None),
        s if s < 0 => Err(ProtocolError::InvalidExpire(s)),
        s => Ok(Some(Duration::from_secs(s as u64))),
    }
}

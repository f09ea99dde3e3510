//! Command Driver
//!
//! Line-oriented commands for driving a [`SharedCache<String>`] from a script.
//!
//! # Commands
//! - `SET <key> <value> <priority> <expire_at_ms>`
//! - `GET <key>`
//! - `DEL <key>`
//! - `RESIZE <max_items>`
//! - `KEYS`
//! - `STATS`
//! - `PURGE`
//!
//! A line may start with `@<now_ms>` to pin the clock for that command;
//! otherwise the wall clock is used. A word starting with `#` begins a
//! comment; `#` elsewhere in a word is kept.

use crate::cache::{current_timestamp_ms, Timestamp};
use crate::error::{CommandError, Result};
use crate::handle::SharedCache;

/// Commands understood by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set {
        key: String,
        value: String,
        priority: i64,
        expire_at: Timestamp,
    },
    Get {
        key: String,
    },
    Delete {
        key: String,
    },
    Resize {
        max_items: i64,
    },
    Keys,
    Stats,
    Purge,
}

/// A parsed line: the command plus an optional pinned clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub now: Option<Timestamp>,
    pub command: Command,
}

impl Command {
    /// Parses one script line.
    ///
    /// Blank and comment-only lines yield `Ok(None)`.
    pub fn parse_line(line: &str) -> Result<Option<Invocation>> {
        // A comment starts at a word beginning with '#'; '#' inside a word is data.
        let mut words: Vec<&str> = line
            .split_whitespace()
            .take_while(|word| !word.starts_with('#'))
            .collect();
        if words.is_empty() {
            return Ok(None);
        }

        let now = match words[0].strip_prefix('@') {
            Some(ts) => {
                let ts = parse_number(ts, "timestamp")?;
                words.remove(0);
                Some(ts)
            }
            None => None,
        };

        let (name, args) = match words.split_first() {
            Some((name, args)) => (*name, args),
            None => return Err(CommandError::Empty),
        };

        let command = match name.to_lowercase().as_str() {
            "set" => {
                expect_arity("SET", args, 4)?;
                Command::Set {
                    key: args[0].to_string(),
                    value: args[1].to_string(),
                    priority: parse_number(args[2], "priority")?,
                    expire_at: parse_number(args[3], "expire_at")?,
                }
            }
            "get" => {
                expect_arity("GET", args, 1)?;
                Command::Get {
                    key: args[0].to_string(),
                }
            }
            "del" | "delete" => {
                expect_arity("DEL", args, 1)?;
                Command::Delete {
                    key: args[0].to_string(),
                }
            }
            "resize" => {
                expect_arity("RESIZE", args, 1)?;
                Command::Resize {
                    max_items: parse_number(args[0], "max_items")?,
                }
            }
            "keys" => {
                expect_arity("KEYS", args, 0)?;
                Command::Keys
            }
            "stats" => {
                expect_arity("STATS", args, 0)?;
                Command::Stats
            }
            "purge" => {
                expect_arity("PURGE", args, 0)?;
                Command::Purge
            }
            _ => return Err(CommandError::UnknownCommand(name.to_string())),
        };

        Ok(Some(Invocation { now, command }))
    }
}

impl Invocation {
    /// Applies the command and renders its reply.
    pub async fn execute(self, cache: &SharedCache<String>) -> Result<String> {
        let now = self.now.unwrap_or_else(current_timestamp_ms);

        let reply = match self.command {
            Command::Set {
                key,
                value,
                priority,
                expire_at,
            } => {
                cache.set_at(key, value, priority, expire_at, now).await;
                "OK".to_string()
            }
            Command::Get { key } => cache
                .get_at(&key, now)
                .await
                .unwrap_or_else(|| "(nil)".to_string()),
            Command::Delete { key } => match cache.remove(&key).await {
                Some(_) => "1".to_string(),
                None => "0".to_string(),
            },
            Command::Resize { max_items } => {
                cache.set_max_items_at(max_items, now).await;
                "OK".to_string()
            }
            Command::Keys => {
                let mut keys = cache.keys().await;
                if keys.is_empty() {
                    "(empty)".to_string()
                } else {
                    keys.sort();
                    keys.join(" ")
                }
            }
            Command::Stats => serde_json::to_string(&cache.stats().await)?,
            Command::Purge => cache.purge_expired_at(now).await.to_string(),
        };

        Ok(reply)
    }
}

fn expect_arity(command: &'static str, args: &[&str], expected: usize) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(CommandError::WrongArity {
            command,
            expected,
            got: args.len(),
        })
    }
}

fn parse_number<T: std::str::FromStr>(value: &str, name: &'static str) -> Result<T> {
    value.parse().map_err(|_| CommandError::InvalidNumber {
        name,
        value: value.to_string(),
    })
}

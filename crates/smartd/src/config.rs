//! Daemon configuration, read from environment variables

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::{bail, Context};
use smart_api::AuthPolicy;
use smart_mongo::config::DEFAULT_DATABASE;
use smart_mongo::MongoConfig;

const DEFAULT_PORT: u16 = 3000;

/// Which document store backs the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    /// MongoDB deployment
    Mongo(MongoConfig),
    /// In-process store, contents lost on exit
    Memory,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_address: IpAddr,
    pub port: u16,
    pub store: StoreKind,
    pub auth_policy: AuthPolicy,
    pub log_format: LogFormat,
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {raw}"))?,
            None => DEFAULT_PORT,
        };

        let bind_address = match var("BIND_ADDRESS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("BIND_ADDRESS is not an IP address: {raw}"))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let auth_policy = if parse_flag("AUTH_ENFORCE", var("AUTH_ENFORCE"), false)? {
            AuthPolicy::Enforce
        } else {
            AuthPolicy::Permissive
        };

        let log_format = match var("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => bail!("LOG_FORMAT must be 'text' or 'json', got '{other}'"),
        };

        let store = match var("SMART_STORE").as_deref().map(str::trim) {
            None | Some("mongodb") => {
                let mongo = match var("MONGODB_URI") {
                    Some(uri) => MongoConfig::new(uri),
                    None => match (var("DB_USER"), var("DB_PASS")) {
                        (Some(user), Some(pass)) => MongoConfig::atlas(&user, &pass),
                        _ => bail!("set MONGODB_URI, or DB_USER and DB_PASS, to reach MongoDB"),
                    },
                };
                let ensure_indexes = parse_flag("ENSURE_INDEXES", var("ENSURE_INDEXES"), true)?;
                StoreKind::Mongo(
                    mongo
                        .with_database(var("DB_NAME").unwrap_or_else(|| DEFAULT_DATABASE.into()))
                        .with_ensure_indexes(ensure_indexes),
                )
            }
            Some("memory") => StoreKind::Memory,
            Some(other) => bail!("SMART_STORE must be 'mongodb' or 'memory', got '{other}'"),
        };

        Ok(Self {
            bind_address,
            port,
            store,
            auth_policy,
            log_format,
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

fn parse_flag(name: &str, raw: Option<String>, default: bool) -> anyhow::Result<bool> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("{name} must be a boolean, got '{raw}'"),
    }
}

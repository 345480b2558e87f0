use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use jiff::tz::TimeZone;
use thiserror::Error;

pub const BIND_ADDR: &str = "FRONTDESK_BIND_ADDR";
pub const STORE: &str = "FRONTDESK_STORE";
pub const BUCKET: &str = "FRONTDESK_BUCKET";
pub const REGION: &str = "AWS_REGION";
pub const POLL_INTERVAL_SECS: &str = "FRONTDESK_POLL_INTERVAL_SECS";
pub const TIMEZONE: &str = "FRONTDESK_TIMEZONE";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_BUCKET: &str = "frontdesk";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

#[derive(Debug, Error)]
#[error("invalid {var}={value:?}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    S3,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "s3" => Ok(Self::S3),
            _ => Err("expected `memory` or `s3`".to_string()),
        }
    }
}

/// Deployment settings, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct FrontdeskConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreKind,
    pub bucket: String,
    /// `None` leaves region resolution to the AWS SDK.
    pub region: Option<String>,
    /// How often the S3 store re-reads live query results.
    pub poll_interval: Duration,
    /// Clinic time zone; decides where "today" and weekdays begin.
    pub timezone: TimeZone,
}

impl FrontdeskConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build the config from an arbitrary variable source. Blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_addr = parse_with(BIND_ADDR, var(BIND_ADDR), DEFAULT_BIND_ADDR, |v| {
            v.parse::<SocketAddr>().map_err(|e| e.to_string())
        })?;
        let store = parse_with(STORE, var(STORE), "memory", StoreKind::from_str)?;
        let bucket = var(BUCKET).unwrap_or_else(|| DEFAULT_BUCKET.to_string());
        let region = var(REGION);

        let poll_secs = parse_with(
            POLL_INTERVAL_SECS,
            var(POLL_INTERVAL_SECS),
            &DEFAULT_POLL_INTERVAL_SECS.to_string(),
            |v| match v.parse::<u64>() {
                Ok(0) => Err("must be at least 1".to_string()),
                Ok(secs) => Ok(secs),
                Err(e) => Err(e.to_string()),
            },
        )?;

        let timezone = parse_with(TIMEZONE, var(TIMEZONE), "UTC", parse_timezone)?;

        Ok(Self {
            bind_addr,
            store,
            bucket,
            region,
            poll_interval: Duration::from_secs(poll_secs),
            timezone,
        })
    }
}

fn parse_with<T, P>(var: &'static str, value: Option<String>, default: &str, parse: P) -> Result<T, ConfigError>
where
    P: FnOnce(&str) -> Result<T, String>,
{
    let raw = value.unwrap_or_else(|| default.to_string());
    parse(raw.trim()).map_err(|reason| ConfigError {
        var,
        value: raw.clone(),
        reason,
    })
}

fn parse_timezone(name: &str) -> Result<TimeZone, String> {
    if name.eq_ignore_ascii_case("UTC") {
        return Ok(TimeZone::UTC);
    }
    TimeZone::get(name).map_err(|e| e.to_string())
}

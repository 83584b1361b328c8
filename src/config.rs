//! Process configuration from the environment.

use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;

use tracing::info;

use crate::error::Error;

const ADDR_KEY: &str = "PANTRY_ADDR";
const ADDR_DEFAULT: &str = "0.0.0.0:8080";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Socket address the server listens on. `PANTRY_ADDR`, default `0.0.0.0:8080`.
    pub addr: SocketAddr,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] when a variable is set but does not parse.
    pub fn load() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::load`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        Ok(Self {
            addr: try_load(&lookup, ADDR_KEY, ADDR_DEFAULT)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

fn try_load<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, Error>
where
    T: FromStr,
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_owned()
    });

    value.parse().map_err(|e: T::Err| Error::Config {
        key,
        reason: e.to_string(),
        value,
    })
}

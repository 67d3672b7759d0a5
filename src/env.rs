use std::{collections::HashMap, ffi::OsString, fmt, path::Path, str::FromStr};

use alloy::primitives::{Address, B256};
use reqwest::Url;
use serde::Deserialize;

pub const PRIVATE_KEY_VAR: &str = "PRIVATE_KEY";
pub const CAST_BIN_VAR: &str = "CAST_BIN";
pub const SETTINGS_PREFIX: &str = "TRIVIA_";
pub const DEFAULT_ENV_FILE: &str = ".env";
pub const DEFAULT_RPC_URL: &str = "https://sepolia-rollup.arbitrum.io/rpc";
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x7e32b54800705876d3b5cfbc7d9c226a211f7c1a";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read env file {path}: {source}")]
    EnvFile {
        path: String,
        #[source]
        source: dotenvy::Error,
    },
    #[error("failed to parse environment: {0}")]
    Env(#[from] envy::Error),
    #[error("invalid RPC URL {url}: {reason}")]
    RpcUrl { url: String, reason: String },
    #[error("invalid contract address {address}: {reason}")]
    ContractAddress { address: String, reason: String },
    #[error("private key is not 32 hex-encoded bytes")]
    PrivateKey,
    #[error("{name} is not valid unicode")]
    NotUnicode { name: String },
}

/// Variables consumed from the environment (and the env file).
#[derive(Deserialize, Debug, Default)]
pub struct EnvVar {
    #[serde(default)]
    pub private_key: Option<SigningKey>,
    #[serde(default)]
    pub cast_bin: Option<String>,
}

impl EnvVar {
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut env: Self = envy::from_iter(vars)?;
        // An empty value is treated the same as an unset one.
        if env
            .private_key
            .as_ref()
            .is_some_and(|key| key.as_str().is_empty())
        {
            env.private_key = None;
        }
        env.cast_bin = env.cast_bin.filter(|v| !v.is_empty());
        Ok(env)
    }
}

/// `TRIVIA_`-prefixed overrides of the built-in target.
#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    #[serde(default)]
    pub rpc_url: Option<String>,
    #[serde(default)]
    pub contract_address: Option<String>,
}

impl Settings {
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let settings: Self = envy::prefixed(SETTINGS_PREFIX).from_iter(vars)?;
        Ok(Self {
            rpc_url: settings.rpc_url.filter(|v| !v.is_empty()),
            contract_address: settings.contract_address.filter(|v| !v.is_empty()),
        })
    }
}

/// Target of every contract interaction, after flags, env and defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub rpc_url: String,
    pub contract_address: String,
}

impl Config {
    /// Precedence is flag, then `TRIVIA_*` variable, then the built-in default.
    pub fn resolve(
        rpc_url_flag: Option<String>,
        contract_address_flag: Option<String>,
        settings: Settings,
    ) -> Result<Self, ConfigError> {
        let rpc_url = rpc_url_flag
            .or(settings.rpc_url)
            .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        let contract_address = contract_address_flag
            .or(settings.contract_address)
            .unwrap_or_else(|| DEFAULT_CONTRACT_ADDRESS.to_string());

        let config = Self {
            rpc_url,
            contract_address,
        };
        config.parsed_url()?;
        config.parsed_address()?;
        Ok(config)
    }

    pub fn parsed_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.rpc_url).map_err(|e| ConfigError::RpcUrl {
            url: self.rpc_url.clone(),
            reason: e.to_string(),
        })
    }

    pub fn parsed_address(&self) -> Result<Address, ConfigError> {
        parse_contract_address(&self.contract_address)
    }
}

pub fn parse_contract_address(address: &str) -> Result<Address, ConfigError> {
    Address::from_str(address).map_err(|e| ConfigError::ContractAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

/// A private key as handed to the signer. Always carries the `0x` prefix.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey(String);

impl SigningKey {
    /// Prepends `0x` unless the value already starts with it (case-sensitive).
    pub fn normalize(raw: &str) -> Self {
        if raw.starts_with("0x") {
            Self(raw.to_string())
        } else {
            Self(format!("0x{raw}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `0x` followed by exactly 32 bytes of hex.
    pub fn is_well_formed(&self) -> bool {
        self.0
            .strip_prefix("0x")
            .and_then(|digits| hex::decode(digits).ok())
            .is_some_and(|bytes| bytes.len() == 32)
    }

    pub fn to_b256(&self) -> Result<B256, ConfigError> {
        if !self.is_well_formed() {
            return Err(ConfigError::PrivateKey);
        }
        B256::from_str(&self.0).map_err(|_| ConfigError::PrivateKey)
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

impl<'de> Deserialize<'de> for SigningKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(Self(raw));
        }
        Ok(Self::normalize(&raw))
    }
}

/// Reads `KEY=value` pairs from a dotenv file. A missing file yields no pairs.
pub fn read_env_file(path: &Path) -> Result<Vec<(String, String)>, ConfigError> {
    let to_error = |source: dotenvy::Error| ConfigError::EnvFile {
        path: path.display().to_string(),
        source,
    };
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => {
            log::debug!("no env file at {}", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(to_error(e)),
    };
    iter.collect::<Result<Vec<_>, _>>().map_err(to_error)
}

fn is_consumed(name: &str) -> bool {
    name == PRIVATE_KEY_VAR || name == CAST_BIN_VAR || name.starts_with(SETTINGS_PREFIX)
}

/// Converts process variables to strings. Variables this tool reads must be
/// valid unicode; anything else that is not is skipped.
pub fn unicode_vars<I>(vars: I) -> Result<Vec<(String, String)>, ConfigError>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut converted = Vec::new();
    for (key, value) in vars {
        let Ok(key) = key.into_string() else {
            log::debug!("skipping environment variable with a non-unicode name");
            continue;
        };
        match value.into_string() {
            Ok(value) => converted.push((key, value)),
            Err(_) if is_consumed(&key) => return Err(ConfigError::NotUnicode { name: key }),
            Err(_) => log::debug!("skipping non-unicode value of {key}"),
        }
    }
    Ok(converted)
}

/// Overlays env file values on the process environment; the file wins,
/// as it does when a shell sources it.
pub fn merged_vars<P, F>(process_vars: P, file_vars: F) -> Vec<(String, String)>
where
    P: IntoIterator<Item = (String, String)>,
    F: IntoIterator<Item = (String, String)>,
{
    let mut merged: HashMap<String, String> = process_vars.into_iter().collect();
    merged.extend(file_vars);
    merged.into_iter().collect()
}

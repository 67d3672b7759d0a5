use std::io;

use crate::{contracts::error::BlockchainError, env::ConfigError};

/// Status a shell reports when the command cannot be found.
pub const EXIT_NOT_FOUND: u8 = 127;
/// Status a shell reports when the command is not executable.
pub const EXIT_NOT_EXECUTABLE: u8 = 126;

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} exited with status {code}")]
    ToolFailed { program: String, code: u8 },
    #[error("{program} was terminated by signal {signal}")]
    ToolKilled { program: String, signal: i32 },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Blockchain(#[from] BlockchainError),
}

impl SendError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Spawn { source, .. } => match source.kind() {
                io::ErrorKind::NotFound => EXIT_NOT_FOUND,
                io::ErrorKind::PermissionDenied => EXIT_NOT_EXECUTABLE,
                _ => 1,
            },
            Self::ToolFailed { code, .. } => *code,
            Self::ToolKilled { signal, .. } => {
                u8::try_from(128 + i64::from(*signal)).unwrap_or(1)
            }
            Self::Config(_) | Self::Blockchain(_) => 1,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("PRIVATE_KEY not set. Add it to .env or export it before running")]
    MissingPrivateKey,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Send(#[from] SendError),
    #[error(transparent)]
    Query(#[from] anyhow::Error),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Send(e) => e.exit_code(),
            Self::MissingPrivateKey | Self::Config(_) | Self::Query(_) => 1,
        }
    }

    /// Tells the user what went wrong. The external tool reports its own failures.
    pub fn report(&self) {
        match self {
            Self::MissingPrivateKey => println!("Error: {self}"),
            Self::Send(SendError::ToolFailed { .. } | SendError::ToolKilled { .. }) => {
                log::debug!("{self}")
            }
            Self::Send(SendError::Blockchain(BlockchainError::Revert { name: "Unauthorized" })) => {
                log::error!("{self}");
                log::error!("the contract already has an owner; it was initialized before");
            }
            _ => log::error!("{self:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_error(kind: io::ErrorKind) -> SendError {
        SendError::Spawn {
            program: "cast".to_string(),
            source: io::Error::from(kind),
        }
    }

    #[test]
    fn test_missing_key_exits_with_one() {
        assert_eq!(CliError::MissingPrivateKey.exit_code(), 1);
        assert!(CliError::MissingPrivateKey.to_string().contains("PRIVATE_KEY"));
    }

    #[test]
    fn test_tool_status_is_propagated() {
        let err = CliError::from(SendError::ToolFailed {
            program: "cast".to_string(),
            code: 42,
        });
        assert_eq!(err.exit_code(), 42);
    }

    #[test]
    fn test_signal_maps_to_shell_status() {
        let err = SendError::ToolKilled {
            program: "cast".to_string(),
            signal: 9,
        };
        assert_eq!(err.exit_code(), 137);
    }

    #[test]
    fn test_spawn_failures_use_shell_statuses() {
        assert_eq!(spawn_error(io::ErrorKind::NotFound).exit_code(), 127);
        assert_eq!(spawn_error(io::ErrorKind::PermissionDenied).exit_code(), 126);
        assert_eq!(spawn_error(io::ErrorKind::Other).exit_code(), 1);
    }

    #[test]
    fn test_other_errors_exit_with_one() {
        assert_eq!(CliError::from(ConfigError::PrivateKey).exit_code(), 1);
        assert_eq!(CliError::from(anyhow::anyhow!("rpc down")).exit_code(), 1);
        let revert = SendError::from(BlockchainError::Revert { name: "Unauthorized" });
        assert_eq!(CliError::from(revert).exit_code(), 1);
    }
}

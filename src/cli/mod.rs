use std::path::PathBuf;

use alloy::primitives::{Address, U256};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{
    contracts::{trivia::TriviaChainContract, utils::get_provider},
    env::{
        Config, DEFAULT_ENV_FILE, EnvVar, Settings, merged_vars, read_env_file, unicode_vars,
    },
    error::CliError,
    sender::{CastSender, NativeSender, TransactionSender, cast::DEFAULT_CAST_BIN},
};

pub mod initialize;
pub mod query;

#[derive(Parser, Debug)]
#[command(
    name = "trivia-chain-backend",
    version,
    about = "Initialize and inspect the TriviaChain contract"
)]
pub struct Cli {
    /// Env file read before anything else; missing is fine.
    #[arg(long, global = true, default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    /// Overrides TRIVIA_RPC_URL and the built-in endpoint.
    #[arg(long, global = true)]
    pub rpc_url: Option<String>,

    /// Overrides TRIVIA_CONTRACT_ADDRESS and the built-in address.
    #[arg(long, global = true)]
    pub contract_address: Option<String>,

    /// Arguments of `initialize`; accepted before or after the subcommand.
    #[command(flatten)]
    pub initialize: InitializeArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Send initialize() to the contract (default).
    Initialize,
    /// Print the current leader of a session.
    Winner {
        #[arg(long)]
        session_id: u64,
    },
    /// Print a player's score in a session.
    PlayerScore {
        #[arg(long)]
        session_id: u64,
        #[arg(long)]
        player: Address,
    },
    /// List SessionCreated events.
    Sessions {
        #[arg(long, default_value_t = 0)]
        from_block: u64,
        /// Defaults to the latest block.
        #[arg(long)]
        to_block: Option<u64>,
    },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct InitializeArgs {
    #[arg(long, global = true, value_enum, default_value_t = Backend::Cast)]
    pub backend: Backend,

    /// Binary used by the cast backend. Falls back to CAST_BIN, then `cast`.
    #[arg(long, global = true)]
    pub cast_bin: Option<String>,
}

impl InitializeArgs {
    /// Flag first, then `CAST_BIN` from the environment or env file.
    pub fn cast_bin(&self, env: &EnvVar) -> String {
        self.cast_bin
            .clone()
            .or_else(|| env.cast_bin.clone())
            .unwrap_or_else(|| DEFAULT_CAST_BIN.to_string())
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Shell out to `cast send`.
    Cast,
    /// Sign and broadcast with the built-in alloy provider.
    Native,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Initialize)
    }
}

pub async fn run(cli: Cli) -> Result<(), CliError> {
    let file_vars = read_env_file(&cli.env_file)?;
    let vars = merged_vars(unicode_vars(std::env::vars_os())?, file_vars);
    run_with_vars(cli, vars).await
}

/// Runs the selected command against an already merged set of variables.
pub async fn run_with_vars(cli: Cli, vars: Vec<(String, String)>) -> Result<(), CliError> {
    let env = EnvVar::from_vars(vars.clone())?;
    let settings = Settings::from_vars(vars)?;
    let command = cli.command();

    // The key is checked before the target so a missing key is always reported as such
    if command == Command::Initialize && env.private_key.is_none() {
        return Err(CliError::MissingPrivateKey);
    }
    let config = Config::resolve(cli.rpc_url.clone(), cli.contract_address.clone(), settings)?;
    log::debug!("target: {config:?}");

    match command {
        Command::Initialize => {
            let sender: Box<dyn TransactionSender> = match cli.initialize.backend {
                Backend::Cast => Box::new(CastSender::new(cli.initialize.cast_bin(&env))),
                Backend::Native => Box::new(NativeSender),
            };
            initialize::initialize_operation(sender.as_ref(), &env, &config).await?;
        }
        Command::Winner { session_id } => {
            let contract = contract(&config)?;
            query::winner_operation(&contract, U256::from(session_id)).await?;
        }
        Command::PlayerScore { session_id, player } => {
            let contract = contract(&config)?;
            query::player_score_operation(&contract, U256::from(session_id), player).await?;
        }
        Command::Sessions {
            from_block,
            to_block,
        } => {
            let contract = contract(&config)?;
            query::sessions_operation(&contract, from_block, to_block).await?;
        }
    }
    Ok(())
}

fn contract(config: &Config) -> anyhow::Result<TriviaChainContract> {
    let provider = get_provider(&config.rpc_url)?;
    Ok(TriviaChainContract::new(provider, config.parsed_address()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SendError;
    use clap::CommandFactory;

    const KEY_HEX: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("trivia-chain-backend").chain(args.iter().copied()))
            .unwrap()
    }

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_cli_is_well_formed() {
        <Cli as CommandFactory>::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_initialize_with_cast() {
        let cli = parse(&[]);
        assert_eq!(cli.env_file, PathBuf::from(".env"));
        assert_eq!(cli.command(), Command::Initialize);
        assert_eq!(cli.initialize.backend, Backend::Cast);
        assert_eq!(cli.initialize.cast_bin, None);
    }

    #[test]
    fn test_backend_flag_without_subcommand() {
        let cli = parse(&["--backend", "native"]);
        assert_eq!(cli.command(), Command::Initialize);
        assert_eq!(cli.initialize.backend, Backend::Native);
    }

    #[test]
    fn test_backend_flag_before_initialize_subcommand() {
        let cli = parse(&["--backend", "native", "initialize"]);
        assert_eq!(cli.command(), Command::Initialize);
        assert_eq!(cli.initialize.backend, Backend::Native);
    }

    #[test]
    fn test_backend_flag_after_initialize_subcommand() {
        let cli = parse(&["initialize", "--backend", "native", "--cast-bin", "/usr/bin/cast"]);
        assert_eq!(cli.command(), Command::Initialize);
        assert_eq!(cli.initialize.backend, Backend::Native);
        assert_eq!(cli.initialize.cast_bin.as_deref(), Some("/usr/bin/cast"));
    }

    #[test]
    fn test_cast_bin_precedence() {
        let from_file = EnvVar::from_vars(vars(&[("CAST_BIN", "/from/env/cast")])).unwrap();

        assert_eq!(parse(&[]).initialize.cast_bin(&EnvVar::default()), "cast");
        assert_eq!(parse(&[]).initialize.cast_bin(&from_file), "/from/env/cast");
        assert_eq!(
            parse(&["--cast-bin", "/from/flag/cast"])
                .initialize
                .cast_bin(&from_file),
            "/from/flag/cast"
        );
    }

    #[test]
    fn test_global_overrides_after_subcommand() {
        let cli = parse(&["winner", "--session-id", "7", "--rpc-url", "http://127.0.0.1:8545"]);
        assert_eq!(cli.rpc_url.as_deref(), Some("http://127.0.0.1:8545"));
        assert_eq!(cli.command(), Command::Winner { session_id: 7 });
    }

    #[test]
    fn test_player_score_parses_address() {
        let cli = parse(&[
            "player-score",
            "--session-id",
            "1",
            "--player",
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
        ]);
        let Command::PlayerScore { player, .. } = cli.command() else {
            panic!("expected player-score");
        };
        assert_eq!(
            player,
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
                .parse::<Address>()
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_missing_key_reported_before_bad_target() {
        let err = run_with_vars(parse(&[]), vars(&[("TRIVIA_CONTRACT_ADDRESS", "0x12")]))
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::MissingPrivateKey));
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_bad_target_with_key_is_a_config_error() {
        let err = run_with_vars(
            parse(&[]),
            vars(&[("PRIVATE_KEY", KEY_HEX), ("TRIVIA_CONTRACT_ADDRESS", "0x12")]),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CliError::Config(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_cast_bin_from_env_vars_is_used() {
        use std::{fs, os::unix::fs::PermissionsExt as _};

        let dir = tempfile::tempdir().unwrap();
        let cast = dir.path().join("cast");
        fs::write(&cast, "#!/bin/sh\nexit 5\n").unwrap();
        fs::set_permissions(&cast, fs::Permissions::from_mode(0o755)).unwrap();

        let cast_bin = cast.display().to_string();
        let err = run_with_vars(
            parse(&[]),
            vars(&[("PRIVATE_KEY", KEY_HEX), ("CAST_BIN", cast_bin.as_str())]),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CliError::Send(SendError::ToolFailed { code: 5, .. })));
        assert_eq!(err.exit_code(), 5);
    }
}

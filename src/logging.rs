//! Log setup. `RUST_LOG` overrides the default filter; output goes to stderr
//! so stdout only carries status lines and query results.

use env_logger::Env;

pub const DEFAULT_FILTER: &str = "warn,trivia_chain_backend=info";

pub fn setup_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER))
        .format_timestamp(None)
        .init();
}

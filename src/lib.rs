pub mod cli;
pub mod contracts;
pub mod env;
pub mod error;
pub mod logging;
pub mod sender;

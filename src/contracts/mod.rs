pub mod error;
pub mod trivia;
pub mod utils;

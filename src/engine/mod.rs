mod async_engine;
mod command;
mod errors;
mod results;

pub use async_engine::AsyncEngine;
pub use command::{Command, Operation};
pub use errors::CommandError;
pub use results::write_summaries;

mod cancel;
pub mod cli;
pub mod command;
mod console;
mod open;
mod overview;
mod remote;
mod remove;
mod run;
mod schedule;

pub use cli::*;
pub use command::*;

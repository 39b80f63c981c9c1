mod job;
mod log;
mod requests;
mod rpc;
mod schedule;
mod snapshot;

pub use job::*;
pub use log::*;
pub use requests::*;
pub use rpc::*;
pub use schedule::*;
pub use snapshot::*;

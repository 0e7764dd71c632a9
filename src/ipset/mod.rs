mod error;
mod executor;
mod listing;
mod lock;
mod runner;
mod spec;
mod types;

pub use error::{Error, ExecError, Result, ValidationError};
#[cfg(test)]
pub use executor::MockExecutor;
pub use executor::{Executor, SystemExecutor};
pub use lock::{LockGuard, Locker};
pub use runner::{IPSET_CMD, IPSET_CMD_MANDATORY_ARGS, IpSetInterface, Runner};
pub use spec::{IpSet, IpSetBuilder};
pub use types::{Entry, HashFamily, SetType};

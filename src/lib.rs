//! Drive the Linux `ipset` utility from Rust.
//!
//! Commands are built from typed set specifications, run through an
//! [`Executor`] and, for listings, decoded from ipset's XML output.
//!
//! ```no_run
//! use ipset_runner::{Entry, IpSet, IpSetInterface, Runner};
//!
//! let runner = Runner::system();
//! runner.create_set(&IpSet::builder().name("foo").with_comment().build(), true)?;
//! runner.add_entry(&Entry::with_comment("172.18.3.2", "web"), "foo", true)?;
//! for entry in runner.list_entries("foo")? {
//!     println!("{entry}");
//! }
//! # Ok::<(), ipset_runner::Error>(())
//! ```

mod ipset;

pub use ipset::*;

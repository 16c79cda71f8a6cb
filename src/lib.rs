//! sidebyside - compare two languages' solutions to the same task
//!
//! This library extracts the code for one programming task in two languages
//! from a wiki page where each language has its own heading, caches what it
//! found per (task, language), and lists the tasks two languages share.

pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod extract;
pub mod source;
pub mod storage;

/// Re-export commonly used types
pub use compare::{Comparer, Fragments};
pub use config::Config;
pub use error::{Error, Result};
pub use extract::{TargetPair, TaskDescriptor};
pub use source::{DocumentSource, WikiClient};
pub use storage::{FragmentCache, SqliteCache};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "sidebyside";

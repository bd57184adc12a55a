#![forbid(unsafe_code)]

mod backend;
mod config;
mod error;
mod json_args;
mod source;
mod store;

pub use crate::backend::CldrFormatBackend;
pub use crate::config::{StoreConfig, load_config, load_config_or_default};
pub use crate::error::{RuntimeError, RuntimeResult};
pub use crate::json_args::args_from_json;
pub use crate::source::{DirectorySource, MemorySource, ResourceSource};
pub use crate::store::{BundleStore, dedent_resource};

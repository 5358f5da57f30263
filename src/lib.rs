#[macro_use]
extern crate quick_error;

#[macro_use]
extern crate slog_global;

mod errors;
pub use errors::*;

pub mod handle;
pub mod model;
pub mod reconfigure;
pub mod report;
pub mod resolver;
pub mod setup;
pub mod stats;

pub use handle::ClusterHandle;
pub use model::*;

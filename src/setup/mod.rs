mod conf;
pub use conf::*;

mod log_format;
pub use log_format::*;

mod opts;
pub use opts::*;

mod setup;
pub use setup::*;



#[cfg(test)]
mod test_opts;

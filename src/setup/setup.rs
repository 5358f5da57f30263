use std::fs::{self, File, OpenOptions};
use std::io::{self, Error, ErrorKind};
use std::path::Path;

use slog::Drain;
use slog::Level;
use slog::Logger;
use slog_async::AsyncGuard;

use super::log_format::AdminFormat;
use super::AdminConf;
use super::ConfError;

/// init_logger installs a global logger writing records of `tool` at or above `level` to
/// `path`.
///
/// Records are written by a background thread. Keep the returned guard until exit: dropping
/// it flushes what is pending.
pub fn init_logger<P: AsRef<Path>>(path: P, tool: &str, level: Level) -> io::Result<AsyncGuard> {
    let file = open_log_file(path)?;
    let (logger, guard) = file_logger(file, tool, level);

    slog_global::set_global(logger);

    info!("logger ready"; "level" => level.as_str());
    Ok(guard)
}

/// file_logger builds an async logger appending AdminFormat lines to `file`.
pub fn file_logger(file: File, tool: &str, level: Level) -> (Logger, AsyncGuard) {
    let decorator = slog_term::PlainDecorator::new(file);
    let drain = AdminFormat::new(decorator, tool, level).fuse();
    let (drain, guard) = slog_async::Async::new(drain).build_with_guard();

    (Logger::root(drain.fuse(), slog::o!()), guard)
}

/// init_admin_logger sets up logging the way `conf` and the command line ask.
/// It returns None if no log file is given: nothing is logged then.
pub fn init_admin_logger(
    conf: &AdminConf,
    cli_log_file: Option<&str>,
    tool: &str,
) -> Result<Option<AsyncGuard>, ConfError> {
    let path = match conf.log_file(cli_log_file) {
        Some(p) => p,
        None => return Ok(None),
    };

    let level = conf.log_level()?;
    let guard = init_logger(path, tool, level)?;
    Ok(Some(guard))
}

/// Opens log file with append mode. Creates a new log file if it doesn't exist.
fn open_log_file<P: AsRef<Path>>(path: P) -> io::Result<File> {
    let path = path.as_ref();
    let parent = path.parent().ok_or_else(|| {
        Error::new(
            ErrorKind::Other,
            "Unable to get parent directory of log file",
        )
    })?;
    if !parent.as_os_str().is_empty() && !parent.is_dir() {
        fs::create_dir_all(parent)?
    }
    OpenOptions::new().append(true).create(true).open(path)
}

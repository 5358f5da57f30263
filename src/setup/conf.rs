use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use slog::Level;

use crate::model::RpcTimeout;
use crate::model::RESOLVE_TIMEOUT;

/// The cluster to talk to if neither the command line nor the conf names one.
pub const DEFAULT_CLUSTER: &str = "127.0.0.1:61023";

quick_error! {
    #[derive(Debug)]
    pub enum ConfError {
        IOError(e: std::io::Error) {
            from(e: std::io::Error) -> (e)
            display("io error: {}", e)
        }

        BadYaml(e: serde_yaml::Error) {
            from(e: serde_yaml::Error) -> (e)
            display("bad conf yaml: {}", e)
        }

        BadLogLevel(level: String) {
            display("unknown log level: {}", level)
        }
    }
}

impl PartialEq<ConfError> for ConfError {
    fn eq(&self, other: &ConfError) -> bool {
        match (self, other) {
            (Self::IOError(a), Self::IOError(b)) => a.kind() == b.kind(),
            (Self::BadYaml(_), Self::BadYaml(_)) => true,
            (Self::BadLogLevel(a), Self::BadLogLevel(b)) => a == b,
            _ => false,
        }
    }
}

/// AdminConf is the optional yaml conf of the admin tools.
/// Every field can be left out; the command line overrides what is set here.
///
/// ```yaml
/// cluster: 192.168.0.1:61023
/// resolve_timeout_ms: 2000
/// cluster_timeout_ms: 5000
/// log_file: /var/log/celeadmin.log
/// log_level: debug
/// ```
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AdminConf {
    pub cluster: Option<String>,

    /// Timeout for resolving a server during a membership change. 0 is to wait forever.
    pub resolve_timeout_ms: Option<u64>,

    /// Timeout for reading and changing the configuration. Absent or 0 is to wait forever.
    pub cluster_timeout_ms: Option<u64>,

    pub log_file: Option<String>,
    pub log_level: Option<String>,
}

impl FromStr for AdminConf {
    type Err = ConfError;

    fn from_str(yaml: &str) -> Result<Self, Self::Err> {
        if yaml.trim().is_empty() {
            return Ok(AdminConf::default());
        }
        let conf: AdminConf = serde_yaml::from_str(yaml)?;
        conf.log_level()?;
        Ok(conf)
    }
}

impl AdminConf {
    /// from_file read admin conf yaml from a local file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<AdminConf, ConfError> {
        let content = fs::read_to_string(path)?;
        content.parse()
    }

    /// load reads the conf at `path`, or returns an empty conf if there is no path.
    pub fn load(path: Option<&str>) -> Result<AdminConf, ConfError> {
        match path {
            Some(p) => AdminConf::from_file(p),
            None => Ok(AdminConf::default()),
        }
    }

    /// cluster picks the cluster address: `cli` first, then the conf, then the default.
    pub fn cluster(&self, cli: Option<&str>) -> String {
        cli.or_else(|| self.cluster.as_deref())
            .unwrap_or(DEFAULT_CLUSTER)
            .to_string()
    }

    pub fn resolve_timeout(&self) -> RpcTimeout {
        match self.resolve_timeout_ms {
            Some(ms) => RpcTimeout::from_millis(ms),
            None => RESOLVE_TIMEOUT,
        }
    }

    pub fn cluster_timeout(&self) -> RpcTimeout {
        RpcTimeout::from_millis(self.cluster_timeout_ms.unwrap_or(0))
    }

    /// log_file picks where to log: `cli` first, then the conf. No log file means no logging.
    pub fn log_file(&self, cli: Option<&str>) -> Option<String> {
        cli.or_else(|| self.log_file.as_deref()).map(String::from)
    }

    pub fn log_level(&self) -> Result<Level, ConfError> {
        match &self.log_level {
            Some(l) => parse_level(l),
            None => Ok(Level::Info),
        }
    }
}

fn parse_level(s: &str) -> Result<Level, ConfError> {
    let l = match s.to_ascii_lowercase().as_str() {
        "critical" | "crit" => Level::Critical,
        "error" => Level::Error,
        "warning" | "warn" => Level::Warning,
        "info" => Level::Info,
        "debug" => Level::Debug,
        "trace" => Level::Trace,
        _ => return Err(ConfError::BadLogLevel(s.into())),
    };
    Ok(l)
}

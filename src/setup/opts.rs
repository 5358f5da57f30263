use std::ffi::OsString;
use std::num::ParseIntError;

use clap::{App, Arg, ArgMatches};

use crate::model::RpcTimeout;

quick_error! {
    #[derive(Debug)]
    pub enum OptsError {
        Clap(e: clap::Error) {
            from(e: clap::Error) -> (e)
            display("{}", e)
        }

        BadTimeout(v: String, e: ParseIntError) {
            display("invalid timeout {:?}: {}", v, e)
        }
    }
}

/// ReconfigureOpts is the command line of `reconfigure`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconfigureOpts {
    pub conf: Option<String>,
    pub cluster: Option<String>,
    pub log_file: Option<String>,

    /// The servers of the new membership, as addresses or names, in the order given.
    pub servers: Vec<String>,
}

/// StatsOpts is the command line of `serverstats`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsOpts {
    pub conf: Option<String>,
    pub cluster: Option<String>,
    pub log_file: Option<String>,

    /// Write the raw stats bytes instead of a readable dump.
    pub binary: bool,
    pub timeout: RpcTimeout,
    pub servers: Vec<String>,
}

fn common_args<'a, 'b>(app: App<'a, 'b>) -> App<'a, 'b> {
    app.arg(
        Arg::with_name("conf")
            .long("conf")
            .takes_value(true)
            .help("yaml conf of the admin tools"),
    )
    .arg(
        Arg::with_name("cluster")
            .long("cluster")
            .short("c")
            .takes_value(true)
            .help("address of the cluster, e.g. 127.0.0.1:61023"),
    )
    .arg(
        Arg::with_name("log-file")
            .long("log-file")
            .takes_value(true)
            .help("where to write logs, no logs if absent"),
    )
}

impl ReconfigureOpts {
    pub fn parse_from<I, T>(args: I) -> Result<ReconfigureOpts, OptsError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let app = App::new("reconfigure")
            .version(env!("CARGO_PKG_VERSION"))
            .about("change the membership of a cluster to exactly the given servers");

        let matches = common_args(app)
            .arg(
                Arg::with_name("servers")
                    .required(true)
                    .multiple(true)
                    .value_name("SERVER")
                    .help("servers of the new membership, by address or name"),
            )
            .get_matches_from_safe(args)?;

        Ok(ReconfigureOpts {
            conf: opt_string(&matches, "conf"),
            cluster: opt_string(&matches, "cluster"),
            log_file: opt_string(&matches, "log-file"),
            servers: values(&matches, "servers"),
        })
    }
}

impl StatsOpts {
    pub fn parse_from<I, T>(args: I) -> Result<StatsOpts, OptsError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let app = App::new("serverstats")
            .version(env!("CARGO_PKG_VERSION"))
            .about("fetch and print stats from each given server");

        let matches = common_args(app)
            .arg(
                Arg::with_name("binary")
                    .long("binary")
                    .short("b")
                    .help("write raw stats bytes to stdout"),
            )
            .arg(
                Arg::with_name("timeout")
                    .long("timeout")
                    .short("t")
                    .takes_value(true)
                    .default_value("0")
                    .help("seconds to wait for each server, 0 to wait forever"),
            )
            .arg(
                Arg::with_name("servers")
                    .required(true)
                    .multiple(true)
                    .value_name("ADDRESS")
                    .help("addresses of the servers to query"),
            )
            .get_matches_from_safe(args)?;

        let t = matches.value_of("timeout").unwrap_or("0");
        let secs: u64 = t
            .parse()
            .map_err(|e| OptsError::BadTimeout(t.to_string(), e))?;

        Ok(StatsOpts {
            conf: opt_string(&matches, "conf"),
            cluster: opt_string(&matches, "cluster"),
            log_file: opt_string(&matches, "log-file"),
            binary: matches.is_present("binary"),
            timeout: RpcTimeout::from_secs(secs),
            servers: values(&matches, "servers"),
        })
    }
}

fn opt_string(m: &ArgMatches, name: &str) -> Option<String> {
    m.value_of(name).map(String::from)
}

fn values(m: &ArgMatches, name: &str) -> Vec<String> {
    match m.values_of(name) {
        Some(vs) => vs.map(String::from).collect(),
        None => vec![],
    }
}

use std::time::Duration;

use super::*;
use crate::model::RpcTimeout;

use pretty_assertions::assert_eq;

#[test]
fn test_reconfigure_opts() {
    let opts = ReconfigureOpts::parse_from(vec![
        "reconfigure",
        "--cluster",
        "10.0.0.1:61023",
        "10.0.0.1:61023",
        "node-2",
    ])
    .unwrap();

    assert_eq!(
        ReconfigureOpts {
            conf: None,
            cluster: Some("10.0.0.1:61023".into()),
            log_file: None,
            servers: vec!["10.0.0.1:61023".into(), "node-2".into()],
        },
        opts
    );
}

#[test]
fn test_reconfigure_opts_requires_servers() {
    let rst = ReconfigureOpts::parse_from(vec!["reconfigure", "--conf", "a.yaml"]);
    match rst {
        Err(OptsError::Clap(e)) => assert_eq!(clap::ErrorKind::MissingRequiredArgument, e.kind),
        _ => panic!("expect missing argument but: {:?}", rst),
    }
}

#[test]
fn test_stats_opts() {
    let opts = StatsOpts::parse_from(vec![
        "serverstats",
        "-b",
        "--timeout",
        "3",
        "--log-file",
        "stats.log",
        "10.0.0.1:61023",
        "10.0.0.2:61023",
    ])
    .unwrap();

    assert_eq!(
        StatsOpts {
            conf: None,
            cluster: None,
            log_file: Some("stats.log".into()),
            binary: true,
            timeout: RpcTimeout::After(Duration::from_secs(3)),
            servers: vec!["10.0.0.1:61023".into(), "10.0.0.2:61023".into()],
        },
        opts
    );
}

#[test]
fn test_stats_opts_default_timeout_is_forever() {
    let opts = StatsOpts::parse_from(vec!["serverstats", "10.0.0.1:61023"]).unwrap();
    assert_eq!(RpcTimeout::Forever, opts.timeout);
    assert_eq!(false, opts.binary);
}

#[test]
fn test_stats_opts_bad_timeout() {
    let rst = StatsOpts::parse_from(vec!["serverstats", "-t", "soon", "10.0.0.1:61023"]);
    match rst {
        Err(OptsError::BadTimeout(v, _)) => assert_eq!("soon", v),
        _ => panic!("expect BadTimeout but: {:?}", rst),
    }
}

#[test]
fn test_opts_help() {
    let rst = StatsOpts::parse_from(vec!["serverstats", "--help"]);
    match rst {
        Err(OptsError::Clap(e)) => assert_eq!(clap::ErrorKind::HelpDisplayed, e.kind),
        _ => panic!("expect help but: {:?}", rst),
    }
}

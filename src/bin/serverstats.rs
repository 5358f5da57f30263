//! serverstats fetches diagnostic stats from each server given on the command line.

use std::io;
use std::process;

use celeadm::handle::GrpcCluster;
use celeadm::report::StatsPrinter;
use celeadm::setup::init_admin_logger;
use celeadm::setup::AdminConf;
use celeadm::setup::OptsError;
use celeadm::setup::StatsOpts;
use celeadm::stats::StatsQuery;

fn main() {
    let opts = match StatsOpts::parse_from(std::env::args_os()) {
        Ok(x) => x,
        Err(OptsError::Clap(e)) => e.exit(),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    process::exit(run(opts));
}

fn run(opts: StatsOpts) -> i32 {
    let conf = match AdminConf::load(opts.conf.as_deref()) {
        Ok(x) => x,
        Err(e) => {
            eprintln!("{}", e);
            return 1;
        }
    };

    // dropping the guard flushes pending logs, keep it till the end of run.
    let _guard = match init_admin_logger(&conf, opts.log_file.as_deref(), "serverstats") {
        Ok(g) => g,
        Err(e) => {
            eprintln!("can not set up logging: {}", e);
            return 1;
        }
    };

    let cluster = conf.cluster(opts.cluster.as_deref());
    let mut handle = match GrpcCluster::connect(&cluster) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("Could not connect to cluster {}: {}", cluster, e);
            return 1;
        }
    };
    handle.set_cluster_timeout(conf.cluster_timeout());

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut printer = StatsPrinter::new(stdout.lock(), stderr.lock(), opts.binary);

    match StatsQuery::new(handle, opts.timeout).run(&opts.servers, &mut printer) {
        Ok(summary) => summary.exit_code(),
        Err(e) => {
            eprintln!("{}", e);
            1
        }
    }
}

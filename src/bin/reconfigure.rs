//! reconfigure changes the membership of a cluster to exactly the servers given on the
//! command line.

use std::io;
use std::process;

use celeadm::handle::GrpcCluster;
use celeadm::reconfigure::Coordinator;
use celeadm::report::write_reconfiguration;
use celeadm::resolver::Resolver;
use celeadm::setup::init_admin_logger;
use celeadm::setup::AdminConf;
use celeadm::setup::OptsError;
use celeadm::setup::ReconfigureOpts;

fn main() {
    let opts = match ReconfigureOpts::parse_from(std::env::args_os()) {
        Ok(x) => x,
        Err(OptsError::Clap(e)) => e.exit(),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    process::exit(run(opts));
}

fn run(opts: ReconfigureOpts) -> i32 {
    let conf = match AdminConf::load(opts.conf.as_deref()) {
        Ok(x) => x,
        Err(e) => {
            eprintln!("{}", e);
            return 1;
        }
    };

    // dropping the guard flushes pending logs, keep it till the end of run.
    let _guard = match init_admin_logger(&conf, opts.log_file.as_deref(), "reconfigure") {
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

    let resolver = Resolver::new(conf.resolve_timeout());
    let mut co = Coordinator::with_resolver(handle, resolver);

    let rc = match co.reconfigure(&opts.servers) {
        Ok(x) => x,
        Err(e) => {
            eprintln!("Membership change failed: {}", e);
            return 1;
        }
    };

    let stdout = io::stdout();
    if let Err(e) = write_reconfiguration(&mut stdout.lock(), &rc) {
        eprintln!("{}", e);
        return 1;
    }

    rc.exit_code()
}

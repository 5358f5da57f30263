use crate::handle::ClusterHandle;
use crate::model::RpcOutcome;
use crate::model::RpcTimeout;
use crate::AdminError;

/// StatsSink receives stats of every server as soon as they are fetched.
pub trait StatsSink {
    /// begin is called before querying `server`.
    fn begin(&mut self, server: &str) -> Result<(), AdminError>;

    /// fetched is called with what querying `server` returned.
    fn fetched(&mut self, server: &str, outcome: &RpcOutcome<Vec<u8>>) -> Result<(), AdminError>;
}

/// StatsSummary is what a stats query did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSummary {
    pub fetched: Vec<String>,
    pub timed_out: Vec<String>,

    /// The server that returned a status this client does not handle, and its error.
    /// Servers after it are not queried.
    pub aborted: Option<(String, String)>,
}

impl StatsSummary {
    /// exit_code is 1 only if the query is aborted. Timeouts do not fail a query.
    pub fn exit_code(&self) -> i32 {
        if self.aborted.is_some() {
            1
        } else {
            0
        }
    }
}

/// StatsQuery fetches diagnostic stats from servers one by one.
///
/// A server that does not reply in time is reported and skipped. Any other failure stops the
/// query.
pub struct StatsQuery<H> {
    handle: H,
    timeout: RpcTimeout,
}

impl<H: ClusterHandle> StatsQuery<H> {
    pub fn new(handle: H, timeout: RpcTimeout) -> Self {
        StatsQuery { handle, timeout }
    }

    pub fn into_handle(self) -> H {
        self.handle
    }

    pub fn run<S: AsRef<str>>(
        &mut self,
        servers: &[S],
        sink: &mut dyn StatsSink,
    ) -> Result<StatsSummary, AdminError> {
        let mut summary = StatsSummary::default();

        for s in servers.iter() {
            let server = s.as_ref();

            sink.begin(server)?;
            let outcome = self.handle.get_server_stats(server, self.timeout);
            sink.fetched(server, &outcome)?;

            match outcome {
                RpcOutcome::Ok(byts) => {
                    debug!("stats fetched"; "server" => server, "size" => byts.len());
                    summary.fetched.push(server.into());
                }
                RpcOutcome::Timeout(e) => {
                    warn!("stats timeout"; "server" => server, "err" => %e);
                    summary.timed_out.push(server.into());
                }
                RpcOutcome::Other(e) => {
                    error!("stats failed, abort"; "server" => server, "err" => %e);
                    summary.aborted = Some((server.into(), e));
                    break;
                }
            }
        }

        Ok(summary)
    }
}

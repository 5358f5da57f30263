use std::future::Future;
use std::time::Duration;
use std::time::Instant;

use tokio::runtime::Builder;
use tokio::runtime::Runtime;
use tokio::time::delay_for;
use tonic::transport::Channel;

use protocol as pb;
use protocol::ClientServiceClient;

use super::ClusterHandle;
use crate::model::ChangeResult;
use crate::model::Configuration;
use crate::model::Epoch;
use crate::model::RpcOutcome;
use crate::model::RpcTimeout;
use crate::model::ServerDescriptor;
use crate::ClusterError;

/// How long to wait before connecting to an unresponsive server again.
const RECONNECT_INTERVAL: Duration = Duration::from_millis(100);

/// GrpcCluster is a ClusterHandle talking to a cluster through the gRPC client service.
///
/// Configuration RPCs go to the cluster address given to `connect`. They wait for the cluster
/// without a bound unless `set_cluster_timeout` gives one. Server info and stats RPCs go
/// straight to the server they are about, and keep reconnecting until it answers or the
/// timeout expires.
pub struct GrpcCluster {
    rt: Runtime,
    uri: String,
    client: ClientServiceClient<Channel>,
    cluster_timeout: RpcTimeout,
}

impl GrpcCluster {
    pub fn connect(cluster: &str) -> Result<GrpcCluster, ClusterError> {
        let mut rt = Builder::new()
            .basic_scheduler()
            .enable_all()
            .build()
            .map_err(|e| ClusterError::Connection(format!("{}", e)))?;

        let uri = endpoint_uri(cluster);
        let client = rt
            .block_on(ClientServiceClient::connect(uri.clone()))
            .map_err(|e| ClusterError::Connection(format!("{}: {}", uri, e)))?;

        info!("connected to cluster"; "uri" => %uri);

        Ok(GrpcCluster {
            rt,
            uri,
            client,
            cluster_timeout: RpcTimeout::Forever,
        })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// set_cluster_timeout bounds get_configuration and set_configuration. An elapsed
    /// timeout is a `ClusterError::Connection`.
    pub fn set_cluster_timeout(&mut self, timeout: RpcTimeout) {
        self.cluster_timeout = timeout;
    }

    pub fn cluster_timeout(&self) -> RpcTimeout {
        self.cluster_timeout
    }

    fn call_cluster<T, F>(&mut self, fut: F) -> Result<T, ClusterError>
    where
        F: Future<Output = Result<tonic::Response<T>, tonic::Status>>,
    {
        let timeout = self.cluster_timeout;
        let rst = match timeout.deadline(Instant::now()) {
            None => self.rt.block_on(fut),
            Some(deadline) => self
                .rt
                .block_on(tokio::time::timeout_at(deadline.into(), fut))
                .map_err(|_| {
                    ClusterError::Connection(format!(
                        "no reply from {} in {:?}",
                        self.uri, timeout
                    ))
                })?,
        };

        rst.map(|r| r.into_inner())
            .map_err(|s| ClusterError::Connection(format!("{}", s)))
    }
}

impl ClusterHandle for GrpcCluster {
    fn get_configuration(&mut self) -> Result<Configuration, ClusterError> {
        let req = pb::GetConfigurationRequest {};
        let mut client = self.client.clone();
        let reply = self.call_cluster(client.get_configuration(req))?;

        Ok(Configuration::new(
            reply.epoch,
            reply.members.into_iter().map(from_member).collect(),
        ))
    }

    fn get_server_info(
        &mut self,
        token: &str,
        timeout: RpcTimeout,
    ) -> RpcOutcome<ServerDescriptor> {
        let req = pb::GetServerInfoRequest {
            token: token.into(),
            timeout_nanos: timeout.as_nanos(),
        };
        let fut = fetch_server_info(endpoint_uri(token), req);
        self.rt.block_on(within(timeout, token, fut))
    }

    fn set_configuration(
        &mut self,
        old_epoch: Epoch,
        members: &[ServerDescriptor],
    ) -> Result<ChangeResult, ClusterError> {
        let req = pb::SetConfigurationRequest {
            old_epoch,
            members: members.iter().map(to_member).collect(),
        };
        let mut client = self.client.clone();
        let reply = self.call_cluster(client.set_configuration(req))?;

        decode_change_result(reply)
    }

    fn get_server_stats(&mut self, address: &str, timeout: RpcTimeout) -> RpcOutcome<Vec<u8>> {
        let req = pb::GetServerStatsRequest {
            address: address.into(),
            timeout_nanos: timeout.as_nanos(),
        };
        let fut = fetch_server_stats(endpoint_uri(address), req);
        self.rt.block_on(within(timeout, address, fut))
    }
}

/// endpoint_uri builds the uri of a cluster or server address.
/// The default port is used if `addr` does not specify one.
pub fn endpoint_uri(addr: &str) -> String {
    if addr.starts_with("http://") || addr.starts_with("https://") {
        return addr.into();
    }

    let has_port = match addr.rfind(':') {
        Some(i) => {
            let port = &addr[i + 1..];
            !port.is_empty() && port.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    };

    if has_port {
        format!("http://{}", addr)
    } else {
        format!("http://{}:{}", addr, pb::DEFAULT_PORT)
    }
}

pub fn to_member(s: &ServerDescriptor) -> pb::Member {
    pb::Member {
        server_id: s.server_id(),
        addresses: s.addresses().to_vec(),
    }
}

pub fn from_member(m: pb::Member) -> ServerDescriptor {
    ServerDescriptor::new(m.server_id, m.addresses)
}

/// encode_status fills the status fields of a server-directed reply.
pub fn encode_status<T>(outcome: &RpcOutcome<T>) -> (i32, String) {
    let status = match outcome {
        RpcOutcome::Ok(_) => pb::RpcStatus::Ok,
        RpcOutcome::Timeout(_) => pb::RpcStatus::Timeout,
        RpcOutcome::Other(_) => pb::RpcStatus::Other,
    };
    (status as i32, outcome.error().into())
}

/// decode_outcome turns the status fields of a reply into an outcome carrying `v`.
/// A status code this client does not know is an `Other`.
pub fn decode_outcome<T>(status: i32, error: String, v: T) -> RpcOutcome<T> {
    match pb::RpcStatus::from_i32(status) {
        Some(pb::RpcStatus::Ok) => RpcOutcome::Ok(v),
        Some(pb::RpcStatus::Timeout) => RpcOutcome::Timeout(error),
        Some(pb::RpcStatus::Other) => RpcOutcome::Other(error),
        None => RpcOutcome::Other(format!("unknown status {}: {}", status, error)),
    }
}

pub fn encode_change_result(r: ChangeResult) -> pb::SetConfigurationReply {
    match r {
        ChangeResult::Ok => pb::SetConfigurationReply {
            status: pb::ChangeStatus::Applied as i32,
            error: "".into(),
            bad_servers: vec![],
        },
        ChangeResult::Changed { error } => pb::SetConfigurationReply {
            status: pb::ChangeStatus::Stale as i32,
            error,
            bad_servers: vec![],
        },
        ChangeResult::Bad { error, bad_servers } => pb::SetConfigurationReply {
            status: pb::ChangeStatus::Rejected as i32,
            error,
            bad_servers: bad_servers.iter().map(to_member).collect(),
        },
    }
}

pub fn decode_change_result(
    reply: pb::SetConfigurationReply,
) -> Result<ChangeResult, ClusterError> {
    let error = reply.error;
    let r = match pb::ChangeStatus::from_i32(reply.status) {
        Some(pb::ChangeStatus::Applied) => ChangeResult::Ok,
        Some(pb::ChangeStatus::Stale) => ChangeResult::Changed { error },
        Some(pb::ChangeStatus::Rejected) => ChangeResult::Bad {
            error,
            bad_servers: reply.bad_servers.into_iter().map(from_member).collect(),
        },
        None => {
            return Err(ClusterError::Malformed(format!(
                "unknown membership change status {}: {}",
                reply.status, error
            )))
        }
    };
    Ok(r)
}

/// within runs `fut` with a timeout. `RpcTimeout::Forever`, or a timeout whose deadline is
/// beyond what an Instant holds, waits as long as it takes.
async fn within<T, F>(timeout: RpcTimeout, addr: &str, fut: F) -> RpcOutcome<T>
where
    F: Future<Output = RpcOutcome<T>>,
{
    match timeout.deadline(Instant::now()) {
        None => fut.await,
        Some(deadline) => match tokio::time::timeout_at(deadline.into(), fut).await {
            Ok(outcome) => outcome,
            Err(_) => RpcOutcome::Timeout(format!("no reply from {} in {:?}", addr, timeout)),
        },
    }
}

async fn connect_server(uri: String) -> ClientServiceClient<Channel> {
    loop {
        match ClientServiceClient::connect(uri.clone()).await {
            Ok(c) => return c,
            Err(e) => {
                debug!("server not connected, retry"; "uri" => %uri, "err" => %e);
                delay_for(RECONNECT_INTERVAL).await;
            }
        }
    }
}

async fn fetch_server_info(
    uri: String,
    req: pb::GetServerInfoRequest,
) -> RpcOutcome<ServerDescriptor> {
    let mut client = connect_server(uri).await;
    let reply = match client.get_server_info(req).await {
        Ok(r) => r.into_inner(),
        Err(s) => return RpcOutcome::Other(format!("{}", s)),
    };

    match decode_outcome(reply.status, reply.error, reply.server) {
        RpcOutcome::Ok(Some(m)) => RpcOutcome::Ok(from_member(m)),
        RpcOutcome::Ok(None) => RpcOutcome::Other("reply has no server".into()),
        RpcOutcome::Timeout(e) => RpcOutcome::Timeout(e),
        RpcOutcome::Other(e) => RpcOutcome::Other(e),
    }
}

async fn fetch_server_stats(uri: String, req: pb::GetServerStatsRequest) -> RpcOutcome<Vec<u8>> {
    let mut client = connect_server(uri).await;
    match client.get_server_stats(req).await {
        Ok(r) => {
            let reply = r.into_inner();
            decode_outcome(reply.status, reply.error, reply.stats)
        }
        Err(s) => RpcOutcome::Other(format!("{}", s)),
    }
}

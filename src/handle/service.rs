use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use tonic::transport::Server;
use tonic::{Request, Response, Status};

use protocol as pb;
use protocol::ClientService;
use protocol::ClientServiceServer;

use super::encode_change_result;
use super::encode_status;
use super::from_member;
use super::to_member;
use super::ClusterState;
use super::MemCluster;
use crate::model::RpcOutcome;

/// ClientServiceImpl serves the client service of an in-memory cluster over gRPC.
///
/// Every server of a local test cluster runs one, all sharing the same ClusterState.
#[derive(Clone)]
pub struct ClientServiceImpl {
    state: Arc<Mutex<ClusterState>>,
}

impl ClientServiceImpl {
    pub fn new(state: Arc<Mutex<ClusterState>>) -> Self {
        ClientServiceImpl { state }
    }

    /// of_cluster serves the same cluster a MemCluster handle operates on.
    pub fn of_cluster(cluster: &MemCluster) -> Self {
        Self::new(cluster.shared_state())
    }

    /// serve_with_shutdown serves on `addr` until `signal` resolves.
    pub async fn serve_with_shutdown<F>(
        self,
        addr: SocketAddr,
        signal: F,
    ) -> Result<(), tonic::transport::Error>
    where
        F: Future<Output = ()>,
    {
        info!("client service listening"; "addr" => %addr);

        let rst = Server::builder()
            .add_service(ClientServiceServer::new(self))
            .serve_with_shutdown(addr, signal)
            .await;

        info!("client service stopped"; "addr" => %addr, "rst" => ?rst);
        rst
    }

    fn state(&self) -> MutexGuard<'_, ClusterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[tonic::async_trait]
impl ClientService for ClientServiceImpl {
    async fn get_configuration(
        &self,
        _request: Request<pb::GetConfigurationRequest>,
    ) -> Result<Response<pb::GetConfigurationReply>, Status> {
        let c = self.state().configuration();

        Ok(Response::new(pb::GetConfigurationReply {
            epoch: c.epoch,
            members: c.members.iter().map(to_member).collect(),
        }))
    }

    async fn get_server_info(
        &self,
        request: Request<pb::GetServerInfoRequest>,
    ) -> Result<Response<pb::GetServerInfoReply>, Status> {
        let req = request.into_inner();
        let outcome = self.state().server_info(&req.token);
        let (status, error) = encode_status(&outcome);

        let server = match outcome {
            RpcOutcome::Ok(s) => Some(to_member(&s)),
            _ => None,
        };

        debug!("get_server_info"; "token" => %req.token, "status" => status);

        Ok(Response::new(pb::GetServerInfoReply {
            status,
            error,
            server,
        }))
    }

    async fn set_configuration(
        &self,
        request: Request<pb::SetConfigurationRequest>,
    ) -> Result<Response<pb::SetConfigurationReply>, Status> {
        let req = request.into_inner();
        let members: Vec<_> = req.members.into_iter().map(from_member).collect();

        let rst = self.state().set_configuration(req.old_epoch, &members);

        info!("set_configuration"; "old_epoch" => req.old_epoch, "rst" => %rst);

        Ok(Response::new(encode_change_result(rst)))
    }

    async fn get_server_stats(
        &self,
        request: Request<pb::GetServerStatsRequest>,
    ) -> Result<Response<pb::GetServerStatsReply>, Status> {
        let req = request.into_inner();
        let outcome = self.state().server_stats(&req.address);
        let (status, error) = encode_status(&outcome);

        let stats = match outcome {
            RpcOutcome::Ok(b) => b,
            _ => vec![],
        };

        Ok(Response::new(pb::GetServerStatsReply {
            status,
            error,
            stats,
        }))
    }
}

//! Handles to a cluster: the RPCs an admin workflow issues.

use crate::model::Configuration;
use crate::model::Epoch;
use crate::model::RpcOutcome;
use crate::model::RpcTimeout;
use crate::model::ServerDescriptor;
use crate::ChangeResult;
use crate::ClusterError;

mod state;
pub use state::*;

mod mem;
pub use mem::*;

mod grpc;
pub use grpc::*;

mod service;
pub use service::*;



/// ClusterHandle is a connection to a cluster.
///
/// Every call blocks until the reply arrives or its timeout expires.
/// A handle can be reused for any number of sequential calls; it is not meant to be shared
/// between threads.
pub trait ClusterHandle {
    /// get_configuration returns the committed configuration along with its epoch.
    fn get_configuration(&mut self) -> Result<Configuration, ClusterError>;

    /// get_server_info asks the server known as `token`, an address or a name, for its identity.
    fn get_server_info(&mut self, token: &str, timeout: RpcTimeout)
        -> RpcOutcome<ServerDescriptor>;

    /// set_configuration proposes `members` as the new membership. It is applied only if
    /// `old_epoch` is still the current epoch.
    fn set_configuration(
        &mut self,
        old_epoch: Epoch,
        members: &[ServerDescriptor],
    ) -> Result<ChangeResult, ClusterError>;

    /// get_server_stats fetches the encoded `ServerStats` of the server at `address`.
    fn get_server_stats(&mut self, address: &str, timeout: RpcTimeout) -> RpcOutcome<Vec<u8>>;
}

impl<H: ClusterHandle + ?Sized> ClusterHandle for &mut H {
    fn get_configuration(&mut self) -> Result<Configuration, ClusterError> {
        (**self).get_configuration()
    }

    fn get_server_info(
        &mut self,
        token: &str,
        timeout: RpcTimeout,
    ) -> RpcOutcome<ServerDescriptor> {
        (**self).get_server_info(token, timeout)
    }

    fn set_configuration(
        &mut self,
        old_epoch: Epoch,
        members: &[ServerDescriptor],
    ) -> Result<ChangeResult, ClusterError> {
        (**self).set_configuration(old_epoch, members)
    }

    fn get_server_stats(&mut self, address: &str, timeout: RpcTimeout) -> RpcOutcome<Vec<u8>> {
        (**self).get_server_stats(address, timeout)
    }
}

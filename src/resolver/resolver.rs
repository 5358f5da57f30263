use crate::handle::ClusterHandle;
use crate::model::RpcOutcome;
use crate::model::RpcTimeout;
use crate::model::ServerDescriptor;
use crate::model::RESOLVE_TIMEOUT;
use crate::ResolveError;

/// Resolver turns what an operator types, an address or a server name, into the identity the
/// cluster knows the server by.
///
/// Every resolve is exactly one RPC. Nothing is retried: a timeout fails the resolve.
#[derive(Debug, Clone, Copy)]
pub struct Resolver {
    timeout: RpcTimeout,
}

impl Default for Resolver {
    fn default() -> Self {
        Resolver::new(RESOLVE_TIMEOUT)
    }
}

impl Resolver {
    pub fn new(timeout: RpcTimeout) -> Self {
        Resolver { timeout }
    }

    pub fn timeout(&self) -> RpcTimeout {
        self.timeout
    }

    pub fn resolve<H>(&self, handle: &mut H, token: &str) -> Result<ServerDescriptor, ResolveError>
    where
        H: ClusterHandle + ?Sized,
    {
        let outcome = handle.get_server_info(token, self.timeout);

        match outcome {
            RpcOutcome::Ok(server) => {
                debug!("resolved"; "token" => token, "server" => %server);
                Ok(server)
            }
            RpcOutcome::Timeout(e) => {
                warn!("resolve timeout"; "token" => token, "err" => %e);
                Err(ResolveError::Timeout(token.into(), e))
            }
            RpcOutcome::Other(e) => {
                warn!("resolve failed"; "token" => token, "err" => %e);
                Err(ResolveError::Unknown(token.into(), e))
            }
        }
    }
}

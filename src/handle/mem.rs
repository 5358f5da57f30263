use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use super::ClusterHandle;
use super::ClusterState;
use crate::model::ChangeResult;
use crate::model::Configuration;
use crate::model::Epoch;
use crate::model::RpcOutcome;
use crate::model::RpcTimeout;
use crate::model::ServerDescriptor;
use crate::ClusterError;

/// Call is one RPC a MemCluster has received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetConfiguration,
    GetServerInfo(String, RpcTimeout),
    SetConfiguration(Epoch, Vec<ServerDescriptor>),
    GetServerStats(String, RpcTimeout),
}

/// Release lets a held server answer again.
pub struct Release {
    tx: mpsc::Sender<()>,
}

impl Release {
    /// release lets the pending or the next RPC to the held server proceed. Later RPCs are not
    /// held.
    pub fn release(self) {
        let _ = self.tx.send(());
    }
}

/// MemCluster is a ClusterHandle to an in-memory cluster.
///
/// Clones share the same cluster, which is how two operators are simulated. Every RPC issued
/// through any clone is recorded in `calls()`.
#[derive(Clone)]
pub struct MemCluster {
    state: Arc<Mutex<ClusterState>>,
    calls: Arc<Mutex<Vec<Call>>>,
    held: Arc<Mutex<HashMap<String, mpsc::Receiver<()>>>>,
    connected: Arc<Mutex<bool>>,
}

impl MemCluster {
    pub fn new(state: ClusterState) -> Self {
        MemCluster {
            state: Arc::new(Mutex::new(state)),
            calls: Arc::new(Mutex::new(Vec::new())),
            held: Arc::new(Mutex::new(HashMap::new())),
            connected: Arc::new(Mutex::new(true)),
        }
    }

    /// with_members creates a cluster at `epoch` with `members`.
    pub fn with_members(epoch: Epoch, members: Vec<ServerDescriptor>) -> Self {
        Self::new(ClusterState::new(Configuration::new(epoch, members)))
    }

    /// state gives access to the cluster state of record, bypassing the RPC layer.
    pub fn state(&self) -> MutexGuard<'_, ClusterState> {
        lock(&self.state)
    }

    /// shared_state returns the cluster state shared by all clones of this handle.
    pub fn shared_state(&self) -> Arc<Mutex<ClusterState>> {
        self.state.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear()
    }

    /// set_connected controls whether configuration RPCs reach the cluster.
    pub fn set_connected(&self, connected: bool) {
        *lock(&self.connected) = connected;
    }

    /// hold makes the server at `token` stop answering server-directed RPCs.
    ///
    /// An RPC to a held server waits for the returned Release or for its timeout, whichever
    /// comes first. An RPC with `RpcTimeout::Forever` waits for the Release only.
    /// Dropping the Release without releasing turns the server dead: RPCs to it time out at
    /// once.
    pub fn hold(&self, token: &str) -> Release {
        let (tx, rx) = mpsc::channel();
        lock(&self.held).insert(token.into(), rx);
        Release { tx }
    }

    fn record(&self, call: Call) {
        lock(&self.calls).push(call);
    }

    fn check_connected(&self) -> Result<(), ClusterError> {
        if *lock(&self.connected) {
            Ok(())
        } else {
            Err(ClusterError::Connection("cluster is disconnected".into()))
        }
    }

    /// wait_held blocks while the server at `token` is held.
    /// It returns false if `timeout` expires first.
    fn wait_held(&self, token: &str, timeout: RpcTimeout) -> bool {
        // Take the receiver out so that the lock is not held while waiting.
        let rx = match lock(&self.held).remove(token) {
            Some(rx) => rx,
            None => return true,
        };

        let released = match timeout {
            RpcTimeout::Forever => rx.recv().is_ok(),
            RpcTimeout::After(d) => match rx.recv_timeout(d) {
                Ok(()) => true,
                Err(RecvTimeoutError::Timeout) => false,
                Err(RecvTimeoutError::Disconnected) => false,
            },
        };

        if !released {
            lock(&self.held).insert(token.into(), rx);
        }
        released
    }
}

impl ClusterHandle for MemCluster {
    fn get_configuration(&mut self) -> Result<Configuration, ClusterError> {
        self.record(Call::GetConfiguration);
        self.check_connected()?;
        Ok(self.state().configuration())
    }

    fn get_server_info(
        &mut self,
        token: &str,
        timeout: RpcTimeout,
    ) -> RpcOutcome<ServerDescriptor> {
        self.record(Call::GetServerInfo(token.into(), timeout));
        if !self.wait_held(token, timeout) {
            return RpcOutcome::Timeout(format!("no reply from {} in {:?}", token, timeout));
        }
        self.state().server_info(token)
    }

    fn set_configuration(
        &mut self,
        old_epoch: Epoch,
        members: &[ServerDescriptor],
    ) -> Result<ChangeResult, ClusterError> {
        self.record(Call::SetConfiguration(old_epoch, members.to_vec()));
        self.check_connected()?;
        Ok(self.state().set_configuration(old_epoch, members))
    }

    fn get_server_stats(&mut self, address: &str, timeout: RpcTimeout) -> RpcOutcome<Vec<u8>> {
        self.record(Call::GetServerStats(address.into(), timeout));
        if !self.wait_held(address, timeout) {
            return RpcOutcome::Timeout(format!("no reply from {} in {:?}", address, timeout));
        }
        self.state().server_stats(address)
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

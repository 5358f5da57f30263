use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::collections::HashSet;

use prost::Message;

use protocol::ServerStats;

use crate::model::ChangeResult;
use crate::model::Configuration;
use crate::model::Epoch;
use crate::model::RpcOutcome;
use crate::model::ServerDescriptor;
use crate::model::ServerId;

pub const COUNTER_APPLIED: &str = "membership.applied";
pub const COUNTER_STALE: &str = "membership.stale";
pub const COUNTER_REJECTED: &str = "membership.rejected";

/// ClusterState is the state of record of an in-memory cluster: its committed configuration
/// and the servers it knows about.
///
/// It applies membership changes the way a real cluster does: all or nothing, and only when
/// the proposal carries the current epoch.
#[derive(Debug, Clone)]
pub struct ClusterState {
    config: Configuration,

    /// Servers by every token they can be reached with: addresses and names.
    servers: BTreeMap<String, ServerDescriptor>,

    /// Servers the cluster itself can not reach, though a client might.
    unreachable: BTreeSet<ServerId>,

    counters: HashMap<String, u64>,
    started_at_ms: i64,
}

impl ClusterState {
    /// new creates a cluster with a committed configuration. Every member is a known server.
    pub fn new(config: Configuration) -> Self {
        let mut st = ClusterState {
            config: Configuration::default(),
            servers: BTreeMap::new(),
            unreachable: BTreeSet::new(),
            counters: HashMap::new(),
            started_at_ms: chrono::Utc::now().timestamp_millis(),
        };

        for m in config.members.iter() {
            st.add_server(m.clone());
        }
        st.config = config;
        st
    }

    /// add_server makes a server known by all of its addresses.
    pub fn add_server(&mut self, server: ServerDescriptor) {
        for a in server.addresses().iter() {
            self.servers.insert(a.clone(), server.clone());
        }
    }

    /// add_alias makes a known server also known by `name`.
    /// It returns false if there is no such server.
    pub fn add_alias(&mut self, name: &str, server_id: ServerId) -> bool {
        let found = self
            .servers
            .values()
            .find(|s| s.server_id() == server_id)
            .cloned();

        match found {
            Some(s) => {
                self.servers.insert(name.into(), s);
                true
            }
            None => false,
        }
    }

    /// set_reachable marks whether the cluster itself can reach a server.
    pub fn set_reachable(&mut self, server_id: ServerId, reachable: bool) {
        if reachable {
            self.unreachable.remove(&server_id);
        } else {
            self.unreachable.insert(server_id);
        }
    }

    pub fn configuration(&self) -> Configuration {
        self.config.clone()
    }

    pub fn epoch(&self) -> Epoch {
        self.config.epoch
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn server_info(&self, token: &str) -> RpcOutcome<ServerDescriptor> {
        match self.servers.get(token) {
            Some(s) => RpcOutcome::Ok(s.clone()),
            None => RpcOutcome::Other(format!("no server is known as {}", token)),
        }
    }

    /// set_configuration replaces the members if `old_epoch` is current and every proposed
    /// member is reachable from the cluster. Otherwise nothing changes.
    pub fn set_configuration(
        &mut self,
        old_epoch: Epoch,
        members: &[ServerDescriptor],
    ) -> ChangeResult {
        if old_epoch != self.config.epoch {
            self.incr(COUNTER_STALE);
            return ChangeResult::Changed {
                error: format!(
                    "configuration epoch is {}, not {}",
                    self.config.epoch, old_epoch
                ),
            };
        }

        let mut seen = HashSet::new();
        let dups: Vec<ServerDescriptor> = members
            .iter()
            .filter(|m| !seen.insert(m.server_id()))
            .cloned()
            .collect();
        if !dups.is_empty() {
            self.incr(COUNTER_REJECTED);
            return ChangeResult::Bad {
                error: "duplicate server id in configuration".into(),
                bad_servers: dups,
            };
        }

        let bad: Vec<ServerDescriptor> = members
            .iter()
            .filter(|m| self.unreachable.contains(&m.server_id()))
            .cloned()
            .collect();
        if !bad.is_empty() {
            self.incr(COUNTER_REJECTED);
            return ChangeResult::Bad {
                error: "servers are unreachable from the cluster".into(),
                bad_servers: bad,
            };
        }

        let epoch = match self.config.epoch.checked_add(1) {
            Some(e) => e,
            None => {
                self.incr(COUNTER_REJECTED);
                return ChangeResult::Bad {
                    error: format!("epoch {} can not be bumped", self.config.epoch),
                    bad_servers: vec![],
                };
            }
        };

        self.config = Configuration::new(epoch, members.to_vec());
        self.incr(COUNTER_APPLIED);
        ChangeResult::Ok
    }

    /// server_stats returns the encoded `ServerStats` of the server at `address`.
    pub fn server_stats(&self, address: &str) -> RpcOutcome<Vec<u8>> {
        let server = match self.servers.get(address) {
            Some(s) => s,
            None => return RpcOutcome::Other(format!("no server is known as {}", address)),
        };

        let stats = ServerStats {
            server_id: server.server_id(),
            address: address.into(),
            epoch: self.config.epoch,
            member_count: self.config.members.len() as u64,
            start_at_ms: self.started_at_ms,
            counters: self.counters.clone(),
        };

        let mut buf = Vec::with_capacity(stats.encoded_len());
        match stats.encode(&mut buf) {
            Ok(()) => RpcOutcome::Ok(buf),
            Err(e) => RpcOutcome::Other(format!("{:?}", e)),
        }
    }

    fn incr(&mut self, name: &str) {
        *self.counters.entry(name.into()).or_insert(0) += 1;
    }
}

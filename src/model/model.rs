use std::time::Duration;
use std::time::Instant;

/// ServerId is the cluster-unique identity of a server. It is assigned by the cluster.
pub type ServerId = u64;

/// Epoch tags a committed configuration. It is the compare-and-swap token of a membership
/// change and is bumped by one on every applied change.
pub type Epoch = u64;

/// ServerDescriptor is a server identity along with the addresses it listens on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerDescriptor {
    server_id: ServerId,
    addresses: Vec<String>,
}

impl ServerDescriptor {
    pub fn new<S: Into<String>>(server_id: ServerId, addresses: Vec<S>) -> Self {
        ServerDescriptor {
            server_id,
            addresses: addresses.into_iter().map(|x| x.into()).collect(),
        }
    }

    pub fn server_id(&self) -> ServerId {
        self.server_id
    }

    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }
}

impl<S: Into<String>> From<(ServerId, S)> for ServerDescriptor {
    fn from(t: (ServerId, S)) -> ServerDescriptor {
        ServerDescriptor::new(t.0, vec![t.1])
    }
}

/// Configuration is the membership of a cluster at `epoch`.
/// Members are kept in the order they were proposed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    pub epoch: Epoch,
    pub members: Vec<ServerDescriptor>,
}

impl Configuration {
    pub fn new(epoch: Epoch, members: Vec<ServerDescriptor>) -> Self {
        Configuration { epoch, members }
    }

    pub fn get(&self, server_id: ServerId) -> Option<&ServerDescriptor> {
        self.members.iter().find(|m| m.server_id == server_id)
    }

    pub fn contains(&self, server_id: ServerId) -> bool {
        self.get(server_id).is_some()
    }
}

/// Status is the projection of a single RPC outcome, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Timeout,
    Other,
}

/// RpcOutcome is the result of a single server-directed RPC.
///
/// A failed RPC carries a diagnostic message instead of a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcOutcome<T> {
    Ok(T),
    Timeout(String),
    Other(String),
}

impl<T> RpcOutcome<T> {
    pub fn status(&self) -> Status {
        match self {
            Self::Ok(_) => Status::Ok,
            Self::Timeout(_) => Status::Timeout,
            Self::Other(_) => Status::Other,
        }
    }

    /// error returns the diagnostic message, or an empty str for an `Ok`.
    pub fn error(&self) -> &str {
        match self {
            Self::Ok(_) => "",
            Self::Timeout(e) => e,
            Self::Other(e) => e,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> RpcOutcome<U> {
        match self {
            Self::Ok(v) => RpcOutcome::Ok(f(v)),
            Self::Timeout(e) => RpcOutcome::Timeout(e),
            Self::Other(e) => RpcOutcome::Other(e),
        }
    }
}

/// ChangeResult is how the cluster answered a membership change proposal.
/// Nothing is changed unless it is `Ok`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeResult {
    /// The proposal is applied and the epoch is bumped.
    Ok,

    /// The epoch in the proposal is not the current one: someone else changed the membership
    /// first.
    Changed { error: String },

    /// The cluster could not reach or validate some of the proposed members.
    Bad {
        error: String,
        bad_servers: Vec<ServerDescriptor>,
    },
}

impl ChangeResult {
    pub fn is_ok(&self) -> bool {
        *self == ChangeResult::Ok
    }
}

/// RpcTimeout bounds how long a single RPC waits for its reply.
///
/// On the wire and on the command line a timeout of 0 means to wait forever. It is never a
/// zero-length wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcTimeout {
    Forever,
    After(Duration),
}

impl RpcTimeout {
    pub fn from_nanos(nanos: u64) -> Self {
        match nanos {
            0 => RpcTimeout::Forever,
            n => RpcTimeout::After(Duration::from_nanos(n)),
        }
    }

    pub fn from_secs(secs: u64) -> Self {
        match secs {
            0 => RpcTimeout::Forever,
            s => RpcTimeout::After(Duration::from_secs(s)),
        }
    }

    pub fn from_millis(millis: u64) -> Self {
        match millis {
            0 => RpcTimeout::Forever,
            m => RpcTimeout::After(Duration::from_millis(m)),
        }
    }

    /// as_nanos is the wire form of a timeout: 0 for `Forever`.
    /// A finite timeout is at least 1ns so that it never turns into `Forever`.
    pub fn as_nanos(&self) -> u64 {
        match self {
            Self::Forever => 0,
            Self::After(d) => {
                let n = d.as_nanos();
                if n == 0 {
                    1
                } else if n > u64::MAX as u128 {
                    u64::MAX
                } else {
                    n as u64
                }
            }
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        match self {
            Self::Forever => None,
            Self::After(d) => Some(*d),
        }
    }

    /// deadline is when a wait started at `now` gives up.
    /// It is None for `Forever`, and for a timeout so long its deadline can not be represented:
    /// such a wait never expires either.
    pub fn deadline(&self, now: Instant) -> Option<Instant> {
        match self {
            Self::Forever => None,
            Self::After(d) => now.checked_add(*d),
        }
    }
}

/// The timeout for resolving a server token during a membership change.
pub const RESOLVE_TIMEOUT: RpcTimeout = RpcTimeout::After(Duration::from_secs(2));

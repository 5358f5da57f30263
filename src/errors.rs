use crate::model::ServerId;

quick_error! {
    /// ClusterError is a failure to talk to the cluster at all.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ClusterError {
        Connection(msg: String) {
            display("can not connect to cluster: {}", msg)
        }

        /// The cluster replied with something this client can not decode.
        Malformed(msg: String) {
            display("malformed reply: {}", msg)
        }
    }
}

quick_error! {
    /// ResolveError is why a server token could not be turned into a server identity.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ResolveError {
        Timeout(token: String, msg: String) {
            display("timed out resolving {}: {}", token, msg)
        }

        Unknown(token: String, msg: String) {
            display("unknown error resolving {}: {}", token, msg)
        }

        /// Two tokens resolved to the same server.
        Duplicate(server_id: ServerId, first: String, second: String) {
            display("server {} given as both {} and {}", server_id, first, second)
        }
    }
}

impl ResolveError {
    /// token returns the operator supplied token that failed to resolve.
    pub fn token(&self) -> &str {
        match self {
            Self::Timeout(t, _) => t,
            Self::Unknown(t, _) => t,
            Self::Duplicate(_, _, second) => second,
        }
    }
}

quick_error! {
    /// AdminError aborts an admin operation.
    #[derive(Debug)]
    pub enum AdminError {
        Cluster(e: ClusterError) {
            from(e: ClusterError) -> (e)
            display("{}", e)
        }

        Output(e: std::io::Error) {
            from(e: std::io::Error) -> (e)
            display("output error: {}", e)
        }
    }
}

impl PartialEq<AdminError> for AdminError {
    fn eq(&self, other: &AdminError) -> bool {
        match (self, other) {
            (Self::Cluster(a), Self::Cluster(b)) => a == b,
            (Self::Output(a), Self::Output(b)) => a.kind() == b.kind(),
            _ => false,
        }
    }
}

use crate::handle::ClusterHandle;
use crate::model::ChangeResult;
use crate::model::Configuration;
use crate::model::ServerDescriptor;
use crate::resolver::Resolver;
use crate::AdminError;
use crate::ResolveError;

/// Phase is where a reconfiguration is. Within one reconfiguration phases only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    FetchingCurrent,
    ResolvingServers,
    ProposingChange,
    Done,
}

/// Resolved is a server token along with the server it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub token: String,
    pub server: ServerDescriptor,
}

/// Outcome is how a reconfiguration ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A target could not be resolved. Nothing was proposed.
    ResolutionFailed(ResolveError),

    /// The proposal was sent and the cluster answered.
    Proposed(ChangeResult),
}

/// Reconfiguration is the record of one membership change attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconfiguration {
    /// The configuration the proposal was based on.
    pub before: Configuration,

    /// Targets resolved, in input order. On a resolution failure these are the ones resolved
    /// before it.
    pub resolved: Vec<Resolved>,

    pub outcome: Outcome,

    /// The configuration read after the attempt, whatever the outcome is.
    pub after: Configuration,
}

impl Reconfiguration {
    pub fn is_applied(&self) -> bool {
        match &self.outcome {
            Outcome::Proposed(r) => r.is_ok(),
            Outcome::ResolutionFailed(_) => false,
        }
    }

    /// exit_code is 0 only if the change is applied.
    pub fn exit_code(&self) -> i32 {
        if self.is_applied() {
            0
        } else {
            1
        }
    }
}

/// Coordinator changes the membership of a cluster.
///
/// A reconfiguration reads the current epoch, resolves every target, proposes the resolved
/// servers as the new membership under that epoch and reads the configuration again.
/// A failed resolution aborts it before anything is proposed. A stale epoch is reported, not
/// retried: the operator decides whether to run it again.
pub struct Coordinator<H> {
    handle: H,
    resolver: Resolver,
    phase: Phase,
}

impl<H: ClusterHandle> Coordinator<H> {
    pub fn new(handle: H) -> Self {
        Self::with_resolver(handle, Resolver::default())
    }

    pub fn with_resolver(handle: H, resolver: Resolver) -> Self {
        Coordinator {
            handle,
            resolver,
            phase: Phase::FetchingCurrent,
        }
    }

    pub fn handle(&mut self) -> &mut H {
        &mut self.handle
    }

    pub fn into_handle(self) -> H {
        self.handle
    }

    /// phase is where the last reconfiguration got to.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// reconfigure tries to make `targets` the members of the cluster.
    ///
    /// It fails only if the cluster can not be talked to. Every other way it can end is an
    /// `Outcome`.
    pub fn reconfigure<S: AsRef<str>>(
        &mut self,
        targets: &[S],
    ) -> Result<Reconfiguration, AdminError> {
        self.enter(Phase::FetchingCurrent);
        let before = self.handle.get_configuration()?;
        info!("current configuration";
              "epoch" => before.epoch,
              "members" => before.members.len());

        self.enter(Phase::ResolvingServers);
        let (resolved, failure) = self.resolve_all(targets);

        let outcome = match failure {
            Some(e) => {
                warn!("abort reconfiguration"; "err" => %e);
                Outcome::ResolutionFailed(e)
            }
            None => {
                self.enter(Phase::ProposingChange);
                let members: Vec<ServerDescriptor> =
                    resolved.iter().map(|r| r.server.clone()).collect();

                let rst = self.handle.set_configuration(before.epoch, &members)?;
                info!("membership change"; "epoch" => before.epoch, "rst" => %rst);
                Outcome::Proposed(rst)
            }
        };

        self.enter(Phase::Done);
        let after = self.handle.get_configuration()?;
        info!("configuration after change";
              "epoch" => after.epoch,
              "members" => after.members.len());

        Ok(Reconfiguration {
            before,
            resolved,
            outcome,
            after,
        })
    }

    /// resolve_all resolves targets in order and stops at the first failure.
    /// A target resolving to a server resolved earlier is a failure too.
    fn resolve_all<S: AsRef<str>>(
        &mut self,
        targets: &[S],
    ) -> (Vec<Resolved>, Option<ResolveError>) {
        let mut resolved: Vec<Resolved> = Vec::with_capacity(targets.len());

        for t in targets.iter() {
            let token = t.as_ref();

            let server = match self.resolver.resolve(&mut self.handle, token) {
                Ok(s) => s,
                Err(e) => return (resolved, Some(e)),
            };

            let dup = resolved
                .iter()
                .find(|r| r.server.server_id() == server.server_id());

            if let Some(first) = dup {
                let e = ResolveError::Duplicate(
                    server.server_id(),
                    first.token.clone(),
                    token.into(),
                );
                return (resolved, Some(e));
            }

            resolved.push(Resolved {
                token: token.into(),
                server,
            });
        }

        (resolved, None)
    }

    fn enter(&mut self, phase: Phase) {
        debug!("reconfiguration phase"; "from" => ?self.phase, "to" => ?phase);
        self.phase = phase;
    }
}

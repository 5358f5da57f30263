//! Rendering of workflow results for operators. Nothing here decides anything.

use std::io;
use std::io::Write;

use chrono::DateTime;
use chrono::NaiveDateTime;
use chrono::Utc;
use prost::Message;

use protocol::ServerStats;

use crate::model::Configuration;
use crate::model::RpcOutcome;
use crate::reconfigure::Outcome;
use crate::reconfigure::Reconfiguration;
use crate::setup::TIMESTAMP_FORMAT;
use crate::stats::StatsSink;
use crate::AdminError;
use crate::ResolveError;

/// write_configuration writes a configuration followed by a blank line.
pub fn write_configuration<W: Write>(w: &mut W, c: &Configuration) -> io::Result<()> {
    write!(w, "{}", c)?;
    writeln!(w)
}

/// write_reconfiguration writes everything an operator needs to know about a membership
/// change attempt: the configuration before, the resolved servers, the outcome and the
/// configuration after.
pub fn write_reconfiguration<W: Write>(w: &mut W, rc: &Reconfiguration) -> io::Result<()> {
    writeln!(w, "Current configuration:")?;
    write_configuration(w, &rc.before)?;

    writeln!(
        w,
        "Attempting to change cluster membership to the following:"
    )?;
    for r in rc.resolved.iter() {
        writeln!(w, "{} (given as {})", r.server, r.token)?;
    }

    match &rc.outcome {
        Outcome::ResolutionFailed(e) => {
            writeln!(w, "{}", resolve_failure(e))?;
        }
        Outcome::Proposed(rst) => {
            writeln!(w)?;
            writeln!(w, "Membership change result: {}", rst)?;
        }
    }
    writeln!(w)?;

    writeln!(w, "Current configuration:")?;
    write_configuration(w, &rc.after)
}

fn resolve_failure(e: &ResolveError) -> String {
    match e {
        ResolveError::Timeout(token, msg) => format!(
            "Could not fetch server info from {} ({}). Aborting.",
            token, msg
        ),
        ResolveError::Unknown(token, msg) => {
            format!("Unknown error from {} ({}). Aborting.", token, msg)
        }
        ResolveError::Duplicate(server_id, first, second) => format!(
            "Duplicate server {} given as {} and {}. Aborting.",
            server_id, first, second
        ),
    }
}

/// dump_stats renders an encoded ServerStats for humans.
pub fn dump_stats(byts: &[u8]) -> String {
    let stats = match ServerStats::decode(byts) {
        Ok(x) => x,
        Err(e) => return format!("<{} bytes of undecodable stats: {}>\n", byts.len(), e),
    };

    let mut counters: Vec<_> = stats.counters.iter().collect();
    counters.sort();

    let mut rst = String::new();
    rst.push_str(&format!("server_id: {}\n", stats.server_id));
    rst.push_str(&format!("address: {:?}\n", stats.address));
    rst.push_str(&format!("epoch: {}\n", stats.epoch));
    rst.push_str(&format!("member_count: {}\n", stats.member_count));
    rst.push_str(&format!("start_at: {}\n", format_millis(stats.start_at_ms)));
    rst.push_str("counters {\n");
    for (k, v) in counters.iter() {
        rst.push_str(&format!("  {}: {}\n", k, v));
    }
    rst.push_str("}\n");
    rst
}

fn format_millis(ms: i64) -> String {
    let secs = ms.div_euclid(1000);
    let nanos = (ms.rem_euclid(1000) * 1_000_000) as u32;

    match NaiveDateTime::from_timestamp_opt(secs, nanos) {
        Some(t) => DateTime::<Utc>::from_utc(t, Utc)
            .format(TIMESTAMP_FORMAT)
            .to_string(),
        None => format!("{}ms", ms),
    }
}

/// StatsPrinter writes stats as they are fetched.
///
/// In binary mode only the encoded stats are written to `out`, back to back, so that the
/// output can be piped to a decoder. Failures always go to `err`.
pub struct StatsPrinter<O: Write, E: Write> {
    out: O,
    err: E,
    binary: bool,
}

impl<O: Write, E: Write> StatsPrinter<O, E> {
    pub fn new(out: O, err: E, binary: bool) -> Self {
        StatsPrinter { out, err, binary }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> StatsSink for StatsPrinter<O, E> {
    fn begin(&mut self, server: &str) -> Result<(), AdminError> {
        if !self.binary {
            writeln!(self.out, "Retrieving server stats from {}:", server)?;
            self.out.flush()?;
        }
        Ok(())
    }

    fn fetched(&mut self, _server: &str, outcome: &RpcOutcome<Vec<u8>>) -> Result<(), AdminError> {
        match outcome {
            RpcOutcome::Ok(byts) => {
                if self.binary {
                    self.out.write_all(byts)?;
                } else {
                    write!(self.out, "{}", dump_stats(byts))?;
                }
            }
            RpcOutcome::Timeout(_) => {
                writeln!(self.err, "timed out")?;
            }
            RpcOutcome::Other(e) => {
                writeln!(self.err, "Unknown status: {}", e)?;
                self.out.flush()?;
                return Ok(());
            }
        }

        if !self.binary {
            writeln!(self.out)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use super::ChangeResult;
use super::Configuration;
use super::ServerDescriptor;
use super::Status;

/// Separates addresses of a server in the text form.
pub const ADDRESS_SEP: &str = ",";

quick_error! {
    /// ParseError is returned when loading a Configuration from its text form.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ParseError {
        BadHeader(line: String) {
            display("expect 'Configuration <epoch>:' but: '{}'", line)
        }

        BadMember(line: String) {
            display("expect '- <server_id>: <addresses>' but: '{}'", line)
        }

        BadNumber(line: String, e: ParseIntError) {
            display("bad number in '{}': {}", line, e)
        }

        BadQuote(line: String) {
            display("unterminated quoted address in '{}'", line)
        }
    }
}

/// An address is written as it is unless that would not parse back: an empty address, or one
/// with a separator, a quote or surrounding spaces, is quoted with `"` and `\` escapes.
fn write_address(f: &mut fmt::Formatter<'_>, addr: &str) -> fmt::Result {
    let plain = !addr.is_empty()
        && addr.trim() == addr
        && !addr.contains(ADDRESS_SEP)
        && !addr.contains('"');

    if plain {
        return write!(f, "{}", addr);
    }

    write!(f, "\"")?;
    for c in addr.chars() {
        if c == '"' || c == '\\' {
            write!(f, "\\")?;
        }
        write!(f, "{}", c)?;
    }
    write!(f, "\"")
}

/// parse_addresses splits what `write_address` wrote for each address of a server.
fn parse_addresses(line: &str, s: &str) -> Result<Vec<String>, ParseError> {
    let mut addrs = vec![];
    let mut chars = s.trim().chars().peekable();

    if chars.peek().is_none() {
        return Ok(addrs);
    }

    loop {
        while chars.peek().map_or(false, |c| c.is_whitespace()) {
            chars.next();
        }

        let mut addr = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        Some(c) => addr.push(c),
                        None => return Err(ParseError::BadQuote(line.into())),
                    },
                    Some(c) => addr.push(c),
                    None => return Err(ParseError::BadQuote(line.into())),
                }
            }
            while chars.peek().map_or(false, |c| c.is_whitespace()) {
                chars.next();
            }
            match chars.peek() {
                None | Some(',') => {}
                Some(_) => return Err(ParseError::BadMember(line.into())),
            }
        } else {
            while let Some(c) = chars.peek() {
                if *c == ',' {
                    break;
                }
                addr.push(*c);
                chars.next();
            }
            addr = addr.trim().to_string();
        }
        addrs.push(addr);

        match chars.next() {
            Some(_) => continue,
            None => return Ok(addrs),
        }
    }
}

impl fmt::Display for ServerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.server_id())?;
        for (i, a) in self.addresses().iter().enumerate() {
            if i > 0 {
                write!(f, "{}", ADDRESS_SEP)?;
            }
            write_address(f, a)?;
        }
        Ok(())
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration {}:", self.epoch)?;
        for m in self.members.iter() {
            writeln!(f, "- {}", m)?;
        }
        Ok(())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Ok => "OK",
            Status::Timeout => "TIMEOUT",
            Status::Other => "OTHER",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for ChangeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeResult::Ok => write!(f, "OK"),
            ChangeResult::Changed { error } => write!(f, "CHANGED ({})", error),
            ChangeResult::Bad { error, bad_servers } => {
                write!(f, "BAD SERVERS ({}):", error)?;
                for s in bad_servers.iter() {
                    write!(f, "\n- {}", s)?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for ServerDescriptor {
    type Err = ParseError;

    /// Parses `<server_id>: <addr>,<addr>...`. The address list may be empty; an address
    /// may be quoted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let colon = s.find(':').ok_or_else(|| ParseError::BadMember(s.into()))?;
        let (id, addrs) = (&s[..colon], s[colon + 1..].trim());

        let server_id = id
            .trim()
            .parse()
            .map_err(|e| ParseError::BadNumber(s.into(), e))?;

        let addresses = parse_addresses(s, addrs)?;

        Ok(ServerDescriptor::new(server_id, addresses))
    }
}

impl FromStr for Configuration {
    type Err = ParseError;

    /// Parses what `Display` writes. Blank lines are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines().filter(|l| !l.trim().is_empty());

        let header = lines.next().unwrap_or("");
        let epoch = header
            .strip_prefix("Configuration ")
            .and_then(|x| x.strip_suffix(":"))
            .ok_or_else(|| ParseError::BadHeader(header.into()))?;
        let epoch = epoch
            .parse()
            .map_err(|e| ParseError::BadNumber(header.into(), e))?;

        let mut members = vec![];
        for line in lines {
            let m = line
                .strip_prefix("- ")
                .ok_or_else(|| ParseError::BadMember(line.into()))?;
            members.push(m.parse()?);
        }

        Ok(Configuration { epoch, members })
    }
}

/// parse_configuration loads a Configuration from the text `Display` renders.
pub fn parse_configuration(s: &str) -> Result<Configuration, ParseError> {
    s.parse()
}

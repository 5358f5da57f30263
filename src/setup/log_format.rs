use std::fmt;
use std::io;
use std::io::Write;

use slog::{Drain, Key, Level, OwnedKVList, Record, KV};
use slog_term::{Decorator, RecordDecorator};

pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S%.3f %:z";

/// AdminFormat writes one line per record:
///
/// ```text
/// [2026/10/18 10:13:55.035 +08:00] INFO reconfigure: resolved token=10.0.0.2:61023 (src/resolver/resolver.rs:40)
/// ```
///
/// Several admin tools may append to the same file, so every line names the tool that wrote
/// it. Records below `level` are dropped here, before they reach the decorator.
pub struct AdminFormat<D: Decorator> {
    decorator: D,
    tool: String,
    level: Level,
}

impl<D: Decorator> AdminFormat<D> {
    pub fn new<S: Into<String>>(decorator: D, tool: S, level: Level) -> Self {
        AdminFormat {
            decorator,
            tool: tool.into(),
            level,
        }
    }
}

impl<D: Decorator> Drain for AdminFormat<D> {
    type Ok = ();
    type Err = io::Error;

    fn log(&self, record: &Record, values: &OwnedKVList) -> Result<(), io::Error> {
        if !self.is_enabled(record.level()) {
            return Ok(());
        }

        self.decorator.with_record(record, values, |rd| {
            rd.start_timestamp()?;
            write!(rd, "[{}]", chrono::Local::now().format(TIMESTAMP_FORMAT))?;

            rd.start_whitespace()?;
            write!(rd, " ")?;
            rd.start_level()?;
            write!(rd, "{}", record.level().as_str())?;

            rd.start_whitespace()?;
            write!(rd, " ")?;
            rd.start_msg()?;
            write!(rd, "{}: {}", self.tool, record.msg())?;

            let mut fields = Fields { rd };
            record.kv().serialize(record, &mut fields)?;
            values.serialize(record, &mut fields)?;
            let rd = fields.rd;

            rd.start_whitespace()?;
            write!(rd, " ")?;
            rd.start_msg()?;
            write!(rd, "({}:{})", record.file(), record.line())?;

            rd.start_whitespace()?;
            writeln!(rd)?;
            rd.flush()
        })
    }

    fn is_enabled(&self, level: Level) -> bool {
        level.is_at_least(self.level)
    }
}

/// Fields writes key-values as ` key=value`. A value that is empty or has spaces or quotes is
/// written quoted, so that a line splits on spaces.
struct Fields<'a> {
    rd: &'a mut dyn RecordDecorator,
}

impl<'a> slog::Serializer for Fields<'a> {
    fn emit_arguments(&mut self, key: Key, val: &fmt::Arguments) -> slog::Result {
        let v = val.to_string();

        self.rd.start_whitespace()?;
        write!(self.rd, " ")?;
        self.rd.start_key()?;
        write!(self.rd, "{}", key)?;
        self.rd.start_separator()?;
        write!(self.rd, "=")?;
        self.rd.start_value()?;

        if v.is_empty() || v.contains(|c: char| c.is_whitespace() || c == '"') {
            write!(self.rd, "{:?}", v)?;
        } else {
            write!(self.rd, "{}", v)?;
        }
        Ok(())
    }
}

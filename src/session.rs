// src/session.rs
//! Line-based control session for flipping debug flags from a script or terminal

use std::io::Write as _;

use anyhow::{
    Result,
    bail,
};
use tokio::io::{
    AsyncBufRead,
    AsyncBufReadExt,
};
use tracing::{
    debug,
    info,
    instrument,
    warn,
};

use crate::{
    erm,
    flags::{
        DebugState,
        DebugStatus,
        SetDebug,
    },
    sink::DebugSink,
};

pub const HELP: &str = "\
commands:
  setdebug [engine] [storage]   set both flags (defaults: true false)
  setdebug engine=<b> storage=<b>
  status                        print the current flags as json
  help                          show this
  quit                          leave the session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetDebug(SetDebug),
    Status,
    Help,
    Quit,
}

fn parse_bool(s: &str) -> Result<bool> {
    Ok(match s.to_ascii_lowercase().as_str() {
        | "true" | "t" | "on" | "yes" | "1" => true,
        | "false" | "f" | "off" | "no" | "0" => false,
        | _ => bail!("Not a boolean: '{s}'"),
    })
}

fn parse_set_debug<'a>(args: impl Iterator<Item = &'a str>) -> Result<SetDebug> {
    let mut engine = None;
    let mut storage = None;
    let mut positional = 0;

    for arg in args {
        let (slot, name, val) = match arg.split_once('=') {
            | Some((key, val)) => match key.to_ascii_lowercase().as_str() {
                | "engine" => (&mut engine, "engine", val),
                | "storage" => (&mut storage, "storage", val),
                | _ => bail!("Unknown flag '{key}'"),
            },
            | None => {
                positional += 1;
                match positional {
                    | 1 => (&mut engine, "engine", arg),
                    | 2 => (&mut storage, "storage", arg),
                    | _ => bail!("Too many arguments to setdebug"),
                }
            },
        };

        if slot.replace(parse_bool(val)?).is_some() {
            bail!("Flag '{name}' given twice");
        }
    }

    let default = SetDebug::default();
    Ok(SetDebug {
        engine:  engine.unwrap_or(default.engine),
        storage: storage.unwrap_or(default.storage),
    })
}

impl Command {
    /// Parses a line. Blank lines give `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else {
            return Ok(None);
        };

        let cmd = match cmd.to_ascii_lowercase().as_str() {
            | "setdebug" => Self::SetDebug(parse_set_debug(words)?),
            | "status" => Self::Status,
            | "help" | "?" => Self::Help,
            | "quit" | "exit" => Self::Quit,
            | other => bail!("Unknown command '{other}' (try 'help')"),
        };

        Ok(Some(cmd))
    }
}

pub struct Session<'s, S, W> {
    state: &'s DebugState,
    sink:  S,
    out:   W,
}

impl<'s, S: DebugSink, W: std::io::Write> Session<'s, S, W> {
    /// `sink` receives confirmations, `out` receives status and help
    pub fn new(state: &'s DebugState, sink: S, out: W) -> Self { Self { state, sink, out } }

    /// Runs one command. Returns false once the session should end.
    #[instrument(level = "debug", skip(self))]
    pub fn execute(&mut self, cmd: Command) -> Result<bool> {
        match cmd {
            | Command::SetDebug(set) => self.state.apply(&mut self.sink, set),
            | Command::Status => {
                let status = DebugStatus::from(self.state.flags());
                writeln!(self.out, "{}", serde_json::to_string(&status)?)?;
            },
            | Command::Help => writeln!(self.out, "{HELP}")?,
            | Command::Quit => return Ok(false),
        }
        self.out.flush()?;
        Ok(true)
    }

    /// Reads commands until quit or end of input
    ///
    /// Lines that aren't valid UTF-8 are decoded lossily and rejected like any other bad command.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, mut reader: R) -> Result<()> {
        let mut buf = Vec::new();
        info!("Session started");

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']);
            let cmd = match Command::parse(line) {
                | Ok(Some(cmd)) => cmd,
                | Ok(None) => continue,
                | Err(e) => {
                    warn!("Rejected '{line}': {e}");
                    erm!("{e}");
                    continue;
                },
            };

            debug!("Running {cmd:?}");
            if !self.execute(cmd)? {
                break;
            }
        }

        info!("Session ended");
        Ok(())
    }

    pub fn into_parts(self) -> (S, W) { (self.sink, self.out) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        flags::{
            DebugFlags,
            ENGINE_MSG,
            STORAGE_MSG,
        },
        sink::MemorySink,
    };

    #[test]
    fn parses_positional_and_defaults() {
        assert_eq!(Command::parse("setdebug").unwrap(), Some(Command::SetDebug(SetDebug::default())));
        assert_eq!(
            Command::parse("SetDebug off ON").unwrap(),
            Some(Command::SetDebug(SetDebug {
                engine:  false,
                storage: true,
            }))
        );
        assert_eq!(
            Command::parse("setdebug 0").unwrap(),
            Some(Command::SetDebug(SetDebug {
                engine:  false,
                storage: false,
            }))
        );
    }

    #[test]
    fn parses_named_args() {
        assert_eq!(
            Command::parse("setdebug storage=yes").unwrap(),
            Some(Command::SetDebug(SetDebug {
                engine:  true,
                storage: true,
            }))
        );
        assert_eq!(
            Command::parse("setdebug engine=f storage=t").unwrap(),
            Some(Command::SetDebug(SetDebug {
                engine:  false,
                storage: true,
            }))
        );
    }

    #[test]
    fn named_args_dont_take_positions() {
        assert_eq!(
            Command::parse("setdebug storage=on off").unwrap(),
            Some(Command::SetDebug(SetDebug {
                engine:  false,
                storage: true,
            }))
        );
        assert!(Command::parse("setdebug storage=on off on").is_err());
    }

    #[test]
    fn parses_simple_commands() {
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert_eq!(Command::parse("status").unwrap(), Some(Command::Status));
        assert_eq!(Command::parse("EXIT").unwrap(), Some(Command::Quit));
        assert_eq!(Command::parse("?").unwrap(), Some(Command::Help));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Command::parse("frobnicate").is_err());
        assert!(Command::parse("setdebug maybe").is_err());
        assert!(Command::parse("setdebug true false true").is_err());
        assert!(Command::parse("setdebug jmatrix=true").is_err());
        assert!(Command::parse("setdebug on engine=off").is_err());
    }

    #[test]
    fn status_prints_json() {
        let state = DebugState::new();
        let mut session = Session::new(&state, MemorySink::default(), Vec::new());
        session.execute(Command::SetDebug(SetDebug::default())).unwrap();
        session.execute(Command::Status).unwrap();

        let (sink, out) = session.into_parts();
        assert_eq!(sink.lines(), [ENGINE_MSG]);
        assert_eq!(String::from_utf8(out).unwrap(), "{\"engine\":true,\"storage\":false,\"bits\":1}\n");
    }

    #[tokio::test]
    async fn runs_script_until_quit() {
        let script = b"setdebug true true\n\nbogus\nsetdebug false\nstatus\nquit\nsetdebug\n";
        let state = DebugState::new();
        let mut session = Session::new(&state, MemorySink::default(), Vec::new());
        session.run(&script[..]).await.unwrap();

        // the line after quit never runs
        assert_eq!(state.flags(), DebugFlags::NONE);
        let (sink, out) = session.into_parts();
        assert_eq!(sink.lines(), [ENGINE_MSG, STORAGE_MSG]);
        assert_eq!(String::from_utf8(out).unwrap(), "{\"engine\":false,\"storage\":false,\"bits\":0}\n");
    }

    #[tokio::test]
    async fn stops_at_end_of_input() {
        let state = DebugState::new();
        let mut session = Session::new(&state, MemorySink::default(), Vec::new());
        session.run(&b"setdebug false true"[..]).await.unwrap();

        assert_eq!(state.flags(), DebugFlags::STORAGE_DEBUG);
    }

    #[tokio::test]
    async fn survives_invalid_utf8() {
        let script = b"setdebug true true\n\xff\xfe bad\nsetdebug false true\r\nstatus\n";
        let state = DebugState::new();
        let mut session = Session::new(&state, MemorySink::default(), Vec::new());
        session.run(&script[..]).await.unwrap();

        assert_eq!(state.flags(), DebugFlags::STORAGE_DEBUG);
        let (sink, out) = session.into_parts();
        assert_eq!(sink.lines(), [ENGINE_MSG, STORAGE_MSG, STORAGE_MSG]);
        assert_eq!(String::from_utf8(out).unwrap(), "{\"engine\":false,\"storage\":true,\"bits\":2}\n");
    }
}

// src/sink.rs
//! Output channels for debug flag confirmations

use std::io::{
    self,
    Write,
};

pub trait DebugSink {
    fn emit(&mut self, line: &str);
}

impl<S: DebugSink + ?Sized> DebugSink for &mut S {
    fn emit(&mut self, line: &str) { (**self).emit(line) }
}

/// Writes each line to stdout and flushes
///
/// Write errors are dropped since flipping a flag can't fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl DebugSink for StdoutSink {
    fn emit(&mut self, line: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{line}");
        let _ = stdout.flush();
    }
}

/// Collects lines in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Vec<String>,
}

impl MemorySink {
    pub fn lines(&self) -> &[String] { &self.lines }

    pub fn take(&mut self) -> Vec<String> { std::mem::take(&mut self.lines) }
}

impl DebugSink for MemorySink {
    fn emit(&mut self, line: &str) { self.lines.push(line.to_string()) }
}

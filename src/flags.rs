// flags.rs
//
// stores the debug flags for global use

use std::{
    fmt,
    sync::atomic::{
        AtomicU8,
        Ordering,
    },
};

use serde::Serialize;
use tracing::{
    debug,
    instrument,
};

use crate::sink::{
    DebugSink,
    StdoutSink,
};

pub const ENGINE_MSG: &str = "Debugging for PAM algorithm set to ON.";
pub const STORAGE_MSG: &str = "Debugging for jmatrix inside parallelpam package set to ON.";

/// The process-wide debug flags
///
/// Starts with both subsystems off. Only [`set_debug()`] and friends write it.
pub static DEBUG: DebugState = DebugState::new();

/// Bitmask of enabled debug channels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DebugFlags(u8);

impl DebugFlags {
    pub const NONE: Self = Self(0x00);
    /// PAM algorithm and silhouette calculation
    pub const ENGINE_DEBUG: Self = Self(0x01);
    /// jmatrix storage
    pub const STORAGE_DEBUG: Self = Self(0x02);

    const ALL: u8 = Self::ENGINE_DEBUG.0 | Self::STORAGE_DEBUG.0;

    pub const fn bits(self) -> u8 { self.0 }

    /// Drops any bit that isn't a known channel
    pub const fn from_bits_truncate(bits: u8) -> Self { Self(bits & Self::ALL) }

    pub const fn contains(self, other: Self) -> bool { self.0 & other.0 == other.0 }

    pub const fn is_empty(self) -> bool { self.0 == 0 }

    pub fn engine(self) -> bool { self.contains(Self::ENGINE_DEBUG) }

    pub fn storage(self) -> bool { self.contains(Self::STORAGE_DEBUG) }
}

impl fmt::Display for DebugFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.engine(), self.storage()) {
            | (false, false) => write!(f, "none"),
            | (true, false) => write!(f, "engine"),
            | (false, true) => write!(f, "storage"),
            | (true, true) => write!(f, "engine|storage"),
        }
    }
}

/// Snapshot of the flags, as reported by the session's `status` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DebugStatus {
    pub engine:  bool,
    pub storage: bool,
    pub bits:    u8,
}

impl From<DebugFlags> for DebugStatus {
    fn from(flags: DebugFlags) -> Self {
        Self {
            engine:  flags.engine(),
            storage: flags.storage(),
            bits:    flags.bits(),
        }
    }
}

/// Arguments for a debug flag update
///
/// The default turns the engine on and storage off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetDebug {
    pub engine:  bool,
    pub storage: bool,
}

impl Default for SetDebug {
    fn default() -> Self {
        Self {
            engine:  true,
            storage: false,
        }
    }
}

#[derive(Debug)]
pub struct DebugState {
    bits: AtomicU8,
}

impl Default for DebugState {
    fn default() -> Self { Self::new() }
}

impl DebugState {
    pub const fn new() -> Self {
        Self {
            bits: AtomicU8::new(DebugFlags::NONE.bits()),
        }
    }

    pub fn flags(&self) -> DebugFlags { DebugFlags::from_bits_truncate(self.bits.load(Ordering::Acquire)) }

    pub fn is_engine_debug(&self) -> bool { self.flags().engine() }

    pub fn is_storage_debug(&self) -> bool { self.flags().storage() }

    /// Sets each flag to exactly the given value
    ///
    /// Turning a flag on emits a confirmation line to `sink`. Turning it off is silent.
    /// Each bit is updated on its own, so the other flag is never touched.
    #[instrument(level = "trace", skip(self, sink))]
    pub fn set_debug<S: DebugSink>(&self, mut sink: S, engine: bool, storage: bool) {
        self.set_bit(DebugFlags::ENGINE_DEBUG, engine);
        if engine {
            sink.emit(ENGINE_MSG);
        }

        self.set_bit(DebugFlags::STORAGE_DEBUG, storage);
        if storage {
            sink.emit(STORAGE_MSG);
        }

        debug!("Debug flags now {}", self.flags());
    }

    pub fn apply<S: DebugSink>(&self, sink: S, args: SetDebug) {
        self.set_debug(sink, args.engine, args.storage)
    }

    fn set_bit(&self, flag: DebugFlags, on: bool) {
        if on {
            self.bits.fetch_or(flag.bits(), Ordering::AcqRel);
        } else {
            self.bits.fetch_and(!flag.bits(), Ordering::AcqRel);
        }
    }
}

/// Sets both debug flags on the process-wide state, confirming to stdout
pub fn set_debug(engine: bool, storage: bool) { DEBUG.set_debug(StdoutSink, engine, storage) }

/// Same as `set_debug(true, false)`
pub fn set_debug_default() { set_debug_default_with(StdoutSink) }

pub fn set_debug_default_with<S: DebugSink>(sink: S) { DEBUG.apply(sink, SetDebug::default()) }

/// Version of [`set_debug()`] that confirms to the given sink
pub fn set_debug_with<S: DebugSink>(sink: S, engine: bool, storage: bool) { DEBUG.set_debug(sink, engine, storage) }

pub fn debug_flags() -> DebugFlags { DEBUG.flags() }

pub fn is_engine_debug() -> bool { DEBUG.is_engine_debug() }

pub fn is_storage_debug() -> bool { DEBUG.is_storage_debug() }

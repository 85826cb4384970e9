// lib.rs
//
// process-wide debug flags for the PAM engine and jmatrix storage

pub mod args;
pub mod config;
pub mod flags;
pub mod globals;
pub mod logging;
mod macros;
pub mod session;
pub mod sink;

pub use flags::{
    DEBUG,
    DebugFlags,
    DebugState,
    SetDebug,
    debug_flags,
    is_engine_debug,
    is_storage_debug,
    set_debug,
    set_debug_default,
    set_debug_default_with,
    set_debug_with,
};
pub use sink::{
    DebugSink,
    MemorySink,
    StdoutSink,
};

// macros.rs
//
// defines the gated diagnostic macros used by the engine and storage code

#[doc(hidden)]
#[macro_export]
macro_rules! __debug_line {
    ($color:literal, $tag:literal, $($arg:tt)*) => {{
        let f = std::path::Path::new(file!())
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("Unknown");
        println!(concat!("\x1b[", $color, ";1m[", $tag, " {}] {}\x1b[0m"), f, format!($($arg)*))
    }};
}

/// Prints a diagnostic line if engine debugging is on
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        if $crate::flags::is_engine_debug() {
            $crate::__debug_line!("34", "pam", $($arg)*)
        }
    }};
}

/// Prints a diagnostic line if storage debugging is on
#[macro_export]
macro_rules! storage_debug {
    ($($arg:tt)*) => {{
        if $crate::flags::is_storage_debug() {
            $crate::__debug_line!("35", "jmatrix", $($arg)*)
        }
    }};
}

#[macro_export]
macro_rules! erm {
    ($($arg:tt)*) => {
        eprintln!("\x1b[31;1m  {}\x1b[0m", format!($($arg)*))
    };
}

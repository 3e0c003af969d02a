//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted output with a module prefix
//! - `debug!` macro, only emitted when verbose mode is on
//!
//! On native targets messages go to stderr with a colored prefix. In the
//! browser (`web` feature) they go to the devtools console, `error` to
//! `console.error`.
//!
//! # Example
//!
//! ```ignore
//! log!("partial"; "failed to load {}: {}", path, err);
//! debug!("nav"; "swapped content for {}", url);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Sinks
// ============================================================================

/// Log a message with a colored module prefix
#[cfg(not(target_arch = "wasm32"))]
pub fn log(module: &str, message: &str) {
    use std::io::{Write, stderr};

    let prefix = colorize_prefix(module, &module.to_ascii_lowercase());
    let mut stderr = stderr().lock();
    writeln!(stderr, "{prefix} {message}").ok();
    stderr.flush().ok();
}

/// Log a message to the browser console
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub fn log(module: &str, message: &str) {
    let line = wasm_bindgen::JsValue::from_str(&format_line(module, message));
    if module.eq_ignore_ascii_case("error") || module.eq_ignore_ascii_case("partial") {
        web_sys::console::error_1(&line);
    } else {
        web_sys::console::log_1(&line);
    }
}

/// No sink without a host console
#[cfg(all(target_arch = "wasm32", not(feature = "web")))]
pub fn log(_module: &str, _message: &str) {}

/// Plain `[module] message` line (no color).
pub fn format_line(module: &str, message: &str) -> String {
    format!("[{module}] {message}")
}

/// Apply color to a module prefix based on module type.
///
/// Plain when stderr has no color support or `--color never` is set.
#[cfg(not(target_arch = "wasm32"))]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    use owo_colors::{OwoColorize, Stream::Stderr, Style};

    let style = match module_lower {
        "nav" => Style::new().bright_blue(),
        "check" => Style::new().bright_green(),
        "error" | "partial" => Style::new().bright_red(),
        _ => Style::new().bright_yellow(),
    };
    let prefix = format!("[{module}]");
    prefix
        .if_supports_color(Stderr, |p| p.style(style.bold()))
        .to_string()
}

// ============================================================================
// Tests
// ============================================================================

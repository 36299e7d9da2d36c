//! Color support with NO_COLOR and CLICOLOR environment variable handling
//!
//! - `NO_COLOR`: if set (to any value), disable colors
//! - `CLICOLOR_FORCE`: if set to non-zero, force colors even when not a TTY
//! - `CLICOLOR`: if set to 0, disable colors
//!
//! Otherwise colors follow whether stdout is a terminal.
use colored::control;

/// Decide whether to colorize, given an environment lookup and TTY status
pub fn should_colorize(env: impl Fn(&str) -> Option<String>, is_tty: bool) -> bool {
    // NO_COLOR takes precedence over everything (https://no-color.org/)
    if env("NO_COLOR").is_some() {
        return false;
    }

    if env("CLICOLOR_FORCE").is_some_and(|v| v != "0") {
        return true;
    }

    if env("CLICOLOR").is_some_and(|v| v == "0") {
        return false;
    }

    is_tty
}

/// Configure `colored` for the whole process. Call early in main().
pub fn init_colors() {
    let is_tty = std::io::IsTerminal::is_terminal(&std::io::stdout());
    control::set_override(should_colorize(|k| std::env::var(k).ok(), is_tty));
}

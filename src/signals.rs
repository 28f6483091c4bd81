//! Signal handling for turtle
//!
//! The shell itself survives Ctrl-C: SIGINT only raises a flag. Children run
//! in the terminal's foreground process group, so they still receive the
//! signal and die as usual. Loops over several commands check the flag
//! between commands with [`take_interrupt`].

use std::sync::atomic::{AtomicBool, Ordering};

/// Set by the SIGINT handler, cleared by [`take_interrupt`]
pub static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Set up signal handlers for the shell
#[cfg(unix)]
pub fn setup_signal_handlers() {
    use signal_hook::low_level;

    // Register SIGINT handler that sets the flag
    unsafe {
        if let Err(err) = low_level::register(signal_hook::consts::SIGINT, || {
            INTERRUPTED.store(true, Ordering::SeqCst);
        }) {
            log::warn!("failed to install SIGINT handler: {}", err);
        }
    }
}

/// Set up signal handlers (no-op on non-Unix)
#[cfg(not(unix))]
pub fn setup_signal_handlers() {}

/// Check if SIGINT was received and clear the flag
pub fn take_interrupt() -> bool {
    INTERRUPTED.swap(false, Ordering::SeqCst)
}


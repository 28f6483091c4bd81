//! Logger setup: `simplelog` terminal logger on stderr

use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Install the global logger. Calling it again is harmless: the first
/// logger stays in place.
pub fn init(level: LevelFilter) {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Debug)
        .build();

    if TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto).is_ok() {
        log::debug!("logging at level {}", level);
    }
}

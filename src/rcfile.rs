use log::debug;
use turtle::eval::STATUS_SUCCESS;
use turtle::{Config, Executor};

/// Source the rc file if it exists
pub(crate) fn load_turtlerc(executor: &mut Executor, config: &Config) {
    let Some(rc_path) = &config.rc_file else {
        return;
    };

    if !rc_path.is_file() {
        debug!("no rc file at {}", rc_path.display());
        return;
    }

    let status = executor.source_file(rc_path, &[]);
    if status != STATUS_SUCCESS {
        eprintln!(
            "turtle: warning: {} stopped with status {}",
            rc_path.display(),
            status
        );
    }
}

//! turtle - a small shell
//!
//! Usage:
//!   turtle                   Start interactive REPL
//!   turtle -c "cmd"          Execute a command string
//!   turtle script [args...]  Execute a script file

mod cli;
mod rcfile;
mod repl;

use log::info;
use std::env;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;
use turtle::eval::STATUS_USAGE;
use turtle::{logging, signals, Config};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let cli = match cli::parse_args(&args) {
        Ok(cli) => cli,
        Err(msg) => {
            eprintln!("turtle: {}", msg);
            eprintln!("Try 'turtle --help' for more information.");
            return cli::exit_code(STATUS_USAGE);
        }
    };

    if cli.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }

    if cli.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    let config = Config::from_env();
    logging::init(config.log_level);
    signals::setup_signal_handlers();

    if let Some(secs) = cli.sleep {
        info!("sleeping {}s before start (pid {})", secs, std::process::id());
        thread::sleep(Duration::from_secs(secs));
    }

    if let Some(cmd) = cli.command {
        return cli::execute_command(&cmd);
    }

    if let Some(script) = cli.script {
        return cli::execute_script(&script, &cli.script_args);
    }

    match repl::run_repl(&config, cli.norc) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("turtle: REPL error: {}", e);
            ExitCode::FAILURE
        }
    }
}

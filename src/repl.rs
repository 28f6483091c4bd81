use crate::cli::run_text;
use crate::rcfile::load_turtlerc;
use log::debug;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use turtle::{signals, Config, Executor};

const FAREWELL: &str = "bye!";

/// Run the interactive loop until Ctrl-C or Ctrl-D at the prompt
pub(crate) fn run_repl(config: &Config, norc: bool) -> RlResult<()> {
    let mut executor = Executor::new();
    if !norc {
        load_turtlerc(&mut executor, config);
    }

    let mut rl = DefaultEditor::new()?;

    // Try to load history
    if let Some(path) = &config.history_file {
        if let Err(e) = rl.load_history(path) {
            debug!("no history loaded from {}: {}", path.display(), e);
        }
    }

    loop {
        match rl.readline(&config.prompt) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                // A Ctrl-C aimed at an earlier child must not cancel this line
                signals::take_interrupt();
                run_text(&mut executor, &line);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("{}", FAREWELL);
                break;
            }
            Err(err) => {
                eprintln!("turtle: {}", err);
                break;
            }
        }
    }

    // Save history
    if let Some(path) = &config.history_file {
        if let Err(e) = rl.save_history(path) {
            debug!("could not save history to {}: {}", path.display(), e);
        }
    }

    Ok(())
}

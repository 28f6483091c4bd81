use std::process::ExitCode;
use turtle::eval::{STATUS_INTERRUPTED, STATUS_SUCCESS, STATUS_USAGE};
use turtle::{signals, Executor, Parser, Status};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parsed command-line arguments
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct CliArgs {
    pub(crate) command: Option<String>,
    pub(crate) script: Option<String>,
    pub(crate) script_args: Vec<String>,
    pub(crate) sleep: Option<u64>,
    pub(crate) norc: bool,
    pub(crate) help: bool,
    pub(crate) version: bool,
}

/// Parse command-line arguments
pub(crate) fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();

    let mut i = 1; // Skip program name
    while i < args.len() {
        match args[i].as_str() {
            "-c" => {
                // Everything after -c is the command
                if i + 1 >= args.len() {
                    return Err("-c: option requires an argument".into());
                }
                cli.command = Some(args[i + 1..].join(" "));
                break;
            }
            "--sleep" => {
                let secs = args
                    .get(i + 1)
                    .ok_or("--sleep: option requires an argument")?;
                let secs = secs
                    .parse::<u64>()
                    .map_err(|_| format!("--sleep: invalid number of seconds '{}'", secs))?;
                cli.sleep = Some(secs);
                i += 1;
            }
            "--norc" => {
                cli.norc = true;
            }
            "--help" | "-h" => {
                cli.help = true;
            }
            "--version" | "-V" => {
                cli.version = true;
            }
            flag if flag.starts_with('-') => {
                return Err(format!("{}: unknown option", flag));
            }
            path => {
                // The script's own arguments follow it
                cli.script = Some(path.to_string());
                cli.script_args = args[i + 1..].to_vec();
                break;
            }
        }
        i += 1;
    }

    Ok(cli)
}

pub(crate) fn print_help() {
    println!(
        r#"turtle-{} - a small shell

USAGE:
    turtle                      Start interactive REPL
    turtle -c <command>         Execute a command string
    turtle <script> [args...]   Execute a script file ($1.. are the args)
    turtle --sleep <secs>       Pause before starting (to attach a debugger)
    turtle --norc               Do not read the rc file
    turtle --help               Show this help message
    turtle --version            Show version

SYNTAX:
    a | b                       Pipe a's output into b
    a && b   a || b             Run b if a succeeds / fails
    a; b                        Run a then b
    NAME=value                  Set a shell variable
    NAME=value cmd              Set NAME in cmd's environment only
    $NAME  "$NAME"  '$NAME'     Expand / expand / keep literally
    $?  $!                      Last exit status / last child pid
    $(cmd)                      Output of cmd, minus one trailing newline
    <(cmd)                      Path of a file holding cmd's output
    . file [args...]            Run file in this shell
    # comment                   Ignored to end of line

ENVIRONMENT:
    TURTLE_LOG                  Log level: off, error, warn, info, debug, trace
    TURTLE_PROMPT               REPL prompt
    TURTLE_HISTFILE             History file (default ~/.turtle_history)
    TURTLE_RC                   Startup file (default ~/.turtlerc)"#,
        VERSION
    );
}

pub(crate) fn print_version() {
    println!("turtle-{}", VERSION);
}

/// Map a shell status onto a process exit code
pub(crate) fn exit_code(status: Status) -> ExitCode {
    if status == STATUS_SUCCESS {
        ExitCode::SUCCESS
    } else {
        ExitCode::from((status & 0xff) as u8)
    }
}

/// Run every command in `text`, reporting syntax errors and carrying on with
/// the next line. Returns the last status.
pub(crate) fn run_text(executor: &mut Executor, text: &str) -> Status {
    let mut parser = Parser::new(text);
    let mut status = STATUS_SUCCESS;

    loop {
        if signals::take_interrupt() {
            return STATUS_INTERRUPTED;
        }
        match parser.parse_next() {
            Ok(Some(cmd)) if cmd.is_empty() => {}
            Ok(Some(cmd)) => status = executor.exec(&cmd),
            Ok(None) => break,
            Err(e) => {
                eprintln!("turtle: syntax error: {}", e);
                status = STATUS_USAGE;
                executor.set_last_status(status);
            }
        }
    }

    status
}

/// Execute a command string
pub(crate) fn execute_command(cmd: &str) -> ExitCode {
    let mut executor = Executor::new();
    exit_code(run_text(&mut executor, cmd))
}

/// Execute a script file
pub(crate) fn execute_script(path: &str, args: &[String]) -> ExitCode {
    let mut executor = Executor::new();
    exit_code(executor.source_file(path, args))
}

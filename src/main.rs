//! Run matlabette statements from script files or standard input.

use std::fmt;
use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use matlabette::{Commands, RuntimeError, Session, Workspace};

const HELP: &str = "\
Statements:
  name = expression   assign and echo
  expression          assign to ans and echo
  name                show a variable

Operators: + - * / .+ .- .* ./ and postfix ' (transpose)
Matrices:  [1 2; 3 4] or [1, 2; 3, 4]
Builtins:  inv transpose zeros ones eye pi Inf NaN

Commands:
  help  show this text
  who   list variables
  save  write variables to the workspace file
  load  read variables from the workspace file
  exit  stop processing input
";

/// Evaluate MATLAB-like matrix statements line by line.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script files to run in order. Reads standard input when empty.
    scripts: Vec<PathBuf>,

    /// File used by the `save` and `load` commands.
    #[arg(short, long, default_value = "matlabette.workspace")]
    workspace: PathBuf,

    /// Do not print statement output, only errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Commands backed by the file system and the input loop.
struct HostCommands {
    workspace_file: PathBuf,
    exit_requested: bool,
}

impl HostCommands {
    const NAMES: [&'static str; 5] = ["help", "who", "save", "load", "exit"];

    fn failure(name: &str, message: impl fmt::Display) -> RuntimeError {
        RuntimeError::Command {
            name: name.to_string(),
            message: message.to_string(),
        }
    }
}

impl Commands for HostCommands {
    fn is_reserved(&self, name: &str) -> bool {
        Self::NAMES.contains(&name)
    }

    fn invoke(&mut self, name: &str, workspace: &mut Workspace) -> Result<String, RuntimeError> {
        match name {
            "help" => Ok(HELP.to_string()),
            "who" => {
                let names: Vec<_> = workspace.names().collect();
                Ok(format!("\n{}\n", names.join("  ")))
            }
            "save" => {
                fs::write(&self.workspace_file, workspace.to_text())
                    .map_err(|e| Self::failure(name, e))?;
                Ok(format!(
                    "saved {} variable(s) to {}\n",
                    workspace.len(),
                    self.workspace_file.display()
                ))
            }
            "load" => {
                let text = fs::read_to_string(&self.workspace_file)
                    .map_err(|e| Self::failure(name, e))?;
                let loaded = Workspace::from_text(&text).map_err(|e| Self::failure(name, e))?;
                if let Some(reserved) = loaded.names().find(|n| self.is_reserved(n)) {
                    return Err(RuntimeError::Reserved(reserved.to_string()));
                }
                let count = loaded.len();
                workspace.extend(loaded);
                Ok(format!(
                    "loaded {count} variable(s) from {}\n",
                    self.workspace_file.display()
                ))
            }
            "exit" => {
                self.exit_requested = true;
                Ok(String::new())
            }
            _ => Err(RuntimeError::UndefinedVariable(name.to_string())),
        }
    }
}

/// Run every line of `input`; returns whether any statement failed.
fn run(session: &mut Session<HostCommands>, input: impl BufRead, source: &str, quiet: bool) -> bool {
    let mut had_error = false;

    for (index, line) in input.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("{source}: {e}");
                return true;
            }
        };

        match session.evaluate(&line) {
            Ok(Some(output)) if !quiet => print!("{output}"),
            Ok(_) => {}
            Err(e) => {
                eprintln!("{source}:{}: {e}", index + 1);
                had_error = true;
            }
        }

        if session.commands().exit_requested {
            break;
        }
    }

    had_error
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut session = Session::with_commands(HostCommands {
        workspace_file: args.workspace,
        exit_requested: false,
    });

    let mut had_error = false;

    if args.scripts.is_empty() {
        had_error = run(&mut session, io::stdin().lock(), "<stdin>", args.quiet);
    }

    for path in &args.scripts {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{}: {e}", path.display());
                had_error = true;
                continue;
            }
        };
        log::info!("running {}", path.display());
        let source = path.display().to_string();
        had_error |= run(&mut session, content.as_bytes(), &source, args.quiet);

        if session.commands().exit_requested {
            break;
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(file: &str) -> HostCommands {
        HostCommands {
            workspace_file: std::env::temp_dir()
                .join(format!("matlabette-{}-{file}", std::process::id())),
            exit_requested: false,
        }
    }

    #[test]
    fn save_then_load() {
        let mut commands = host("roundtrip.workspace");
        let mut workspace = Workspace::from_text("a = 1\nm = [1 -2; 3 4]\n").unwrap();
        commands.invoke("save", &mut workspace).unwrap();

        let mut loaded = Workspace::new();
        commands.invoke("load", &mut loaded).unwrap();
        assert_eq!(loaded, workspace);
        fs::remove_file(&commands.workspace_file).unwrap();
    }

    #[test]
    fn load_rejects_command_names() {
        let mut commands = host("command.workspace");
        fs::write(&commands.workspace_file, "x = 1\nhelp = 2\n").unwrap();

        let mut workspace = Workspace::new();
        let err = commands.invoke("load", &mut workspace).unwrap_err();
        assert_eq!(err, RuntimeError::Reserved("help".to_string()));
        assert!(workspace.is_empty());
        fs::remove_file(&commands.workspace_file).unwrap();
    }

    #[test]
    fn load_rejects_builtin_names() {
        let mut commands = host("builtin.workspace");
        fs::write(&commands.workspace_file, "pi = 3\n").unwrap();

        let mut session = Session::with_commands(commands);
        let err = session.evaluate("load").unwrap_err();
        assert_eq!(err.to_string(), "load: line 1: pi is reserved");
        assert!(!session.workspace().contains("pi"));
        fs::remove_file(&session.commands().workspace_file).unwrap();
    }

    #[test]
    fn load_missing_file_fails() {
        let mut commands = host("missing.workspace");
        let err = commands.invoke("load", &mut Workspace::new()).unwrap_err();
        assert!(matches!(err, RuntimeError::Command { ref name, .. } if name == "load"));
    }
}

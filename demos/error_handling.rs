//! Demonstrate how syntax and runtime errors surface from a session.

use matlabette::{Error, Session};

fn main() {
    let mut session = Session::new();

    for line in ["a = [1 2", "b = [1, 2; 3]", "[1 2] * [3 4]", "c + 1", "a = 1 2"] {
        match session.evaluate(line) {
            Ok(output) => println!("{line}: ok {output:?}"),
            Err(Error::Syntax(e)) => {
                println!("{line}: syntax error: {e}");
                println!("  Found: {}", e.found);
                println!("  Expected: {}", e.expected);
                println!("  Column: {}", e.column);
            }
            Err(Error::Runtime(e)) => {
                println!("{line}: runtime error: {e}");
            }
            Err(e @ Error::Workspace { .. }) => {
                println!("{line}: {e}");
            }
        }
    }

    println!();
    println!("variables left behind: {}", session.workspace().len());
}

//! Text rendering of bindings: the echo shown after every assignment
//! or bare name, and the workspace save format.

use std::fmt::Write as _;

use crate::value::{Number, Value};
use crate::workspace::Workspace;

/// Indent before every matrix cell in display output.
const CELL_SPACER: &str = "    ";

/// Format a binding the way a bare name or assignment echoes it.
///
/// ```
/// use matlabette::{Value, format_binding};
///
/// assert_eq!(format_binding("a", &Value::Scalar(5.0)), "\na = 5\n");
/// ```
#[must_use]
pub fn format_binding(name: &str, value: &Value) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(name);
    out.push_str(" =");

    match value {
        Value::Scalar(x) => {
            let _ = write!(out, " {}", Number(*x));
        }
        Value::Matrix(m) if m.is_empty() => out.push_str(" []"),
        Value::Matrix(m) => {
            out.push('\n');
            for row in m.iter_rows() {
                for &cell in row {
                    let _ = write!(out, "{CELL_SPACER}{}", Number(cell));
                }
                out.push('\n');
            }
        }
    }

    out.push('\n');
    out
}

/// Serialize every binding as `name = value` lines, sorted by name.
///
/// Each line is itself a valid assignment statement, so
/// [`Workspace::from_text`] reads it back through the parser.
#[must_use]
pub fn format_workspace(workspace: &Workspace) -> String {
    let mut out = String::new();
    for (name, value) in workspace.iter() {
        let _ = writeln!(out, "{name} = {value}");
    }
    out
}

//! Workspace text serialization and loading.

mod common;

use common::{matrix, run_lines};
use matlabette::{Error, RuntimeError, Session, Value, Workspace, format_workspace};

#[test]
fn save_format() {
    let mut s = Session::new();
    run_lines(
        &mut s,
        &["x = 1.5", "m = [1 2; 3 4]", "e = []", "r = [-1 0.25]"],
    );
    assert_eq!(
        s.workspace().to_text(),
        "e = []\nm = [1 2; 3 4]\nr = [-1 0.25]\nx = 1.5\n"
    );
    assert_eq!(format_workspace(s.workspace()), s.workspace().to_text());
}

#[test]
fn session_roundtrip() {
    let mut s = Session::new();
    run_lines(
        &mut s,
        &["a = [1 2; 3 4]", "b = inv(a)", "c = a' - 10", "d = 1 / 3", "a * b"],
    );
    let text = s.workspace().to_text();
    let loaded = Workspace::from_text(&text).unwrap();
    assert_eq!(&loaded, s.workspace());
}

#[test]
fn loaded_workspace_is_usable() {
    let ws = Workspace::from_text("a = [1 2]\nb = 3\n").unwrap();
    let mut s = Session::new();
    *s.workspace_mut() = ws;
    assert_eq!(run_lines(&mut s, &["a * b"]), "\nans =\n    3    6\n\n");
}

#[test]
fn load_column_vector() {
    let ws = Workspace::from_text("v = [1; -2; 3]").unwrap();
    assert_eq!(ws.get("v"), Some(&matrix(&[&[1.0], &[-2.0], &[3.0]])));
}

#[test]
fn load_later_lines_win() {
    let ws = Workspace::from_text("a = 1\na = 2\n").unwrap();
    assert_eq!(ws.get("a"), Some(&Value::Scalar(2.0)));
}

#[test]
fn load_error_has_line_number() {
    let err = Workspace::from_text("a = 1\n\nb = c\n").unwrap_err();
    let Error::Workspace { line, source } = err else {
        panic!("expected workspace error");
    };
    assert_eq!(line, 3);
    assert_eq!(
        *source,
        Error::Runtime(RuntimeError::UndefinedVariable("c".to_string()))
    );
}

#[test]
fn load_empty_text() {
    assert!(Workspace::from_text("").unwrap().is_empty());
}

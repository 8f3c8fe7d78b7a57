#![allow(dead_code)]

use matlabette::{Error, Matrix, Session, Value};

/// Run each line in order, panicking on the first failure, and return
/// the output of the last one.
pub fn run_lines(session: &mut Session, lines: &[&str]) -> String {
    let mut last = String::new();
    for line in lines {
        last = session
            .evaluate(line)
            .unwrap_or_else(|e| panic!("`{line}` failed: {e}"))
            .unwrap_or_default();
    }
    last
}

/// Evaluate one line in a fresh session and return the value of `ans`.
pub fn eval_ans(line: &str) -> Result<Value, Error> {
    let mut session = Session::new();
    session.evaluate(line)?;
    Ok(session
        .workspace()
        .get("ans")
        .cloned()
        .expect("ans should be bound after a successful expression"))
}

/// Build a matrix value from nested slices.
pub fn matrix(rows: &[&[f64]]) -> Value {
    Matrix::from_rows(rows.iter().map(|r| r.to_vec()).collect())
        .expect("rows should be rectangular")
        .into()
}

//! Statement evaluation against a persistent [`Workspace`].

use crate::ast::{Expr, Statement};
use crate::builtin;
use crate::formatter::format_binding;
use crate::lexer::tokenize;
use crate::operators;
use crate::parser::parse;
use crate::value::{Matrix, Value};
use crate::workspace::Workspace;
use crate::{Error, RuntimeError};

/// Reserved names backed by the host, such as `help` or `save`.
///
/// Commands run when their name is evaluated as a bare statement and
/// can never be assigned to.
pub trait Commands {
    /// Whether `name` is a command.
    fn is_reserved(&self, name: &str) -> bool;

    /// Run the command `name` and return the text to display.
    fn invoke(&mut self, name: &str, workspace: &mut Workspace) -> Result<String, RuntimeError>;
}

/// Host without any commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCommands;

impl Commands for NoCommands {
    fn is_reserved(&self, _name: &str) -> bool {
        false
    }

    fn invoke(&mut self, name: &str, _workspace: &mut Workspace) -> Result<String, RuntimeError> {
        Err(RuntimeError::UndefinedVariable(name.to_string()))
    }
}

/// Interpreter state for one user session.
///
/// Evaluation takes `&mut self`; share a session between threads
/// behind a `Mutex`.
#[derive(Debug, Default)]
pub struct Session<C = NoCommands> {
    workspace: Workspace,
    commands: C,
}

impl Session {
    /// Session without commands.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Commands> Session<C> {
    #[must_use]
    pub fn with_commands(commands: C) -> Self {
        Self {
            workspace: Workspace::new(),
            commands,
        }
    }

    #[must_use]
    pub const fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub const fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }

    #[must_use]
    pub const fn commands(&self) -> &C {
        &self.commands
    }

    /// Whether `name` cannot be assigned: a command or a builtin.
    #[must_use]
    pub fn is_reserved(&self, name: &str) -> bool {
        self.commands.is_reserved(name) || builtin::is_builtin(name)
    }

    /// Tokenize, parse and run one line.
    ///
    /// Returns `None` for blank lines. On error the workspace is left
    /// exactly as it was.
    pub fn evaluate(&mut self, line: &str) -> Result<Option<String>, Error> {
        let statement = parse(&tokenize(line))?;
        Ok(self.execute(&statement)?)
    }

    /// Run an already parsed statement.
    pub fn execute(&mut self, statement: &Statement) -> Result<Option<String>, RuntimeError> {
        log::debug!("executing `{statement}`");
        match statement {
            Statement::Empty => Ok(None),
            Statement::Show(name) => self.show(name).map(Some),
            Statement::Assign { target, value } => self.assign(target, value).map(Some),
        }
    }

    fn assign(&mut self, target: &str, value: &Expr) -> Result<String, RuntimeError> {
        if self.is_reserved(target) {
            return Err(RuntimeError::Reserved(target.to_string()));
        }
        let value = eval(value, &self.workspace)?;
        log::debug!("binding {target} to {value}");
        self.workspace.set(target, value);
        self.show(target)
    }

    /// Run a command, or format a variable for display.
    pub fn show(&mut self, name: &str) -> Result<String, RuntimeError> {
        if self.commands.is_reserved(name) {
            log::debug!("invoking command {name}");
            return self.commands.invoke(name, &mut self.workspace);
        }
        self.workspace
            .get(name)
            .map(|value| format_binding(name, value))
            .ok_or_else(|| RuntimeError::UndefinedVariable(name.to_string()))
    }
}

/// Evaluate an expression against read-only bindings.
pub fn eval(expr: &Expr, workspace: &Workspace) -> Result<Value, RuntimeError> {
    match expr {
        Expr::Number(x) => Ok(Value::Scalar(*x)),
        Expr::Constant(c) => Ok(Value::Scalar(c.value())),
        Expr::Identifier(name) => workspace
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedVariable(name.clone())),
        Expr::Matrix(rows) => eval_matrix(rows, workspace),
        Expr::Unary { op, operand } => Ok(operators::unary(*op, &eval(operand, workspace)?)),
        Expr::Binary { op, lhs, rhs } => {
            let lhs = eval(lhs, workspace)?;
            let rhs = eval(rhs, workspace)?;
            operators::binary(*op, &lhs, &rhs)
        }
        Expr::Call { function, args } => {
            let args = args
                .iter()
                .map(|arg| eval(arg, workspace))
                .collect::<Result<Vec<_>, _>>()?;
            function.call(&args)
        }
    }
}

fn eval_matrix(rows: &[Vec<Expr>], workspace: &Workspace) -> Result<Value, RuntimeError> {
    let mut grid = Vec::with_capacity(rows.len());
    for row in rows {
        let mut cells = Vec::with_capacity(row.len());
        for cell in row {
            match eval(cell, workspace)? {
                Value::Scalar(x) => cells.push(x),
                Value::Matrix(_) => return Err(RuntimeError::NestedArray),
            }
        }
        grid.push(cells);
    }
    Ok(Matrix::from_rows(grid)?.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Help {
        calls: usize,
    }

    impl Commands for Help {
        fn is_reserved(&self, name: &str) -> bool {
            name == "help"
        }

        fn invoke(&mut self, _name: &str, _ws: &mut Workspace) -> Result<String, RuntimeError> {
            self.calls += 1;
            Ok("usage".to_string())
        }
    }

    fn run(session: &mut Session<impl Commands>, line: &str) -> String {
        session
            .evaluate(line)
            .unwrap_or_else(|e| panic!("{line}: {e}"))
            .unwrap_or_default()
    }

    #[test]
    fn assignment_echoes() {
        let mut s = Session::new();
        assert_eq!(run(&mut s, "a = 2"), "\na = 2\n");
        assert_eq!(run(&mut s, "a + 3"), "\nans = 5\n");
    }

    #[test]
    fn show_variable() {
        let mut s = Session::new();
        run(&mut s, "x = []");
        assert_eq!(run(&mut s, "x"), "\nx = []\n");
    }

    #[test]
    fn empty_line_has_no_output() {
        let mut s = Session::new();
        assert_eq!(s.evaluate("").unwrap(), None);
    }

    #[test]
    fn undefined_variable() {
        let mut s = Session::new();
        let err = s.evaluate("y + 1").unwrap_err();
        assert_eq!(err.to_string(), "y is not defined");
        assert!(s.workspace().is_empty());
    }

    #[test]
    fn failed_statement_keeps_previous_binding() {
        let mut s = Session::new();
        run(&mut s, "a = 1");
        assert!(s.evaluate("a = [1 2] * [3 4]").is_err());
        assert_eq!(s.workspace().get("a"), Some(&Value::Scalar(1.0)));
    }

    #[test]
    fn nested_array_rejected() {
        let mut s = Session::new();
        run(&mut s, "v = [1 2]");
        let err = s.evaluate("[v 3]").unwrap_err();
        assert_eq!(err, Error::Runtime(RuntimeError::NestedArray));
        assert!(!s.workspace().contains("ans"));
    }

    #[test]
    fn ragged_rows_rejected() {
        let mut s = Session::new();
        let err = s.evaluate("m = [1, 2; 3]").unwrap_err();
        assert_eq!(err, Error::Runtime(RuntimeError::UnequalColumns));
        assert!(!s.workspace().contains("m"));
    }

    #[test]
    fn command_invoked_on_show() {
        let mut s = Session::with_commands(Help { calls: 0 });
        assert_eq!(run(&mut s, "help"), "usage");
        assert_eq!(s.commands().calls, 1);
    }

    #[test]
    fn command_name_is_reserved() {
        let mut s = Session::with_commands(Help { calls: 0 });
        let err = s.evaluate("help = 1").unwrap_err();
        assert_eq!(err.to_string(), "help is reserved");
        assert!(s.workspace().is_empty());
        assert_eq!(s.commands().calls, 0);
    }

    #[test]
    fn builtin_name_is_reserved() {
        let mut s = Session::new();
        let err = s.evaluate("pi = 3").unwrap_err();
        assert_eq!(err, Error::Runtime(RuntimeError::Reserved("pi".to_string())));
    }

    #[test]
    fn eval_is_pure() {
        let mut ws = Workspace::new();
        ws.set("k", Value::Scalar(4.0));
        let Statement::Assign { value, .. } = parse(&tokenize("k * -k")).unwrap() else {
            panic!("expected assignment");
        };
        assert_eq!(eval(&value, &ws).unwrap(), Value::Scalar(-16.0));
        assert_eq!(ws.len(), 1);
    }
}

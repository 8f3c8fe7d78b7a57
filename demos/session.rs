//! Evaluate a few statements and save the resulting workspace.

use matlabette::{Session, Workspace};

fn main() {
    let mut session = Session::new();

    for line in [
        "a = [1 2; 3 4]",
        "b = a'",
        "c = a * b",
        "d = inv(a)",
        "a .* 2 - 1",
        "e = eye(2) ./ 4",
    ] {
        match session.evaluate(line) {
            Ok(Some(output)) => print!("{output}"),
            Ok(None) => {}
            Err(e) => eprintln!("{line}: {e}"),
        }
    }

    let text = session.workspace().to_text();
    println!("\n--- workspace ---\n{text}");

    let reloaded = Workspace::from_text(&text).expect("saved text should load");
    assert_eq!(&reloaded, session.workspace());
}

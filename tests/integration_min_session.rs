// Minimal integration test that drives the compiled binary through a PTY.
// This exercises the real event loop and crossterm input handling across
// the dashboard, intro, quiz, and results screens without relying on
// internal modules.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Marked Unix-only and ignored by default to avoid CI/platform issues.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn minimal_practice_session_completes_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    // Resolve path to compiled binary (debug build during tests)
    let bin = assert_cmd::cargo::cargo_bin("mathdrill");
    let cmd = format!(
        "{} --practice --seed 7 --choice-questions 2 --statement-groups 1 --fill-questions 1",
        bin.display()
    );

    // Spawn the TUI inside a pseudo terminal
    let mut p = spawn(cmd)?;

    // Give the app a moment to initialize the terminal/alternate screen
    std::thread::sleep(Duration::from_millis(300));

    // Dashboard: start the selected lesson (practice mode is never gated)
    p.send("\r")?;
    std::thread::sleep(Duration::from_millis(100));

    // Intro: fill the three identity fields and begin
    p.send("An\t7A\tRiverside\r")?;
    std::thread::sleep(Duration::from_millis(100));

    // Quiz: answer the first question, then hand in via the confirm modal
    p.send("1")?;
    p.send("\x1b")?; // ESC opens the confirmation
    std::thread::sleep(Duration::from_millis(100));
    p.send("y")?;
    std::thread::sleep(Duration::from_millis(100));

    // Results: finish back to the dashboard, then quit
    p.send("\r")?;
    std::thread::sleep(Duration::from_millis(100));
    p.send("q")?;

    // Wait for the program to terminate cleanly
    p.expect(Eof)?;
    Ok(())
}

// Minimal integration test that drives the compiled binary through a PTY.
// This exercises the real event loop and crossterm input handling against
// the bundled sample sheet, so no network access is needed.
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
fn sample_session_answers_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let config = dir.path().join("config.json");

    let bin = assert_cmd::cargo::cargo_bin("sheetquiz");
    let cmd = format!(
        "{} --sample -n 2 --config {}",
        bin.display(),
        config.display()
    );

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(200));

    // start the highlighted (only) category and wait for the load
    p.send("\r")?;
    std::thread::sleep(Duration::from_millis(300));

    // answer both questions and move on to the results
    for _ in 0..2 {
        p.send("1")?;
        std::thread::sleep(Duration::from_millis(50));
        p.send("\r")?;
        std::thread::sleep(Duration::from_millis(50));
    }

    p.send("q")?;
    p.expect(Eof)?;
    Ok(())
}

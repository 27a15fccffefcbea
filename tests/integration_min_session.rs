// Drives the compiled binary through a PTY so the real crossterm event loop
// and terminal setup/teardown run end to end.
//
// Unix-only and ignored by default since it needs a pseudo terminal.
// Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};
use tempfile::tempdir;

#[test]
#[ignore]
fn open_checklist_then_quit() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let bin = assert_cmd::cargo::cargo_bin("luminate");
    let cmd = format!(
        "{} --silent --store {}",
        bin.display(),
        dir.path().join("progress.db").display()
    );

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(200));

    // checklist, back, quit
    p.send("v")?;
    std::thread::sleep(Duration::from_millis(100));
    p.send("b")?;
    std::thread::sleep(Duration::from_millis(100));
    p.send("q")?;

    p.expect(Eof)?;
    Ok(())
}

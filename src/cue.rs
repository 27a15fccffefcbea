use std::io::{self, Write};

use thiserror::Error;
use tracing::{debug, warn};

/// Audible signals played during a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Cue {
    /// Start whistle: session start and end of a rest period
    Start,
    /// Rest whistle
    Rest,
}

#[derive(Debug, Error)]
pub enum CueError {
    #[error("audio output unavailable: {0}")]
    Output(#[from] io::Error),
}

pub trait CuePlayer {
    fn play(&mut self, cue: Cue) -> Result<(), CueError>;
}

/// Rings the terminal bell: once for start, twice for rest.
pub struct TerminalBell<W: Write> {
    out: W,
}

impl TerminalBell<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> CuePlayer for TerminalBell<W> {
    fn play(&mut self, cue: Cue) -> Result<(), CueError> {
        let bells: &[u8] = match cue {
            Cue::Start => b"\x07",
            Cue::Rest => b"\x07\x07",
        };
        self.out.write_all(bells)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Plays nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl CuePlayer for Silent {
    fn play(&mut self, _cue: Cue) -> Result<(), CueError> {
        Ok(())
    }
}

/// Fire and forget: failures are logged and otherwise ignored.
pub fn play_cue(player: &mut dyn CuePlayer, cue: Cue) {
    match player.play(cue) {
        Ok(()) => debug!(%cue, "played cue"),
        Err(err) => warn!(%cue, %err, "cue playback failed"),
    }
}

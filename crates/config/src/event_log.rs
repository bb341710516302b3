//! Landing log - one JSON object per landed piece
//!
//! Records are appended as JSON lines so a run can be replayed or analysed
//! offline.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use body_tetris_core::{LandingEvent, LandingOutcome};

/// Serialisable summary of a [`LandingEvent`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingRecord {
    pub episode: u32,
    pub piece: u32,
    pub kind: String,
    pub x: i32,
    pub y: i32,
    pub rotation: i32,
    /// `cascade` or `bomb`
    pub event: String,
    pub score_gained: u32,
    pub bodies: Vec<String>,
    pub removed: usize,
    /// Pieces destroyed by a bomb
    #[serde(default)]
    pub destroyed: usize,
    pub fallen: usize,
    pub rounds: u32,
    pub total_score: u32,
    pub game_over: bool,
}

impl From<&LandingEvent> for LandingRecord {
    fn from(event: &LandingEvent) -> Self {
        let (kind_of_event, destroyed) = match &event.outcome {
            LandingOutcome::Locked(_) => ("cascade", 0),
            LandingOutcome::Detonated(bomb) => ("bomb", bomb.destroyed.len()),
        };
        let cascade = event.outcome.cascade();

        Self {
            episode: event.episode_id,
            piece: event.piece_index,
            kind: event.piece.kind.as_str().to_string(),
            x: event.piece.pos.x,
            y: event.piece.pos.y,
            rotation: event.piece.rotation.degrees(),
            event: kind_of_event.to_string(),
            score_gained: event.outcome.score(),
            bodies: cascade.matches.iter().map(|m| m.body.clone()).collect(),
            removed: cascade.removed(),
            destroyed,
            fallen: cascade.fallen,
            rounds: cascade.rounds,
            total_score: event.total_score,
            game_over: event.game_over,
        }
    }
}

/// Append-only JSON-lines writer
pub struct EventLog<W: Write> {
    out: W,
    buf: Vec<u8>,
}

impl EventLog<BufWriter<File>> {
    /// Open (or create) a log file for appending
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> EventLog<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            buf: Vec::with_capacity(512),
        }
    }

    pub fn append(&mut self, record: &LandingRecord) -> io::Result<()> {
        self.buf.clear();
        serde_json::to_writer(&mut self.buf, record)?;
        self.buf.push(b'\n');
        self.out.write_all(&self.buf)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

//! PGN game-record parser.
//!
//! Converts a multi-game PGN export into [`GameRecord`]s, one per game block,
//! in input order. Only tag metadata is kept; move text is scanned just far
//! enough to know that the block is complete.

mod headers;
mod visitor;

use gambit_types::game::GameRecord;
use pgn_reader::Reader;
use tracing::{debug, warn};

use visitor::RecordVisitor;

/// Parse every complete game block in `text`.
///
/// Blocks without any move text are dropped. Empty input yields an empty
/// vector; parsing never fails.
pub fn parse_games(text: &str) -> Vec<GameRecord> {
    let mut reader = Reader::new(text.as_bytes());
    let mut visitor = RecordVisitor;
    let mut records = Vec::new();
    let mut block_index = 0usize;

    loop {
        match reader.read_game(&mut visitor) {
            Ok(Some(Some(record))) => records.push(record),
            Ok(Some(None)) => debug!("Dropping PGN block {} without move text", block_index),
            Ok(None) => break,
            Err(err) => {
                warn!(
                    "Stopping PGN scan at block {}: {}; keeping {} parsed games",
                    block_index,
                    err,
                    records.len()
                );
                break;
            }
        }
        block_index += 1;
    }

    records
}

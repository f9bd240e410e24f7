use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::time_control::TimeControlCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    White,
    Black,
}

impl PlayerColor {
    pub const ALL: [PlayerColor; 2] = [PlayerColor::White, PlayerColor::Black];
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerColor::White => f.write_str("White"),
            PlayerColor::Black => f.write_str("Black"),
        }
    }
}

/// Final result as recorded in the `Result` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameResult {
    WhiteWin,
    BlackWin,
    Draw,
    #[default]
    Unknown,
}

impl GameResult {
    /// Map standard result notation; anything else (including `*`) is `Unknown`.
    pub fn from_notation(raw: &str) -> Self {
        match raw.trim() {
            "1-0" => GameResult::WhiteWin,
            "0-1" => GameResult::BlackWin,
            "1/2-1/2" => GameResult::Draw,
            _ => GameResult::Unknown,
        }
    }

    /// The result seen from one side of the board.
    pub fn outcome_for(self, color: PlayerColor) -> Option<PlayerOutcome> {
        match (self, color) {
            (GameResult::WhiteWin, PlayerColor::White) | (GameResult::BlackWin, PlayerColor::Black) => {
                Some(PlayerOutcome::Win)
            }
            (GameResult::WhiteWin, PlayerColor::Black) | (GameResult::BlackWin, PlayerColor::White) => {
                Some(PlayerOutcome::Loss)
            }
            (GameResult::Draw, _) => Some(PlayerOutcome::Draw),
            (GameResult::Unknown, _) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerOutcome {
    Win,
    Draw,
    Loss,
}

/// One parsed game. Only the metadata needed for the dashboard is kept.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameRecord {
    pub white: String,
    pub black: String,
    pub result: GameResult,
    pub time_control: TimeControlCategory,
    pub opening: Option<String>,
    pub eco: Option<String>,
    /// `UTCDate`, falling back to `Date`.
    pub utc_date: Option<NaiveDate>,
}

impl GameRecord {
    /// Which side `handle` played, compared case-insensitively.
    pub fn player_color(&self, handle: &str) -> Option<PlayerColor> {
        let handle = handle.trim();
        if self.white.eq_ignore_ascii_case(handle) {
            Some(PlayerColor::White)
        } else if self.black.eq_ignore_ascii_case(handle) {
            Some(PlayerColor::Black)
        } else {
            None
        }
    }
}

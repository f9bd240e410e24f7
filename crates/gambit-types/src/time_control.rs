use std::fmt;

use serde::{Deserialize, Serialize};

/// Seconds of estimated game length per increment second (Lichess convention).
const INCREMENT_WEIGHT: u64 = 40;

/// Pacing category of a game, derived from its `TimeControl` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeControlCategory {
    UltraBullet,
    Bullet,
    Blitz,
    Rapid,
    Classical,
    #[default]
    Other,
}

impl TimeControlCategory {
    pub const ALL: [TimeControlCategory; 6] = [
        TimeControlCategory::UltraBullet,
        TimeControlCategory::Bullet,
        TimeControlCategory::Blitz,
        TimeControlCategory::Rapid,
        TimeControlCategory::Classical,
        TimeControlCategory::Other,
    ];

    /// Categories with a rating pool of their own on Lichess.
    pub const RATED: [TimeControlCategory; 5] = [
        TimeControlCategory::UltraBullet,
        TimeControlCategory::Bullet,
        TimeControlCategory::Blitz,
        TimeControlCategory::Rapid,
        TimeControlCategory::Classical,
    ];

    /// Classify a raw `TimeControl` tag value such as `180+2`.
    ///
    /// The estimate is `base + 40 * increment` seconds. Correspondence games
    /// (`-`), missing values and anything unparseable fall into `Other`.
    pub fn from_tag(raw: &str) -> Self {
        let raw = raw.trim();
        let (base, increment) = match raw.split_once('+') {
            Some((base, increment)) => (base.trim(), increment.trim()),
            None => (raw, "0"),
        };
        let (Ok(base), Ok(increment)) = (base.parse::<u64>(), increment.parse::<u64>()) else {
            return Self::Other;
        };
        let Some(estimated) = increment
            .checked_mul(INCREMENT_WEIGHT)
            .and_then(|weighted| weighted.checked_add(base))
        else {
            return Self::Other;
        };

        match estimated {
            0..=29 => Self::UltraBullet,
            30..=179 => Self::Bullet,
            180..=479 => Self::Blitz,
            480..=1499 => Self::Rapid,
            _ => Self::Classical,
        }
    }

    /// Lichess `perfType` identifier, if the category has one.
    pub fn perf_type(self) -> Option<&'static str> {
        match self {
            Self::UltraBullet => Some("ultraBullet"),
            Self::Bullet => Some("bullet"),
            Self::Blitz => Some("blitz"),
            Self::Rapid => Some("rapid"),
            Self::Classical => Some("classical"),
            Self::Other => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::UltraBullet => "UltraBullet",
            Self::Bullet => "Bullet",
            Self::Blitz => "Blitz",
            Self::Rapid => "Rapid",
            Self::Classical => "Classical",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for TimeControlCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

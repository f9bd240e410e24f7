use serde::{Deserialize, Serialize};

use crate::{game::PlayerColor, time_control::TimeControlCategory};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningCount {
    pub name: String,
    /// ECO code of the first game seen with this opening.
    pub eco: Option<String>,
    pub games: u32,
}

/// Counters for one (time control, color) partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionStats {
    /// Every game in the partition, including those with an unknown result.
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    /// Ranked by frequency, ties in first-seen order.
    pub openings: Vec<OpeningCount>,
}

impl PartitionStats {
    pub fn decided(&self) -> u32 {
        self.wins + self.draws + self.losses
    }

    pub fn win_rate(&self) -> Option<f64> {
        percentage(self.wins, self.played)
    }

    pub fn draw_rate(&self) -> Option<f64> {
        percentage(self.draws, self.played)
    }

    pub fn loss_rate(&self) -> Option<f64> {
        percentage(self.losses, self.played)
    }

    fn absorb(&mut self, other: &PartitionStats) {
        self.played += other.played;
        self.wins += other.wins;
        self.draws += other.draws;
        self.losses += other.losses;
    }
}

static EMPTY_STATS: PartitionStats = PartitionStats {
    played: 0,
    wins: 0,
    draws: 0,
    losses: 0,
    openings: Vec::new(),
};

fn percentage(part: u32, whole: u32) -> Option<f64> {
    (whole > 0).then(|| f64::from(part) / f64::from(whole) * 100.0)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub category: TimeControlCategory,
    pub color: PlayerColor,
    pub stats: PartitionStats,
}

/// Aggregate over a sequence of games, keyed by (time control, player color).
///
/// `empty` seeds every (category, color) pair, so a summary over no games
/// reports zeros rather than missing rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub top_n: usize,
    partitions: Vec<Partition>,
}

impl MetricsSummary {
    pub fn empty(top_n: usize) -> Self {
        let partitions = TimeControlCategory::ALL
            .iter()
            .flat_map(|&category| {
                PlayerColor::ALL.iter().map(move |&color| Partition {
                    category,
                    color,
                    stats: PartitionStats::default(),
                })
            })
            .collect();
        Self { top_n, partitions }
    }

    pub fn partition(&self, category: TimeControlCategory, color: PlayerColor) -> &PartitionStats {
        self.partitions
            .iter()
            .find(|p| p.category == category && p.color == color)
            .map(|p| &p.stats)
            .unwrap_or(&EMPTY_STATS)
    }

    pub fn partition_mut(
        &mut self,
        category: TimeControlCategory,
        color: PlayerColor,
    ) -> &mut PartitionStats {
        let idx = match self
            .partitions
            .iter()
            .position(|p| p.category == category && p.color == color)
        {
            Some(idx) => idx,
            None => {
                self.partitions.push(Partition {
                    category,
                    color,
                    stats: PartitionStats::default(),
                });
                self.partitions.len() - 1
            }
        };
        &mut self.partitions[idx].stats
    }

    pub fn partitions(&self) -> impl Iterator<Item = &Partition> {
        self.partitions.iter()
    }

    /// Both colors of one category summed; openings are not merged.
    pub fn category_totals(&self, category: TimeControlCategory) -> PartitionStats {
        let mut totals = PartitionStats::default();
        for color in PlayerColor::ALL {
            totals.absorb(self.partition(category, color));
        }
        totals
    }

    /// All partitions summed; openings are not merged.
    pub fn totals(&self) -> PartitionStats {
        let mut totals = PartitionStats::default();
        for partition in &self.partitions {
            totals.absorb(&partition.stats);
        }
        totals
    }
}

/// Lifetime counters from the Lichess per-performance statistics endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerfCounts {
    pub all: u32,
    pub win: u32,
    pub draw: u32,
    pub loss: u32,
}

impl PerfCounts {
    pub fn win_rate(&self) -> Option<f64> {
        percentage(self.win, self.all)
    }
}

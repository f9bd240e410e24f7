//! Metrics aggregation over parsed game records.

mod tally;

use chrono::NaiveDate;
use gambit_types::{
    game::{GameRecord, PlayerColor, PlayerOutcome},
    metrics::MetricsSummary,
    time_control::TimeControlCategory,
};
use tracing::debug;

pub use tally::OpeningTally;

/// Group `records` by (time control, `handle`'s color) and count results and
/// openings, keeping the `top_n` most played openings per partition.
///
/// Records where `handle` played neither side are skipped.
pub fn aggregate(records: &[GameRecord], handle: &str, top_n: usize) -> MetricsSummary {
    let mut summary = MetricsSummary::empty(top_n);
    let mut tallies: Vec<(TimeControlCategory, PlayerColor, OpeningTally)> = Vec::new();
    let mut skipped = 0usize;

    for record in records {
        let Some(color) = record.player_color(handle) else {
            skipped += 1;
            continue;
        };

        let stats = summary.partition_mut(record.time_control, color);
        stats.played += 1;
        match record.result.outcome_for(color) {
            Some(PlayerOutcome::Win) => stats.wins += 1,
            Some(PlayerOutcome::Draw) => stats.draws += 1,
            Some(PlayerOutcome::Loss) => stats.losses += 1,
            None => {}
        }

        if let Some(opening) = record.opening.as_deref() {
            tally_for(&mut tallies, record.time_control, color)
                .record(opening, record.eco.as_deref());
        }
    }

    if skipped > 0 {
        debug!("Skipped {} games not played by '{}'", skipped, handle);
    }

    for (category, color, tally) in tallies {
        summary.partition_mut(category, color).openings = tally.top(top_n);
    }

    summary
}

/// Earliest and latest game date among `records`, ignoring undated games.
pub fn date_range(records: &[GameRecord]) -> Option<(NaiveDate, NaiveDate)> {
    records
        .iter()
        .filter_map(|record| record.utc_date)
        .fold(None, |range, date| match range {
            None => Some((date, date)),
            Some((first, last)) => Some((first.min(date), last.max(date))),
        })
}

fn tally_for(
    tallies: &mut Vec<(TimeControlCategory, PlayerColor, OpeningTally)>,
    category: TimeControlCategory,
    color: PlayerColor,
) -> &mut OpeningTally {
    let idx = match tallies
        .iter()
        .position(|(c, p, _)| *c == category && *p == color)
    {
        Some(idx) => idx,
        None => {
            tallies.push((category, color, OpeningTally::default()));
            tallies.len() - 1
        }
    };
    &mut tallies[idx].2
}

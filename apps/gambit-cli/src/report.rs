use std::fmt::Write;

use gambit_dashboard::{DashboardReport, PerfSnapshot};
use gambit_types::{game::PlayerColor, metrics::PartitionStats, time_control::TimeControlCategory};

pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{rate:.1}%"),
        None => "-".to_string(),
    }
}

/// Table cells for one lifetime row: mode, games, wins, draws, losses, win %.
pub fn lifetime_cells(snapshot: &PerfSnapshot) -> [String; 6] {
    let label = snapshot.category.label().to_string();
    match snapshot.counts {
        Some(counts) => [
            label,
            counts.all.to_string(),
            counts.win.to_string(),
            counts.draw.to_string(),
            counts.loss.to_string(),
            format_rate(counts.win_rate()),
        ],
        None => [
            label,
            "-".into(),
            "-".into(),
            "-".into(),
            "-".into(),
            "-".into(),
        ],
    }
}

pub fn partition_lines(stats: &PartitionStats) -> Vec<String> {
    let mut lines = vec![format!(
        "Played {}  W/D/L {}/{}/{}",
        stats.played, stats.wins, stats.draws, stats.losses
    )];
    if stats.openings.is_empty() {
        lines.push("No openings available".to_string());
    } else {
        lines.extend(
            stats
                .openings
                .iter()
                .enumerate()
                .map(|(idx, opening)| match &opening.eco {
                    Some(eco) => format!("{}. {} {} ({})", idx + 1, eco, opening.name, opening.games),
                    None => format!("{}. {} ({})", idx + 1, opening.name, opening.games),
                }),
        );
    }
    lines
}

/// Game count plus the dates of the first and last parsed game.
pub fn games_parsed_line(report: &DashboardReport) -> String {
    match report.period {
        Some((first, last)) => format!(
            "{} games parsed ({} to {})",
            report.games_parsed,
            first.format("%Y-%m-%d"),
            last.format("%Y-%m-%d")
        ),
        None => format!("{} games parsed", report.games_parsed),
    }
}

/// Plain-text rendering of a report for non-interactive output.
pub fn render_text(report: &DashboardReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Lichess game metrics for {} ({})",
        report.username,
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    if let Some(err) = &report.fetch_error {
        let _ = writeln!(out, "Failed to retrieve games: {err}");
    }
    let _ = writeln!(out, "{}", games_parsed_line(report));

    if report.lifetime.iter().any(|s| s.counts.is_some()) {
        let _ = writeln!(out, "\nAll time");
        let _ = writeln!(
            out,
            "{:<12} {:>7} {:>7} {:>7} {:>7} {:>7}",
            "Mode", "Games", "Wins", "Draws", "Losses", "Win %"
        );
        for snapshot in &report.lifetime {
            let [mode, games, wins, draws, losses, rate] = lifetime_cells(snapshot);
            let _ = writeln!(
                out,
                "{mode:<12} {games:>7} {wins:>7} {draws:>7} {losses:>7} {rate:>7}"
            );
        }
    }

    let mut any_games = false;
    for category in TimeControlCategory::ALL {
        if report.summary.category_totals(category).played == 0 {
            continue;
        }
        any_games = true;
        for color in PlayerColor::ALL {
            let stats = report.summary.partition(category, color);
            let _ = writeln!(
                out,
                "\n{category} as {color} (win {})",
                format_rate(stats.win_rate())
            );
            for line in partition_lines(stats) {
                let _ = writeln!(out, "  {line}");
            }
        }
    }
    if !any_games {
        let _ = writeln!(out, "\nNo games found for {}", report.username);
    }

    out
}

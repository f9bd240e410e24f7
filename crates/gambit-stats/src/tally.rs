use std::collections::HashMap;

use gambit_types::metrics::OpeningCount;

/// Opening frequency counter that remembers first-seen order.
#[derive(Debug, Clone, Default)]
pub struct OpeningTally {
    counts: Vec<OpeningCount>,
    index: HashMap<String, usize>,
}

impl OpeningTally {
    pub fn record(&mut self, name: &str, eco: Option<&str>) {
        match self.index.get(name) {
            Some(&idx) => {
                let count = &mut self.counts[idx];
                count.games += 1;
                if count.eco.is_none() {
                    count.eco = eco.map(str::to_string);
                }
            }
            None => {
                self.index.insert(name.to_string(), self.counts.len());
                self.counts.push(OpeningCount {
                    name: name.to_string(),
                    eco: eco.map(str::to_string),
                    games: 1,
                });
            }
        }
    }

    /// The `n` most frequent openings. The sort is stable, so equal counts
    /// stay in first-seen order.
    pub fn top(mut self, n: usize) -> Vec<OpeningCount> {
        self.counts.sort_by(|a, b| b.games.cmp(&a.games));
        self.counts.truncate(n);
        self.counts
    }
}

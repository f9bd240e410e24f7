use chrono::NaiveDate;
use gambit_types::{
    game::{GameRecord, GameResult},
    time_control::TimeControlCategory,
};
use pgn_reader::RawTag;
use tracing::debug;

/// Tag values of one game block. The first occurrence of a tag wins, except
/// for the identity tags in [`HeaderFields::set_known_tag`].
#[derive(Debug, Default)]
pub(crate) struct HeaderFields {
    event_seen: bool,
    site_seen: bool,
    white: String,
    black: String,
    result: String,
    utc_date: String,
    date: String,
    eco: String,
    opening: String,
    time_control: String,
}

impl HeaderFields {
    /// Store a tag value. A second `Event`, `Site`, `White` or `Black` means
    /// the previous block ended without move text and pgn-reader ran the two
    /// tag sections together; everything collected so far is discarded.
    pub(crate) fn set_known_tag(&mut self, key: &[u8], value: RawTag<'_>) {
        if self.repeats_identity_tag(key) {
            debug!(
                "Dropping tags-only block (white '{}', black '{}')",
                self.white, self.black
            );
            *self = HeaderFields::default();
        }

        let slot: &mut String = match key {
            b"Event" => {
                self.event_seen = true;
                return;
            }
            b"Site" => {
                self.site_seen = true;
                return;
            }
            b"White" => &mut self.white,
            b"Black" => &mut self.black,
            b"Result" => &mut self.result,
            b"UTCDate" => &mut self.utc_date,
            b"Date" => &mut self.date,
            b"ECO" => &mut self.eco,
            b"Opening" => &mut self.opening,
            b"TimeControl" => &mut self.time_control,
            _ => return,
        };

        if !slot.is_empty() {
            return;
        }

        *slot = value.decode_utf8_lossy().trim().to_string();
    }

    fn repeats_identity_tag(&self, key: &[u8]) -> bool {
        match key {
            b"Event" => self.event_seen,
            b"Site" => self.site_seen,
            b"White" => !self.white.is_empty(),
            b"Black" => !self.black.is_empty(),
            _ => false,
        }
    }

    /// Build the record. `result_marker` is the token that ended the move
    /// text and only stands in for a missing `Result` tag.
    pub(crate) fn into_record(self, result_marker: Option<&str>) -> GameRecord {
        let result = if self.result.is_empty() {
            result_marker
                .map(GameResult::from_notation)
                .unwrap_or_default()
        } else {
            GameResult::from_notation(&self.result)
        };

        GameRecord {
            time_control: TimeControlCategory::from_tag(&self.time_control),
            utc_date: parse_pgn_date(&self.utc_date).or_else(|| parse_pgn_date(&self.date)),
            white: self.white,
            black: self.black,
            result,
            opening: non_empty(self.opening),
            eco: non_empty(self.eco),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// PGN dates are `YYYY.MM.DD`; partially unknown dates (`2024.??.??`) are dropped.
fn parse_pgn_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y.%m.%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pgn_date_formats() {
        assert_eq!(
            parse_pgn_date("2023.12.31"),
            NaiveDate::from_ymd_opt(2023, 12, 31)
        );
        assert_eq!(parse_pgn_date("2023.??.??"), None);
        assert_eq!(parse_pgn_date(""), None);
    }

    #[test]
    fn record_from_empty_headers() {
        let record = HeaderFields::default().into_record(None);
        assert_eq!(record.result, GameResult::Unknown);
        assert_eq!(record.time_control, TimeControlCategory::Other);
        assert_eq!(record.opening, None);
        assert_eq!(record.eco, None);
        assert_eq!(record.utc_date, None);
    }

    #[test]
    fn result_tag_takes_precedence_over_marker() {
        let headers = HeaderFields {
            result: "0-1".into(),
            ..Default::default()
        };
        assert_eq!(headers.into_record(Some("1-0")).result, GameResult::BlackWin);

        let headers = HeaderFields::default();
        assert_eq!(headers.into_record(Some("1/2-1/2")).result, GameResult::Draw);
    }

    #[test]
    fn utc_date_preferred_over_date() {
        let headers = HeaderFields {
            utc_date: "2024.02.01".into(),
            date: "2024.01.31".into(),
            ..Default::default()
        };
        assert_eq!(
            headers.into_record(None).utc_date,
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );

        let headers = HeaderFields {
            utc_date: "????.??.??".into(),
            date: "2024.01.31".into(),
            ..Default::default()
        };
        assert_eq!(
            headers.into_record(None).utc_date,
            NaiveDate::from_ymd_opt(2024, 1, 31)
        );
    }

    #[test]
    fn identity_tags_mark_a_repeat() {
        let headers = HeaderFields {
            white: "alice".into(),
            event_seen: true,
            ..Default::default()
        };
        assert!(headers.repeats_identity_tag(b"White"));
        assert!(headers.repeats_identity_tag(b"Event"));
        assert!(!headers.repeats_identity_tag(b"Black"));
        assert!(!headers.repeats_identity_tag(b"Site"));
        assert!(!headers.repeats_identity_tag(b"Opening"));
    }
}

use std::ops::ControlFlow;

use gambit_types::game::GameRecord;
use pgn_reader::{Outcome, RawTag, SanPlus, Skip, Visitor};

use crate::headers::HeaderFields;

/// Per-block state carried from the tag section into the move text.
#[derive(Default)]
pub(crate) struct BlockState {
    headers: HeaderFields,
    saw_movetext: bool,
    result_marker: Option<String>,
}

/// Streaming visitor (pgn-reader) that turns each block into a record.
///
/// Output is `None` for a block whose move text never produced a move or a
/// result marker; the caller drops those.
pub(crate) struct RecordVisitor;

impl Visitor for RecordVisitor {
    type Tags = HeaderFields;
    type Movetext = BlockState;
    type Output = Option<GameRecord>;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(HeaderFields::default())
    }

    fn tag(
        &mut self,
        tags: &mut Self::Tags,
        key: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        tags.set_known_tag(key, value);
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        ControlFlow::Continue(BlockState {
            headers: tags,
            ..Default::default()
        })
    }

    fn begin_variation(&mut self, _: &mut Self::Movetext) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn san(&mut self, movetext: &mut Self::Movetext, _: SanPlus) -> ControlFlow<Self::Output> {
        movetext.saw_movetext = true;
        ControlFlow::Continue(())
    }

    fn outcome(
        &mut self,
        movetext: &mut Self::Movetext,
        outcome: Outcome,
    ) -> ControlFlow<Self::Output> {
        movetext.saw_movetext = true;
        movetext.result_marker = Some(outcome.to_string());
        ControlFlow::Continue(())
    }

    fn end_game(&mut self, movetext: Self::Movetext) -> Self::Output {
        if !movetext.saw_movetext {
            return None;
        }
        let BlockState {
            headers,
            result_marker,
            ..
        } = movetext;
        Some(headers.into_record(result_marker.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gambit_types::game::GameResult;
    use pgn_reader::Reader;

    #[test]
    fn visitor_basic_parsing() {
        let pgn = r#"[White "alice"]
[Black "bob"]
[Result "1-0"]
1. e4 e5 2. Nf3 1-0"#;

        let mut reader = Reader::new(pgn.as_bytes());
        let mut visitor = RecordVisitor;

        let game = reader
            .read_game(&mut visitor)
            .unwrap()
            .flatten()
            .expect("Should have parsed a game");
        assert_eq!(game.white, "alice");
        assert_eq!(game.black, "bob");
        assert_eq!(game.result, GameResult::WhiteWin);
    }

    #[test]
    fn visitor_unknown_headers_are_ignored() {
        let pgn = r#"[White "alice"]
[SomeRandomTag "noise"]
[Black "bob"]
1. e4 0-1"#;

        let mut reader = Reader::new(pgn.as_bytes());
        let mut visitor = RecordVisitor;

        let game = reader
            .read_game(&mut visitor)
            .unwrap()
            .flatten()
            .expect("Should have parsed a game");
        assert_eq!(game.black, "bob");
        assert_eq!(game.result, GameResult::BlackWin);
    }

    #[test]
    fn visitor_unterminated_game_is_kept() {
        let pgn = r#"[White "alice"]
[Black "bob"]
[Result "*"]
1. e4 *"#;
        let mut reader = Reader::new(pgn.as_bytes());
        let mut visitor = RecordVisitor;

        let game = reader
            .read_game(&mut visitor)
            .unwrap()
            .flatten()
            .expect("Should have parsed a game");
        assert_eq!(game.result, GameResult::Unknown);
    }

    #[test]
    fn visitor_tags_without_movetext_yield_nothing() {
        let pgn = r#"[White "alice"]
[Black "bob"]
"#;
        let mut reader = Reader::new(pgn.as_bytes());
        let mut visitor = RecordVisitor;

        let output = reader.read_game(&mut visitor).unwrap();
        assert!(output.flatten().is_none());
    }
}

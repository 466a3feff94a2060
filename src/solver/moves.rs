//! Layer-turn notation.

use crate::cube::FaceId;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors parsing move notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("empty move token")]
    Empty,
    #[error("unknown face in move '{0}'")]
    UnknownFace(String),
    #[error("unknown modifier in move '{0}'")]
    UnknownModifier(String),
    #[error("modifier '{0}' has no preceding face")]
    DanglingModifier(String),
}

/// How far a layer turns, seen from outside its face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Turn {
    /// Quarter turn clockwise.
    Clockwise,
    /// Quarter turn counter-clockwise (`'`).
    CounterClockwise,
    /// Half turn (`2`).
    Double,
}

impl Turn {
    /// Signed quarter turns, clockwise positive.
    pub fn quarter_turns(self) -> i32 {
        match self {
            Turn::Clockwise => 1,
            Turn::CounterClockwise => -1,
            Turn::Double => 2,
        }
    }

    /// The turn that undoes this one.
    pub fn inverse(self) -> Self {
        match self {
            Turn::Clockwise => Turn::CounterClockwise,
            Turn::CounterClockwise => Turn::Clockwise,
            Turn::Double => Turn::Double,
        }
    }

    /// Notation suffix.
    pub fn suffix(self) -> &'static str {
        match self {
            Turn::Clockwise => "",
            Turn::CounterClockwise => "'",
            Turn::Double => "2",
        }
    }

    fn parse_suffix(s: &str) -> Option<Self> {
        match s {
            "" => Some(Turn::Clockwise),
            "'" | "\u{2019}" | "i" => Some(Turn::CounterClockwise),
            "2" | "2'" | "2\u{2019}" => Some(Turn::Double),
            _ => None,
        }
    }
}

/// One face turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    /// Face whose layer turns.
    pub face: FaceId,
    /// Direction and amount.
    pub turn: Turn,
}

impl Move {
    /// Creates a move.
    pub const fn new(face: FaceId, turn: Turn) -> Self {
        Self { face, turn }
    }

    /// The move that undoes this one.
    pub fn invert(self) -> Self {
        Self {
            face: self.face,
            turn: self.turn.inverse(),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.face, self.turn.suffix())
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let first = chars.next().ok_or(MoveParseError::Empty)?;
        let face = FaceId::from_letter(first).ok_or_else(|| MoveParseError::UnknownFace(s.into()))?;
        let turn =
            Turn::parse_suffix(chars.as_str()).ok_or_else(|| MoveParseError::UnknownModifier(s.into()))?;
        Ok(Move { face, turn })
    }
}

/// Formats a move list as space-separated notation.
pub fn format_moves(moves: &[Move]) -> String {
    moves.iter().map(Move::to_string).collect::<Vec<_>>().join(" ")
}

/// Normalizes solver output into canonical moves.
///
/// Tokens may contain several whitespace-separated lexemes, and a modifier
/// may arrive as its own lexeme (`"R", "'"`), in which case it is merged
/// into the preceding quarter turn.
pub fn normalize_tokens<I, S>(tokens: I) -> Result<Vec<Move>, MoveParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut moves: Vec<Move> = Vec::new();
    for token in tokens {
        for lexeme in token.as_ref().split_whitespace() {
            if let Some(turn) = Turn::parse_suffix(lexeme).filter(|t| *t != Turn::Clockwise) {
                match moves.last_mut() {
                    Some(prev) if prev.turn == Turn::Clockwise => prev.turn = turn,
                    _ => return Err(MoveParseError::DanglingModifier(lexeme.into())),
                }
                continue;
            }
            moves.push(lexeme.parse()?);
        }
    }
    Ok(moves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_and_display() {
        for text in ["R", "U'", "F2", "L", "D'", "B2"] {
            let m: Move = text.parse().unwrap();
            assert_eq!(m.to_string(), text);
        }
        assert_eq!("R2'".parse::<Move>().unwrap(), Move::new(FaceId::R, Turn::Double));
        assert_eq!("r".parse::<Move>().unwrap(), Move::new(FaceId::R, Turn::Clockwise));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Move>(), Err(MoveParseError::Empty));
        assert!(matches!("X".parse::<Move>(), Err(MoveParseError::UnknownFace(_))));
        assert!(matches!("R3".parse::<Move>(), Err(MoveParseError::UnknownModifier(_))));
    }

    #[test]
    fn test_invert() {
        let m = Move::new(FaceId::U, Turn::Clockwise);
        assert_eq!(m.invert(), Move::new(FaceId::U, Turn::CounterClockwise));
        let d = Move::new(FaceId::F, Turn::Double);
        assert_eq!(d.invert(), d);
    }

    #[test]
    fn test_normalize_merges_split_modifiers() {
        let moves = normalize_tokens(["R", "'", "U", "2", "F'", "L D2"]).unwrap();
        assert_eq!(format_moves(&moves), "R' U2 F' L D2");
    }

    #[test]
    fn test_normalize_rejects_dangling_modifier() {
        assert_eq!(
            normalize_tokens(["'", "R"]),
            Err(MoveParseError::DanglingModifier("'".into()))
        );
        assert!(normalize_tokens(["R'", "2"]).is_err());
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_tokens(Vec::<String>::new()), Ok(Vec::new()));
    }

    fn any_move() -> impl Strategy<Value = Move> {
        (0usize..6, 0usize..3).prop_map(|(f, t)| {
            let turn = [Turn::Clockwise, Turn::CounterClockwise, Turn::Double][t];
            Move::new(FaceId::ALL[f], turn)
        })
    }

    proptest! {
        #[test]
        fn prop_invert_is_involutive(m in any_move()) {
            prop_assert_eq!(m.invert().invert(), m);
        }

        #[test]
        fn prop_display_parses_back(m in any_move()) {
            prop_assert_eq!(m.to_string().parse::<Move>(), Ok(m));
        }
    }
}

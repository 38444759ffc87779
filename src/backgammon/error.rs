use crate::backgammon::Position;

/// Rejections raised by [`crate::backgammon::Board`], [`crate::backgammon::Dice`]
/// and [`crate::backgammon::Game`]. State is never modified when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RuleError {
    /// The move or entry is not legal in the current position.
    #[display("Illegal move of {count} from {from}")]
    IllegalMove { from: Position, count: u8 },

    /// A die face outside `1..=6`.
    #[display("Die face {_0} is not on a six-sided die")]
    InvalidFace(u8),

    /// No die with this value has uses left.
    #[display("Dice value {_0} is not available")]
    InvalidDiceUse(u8),

    /// Internal bookkeeping would break stone conservation or point ownership.
    #[display("Invariant violation: {_0}")]
    InvariantViolation(String),

    /// Nobody has rolled for the opening turn yet.
    #[display("Game has not started")]
    NotStarted,

    /// A side has already borne off every stone.
    #[display("Game is already over")]
    GameOver,

    /// The dice cannot be forfeited while a legal play exists.
    #[display("A legal play is still available")]
    MustPlay,
}

impl std::error::Error for RuleError {}

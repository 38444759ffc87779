/// Number of points on the board.
pub const POINTS: usize = 24;

/// Stones each side starts with.
pub const STONES_PER_SIDE: u8 = 15;

/// Points in a side's home board.
pub const HOME_SIZE: u8 = 6;

/// Faces on each die, numbered from 1.
pub const DIE_FACES: u8 = 6;

mod board;
pub use board::Board;

mod color;
pub use color::Color;

mod position;
pub use position::Position;

mod error;
pub use error::RuleError;

mod game;
pub use game::{Game, Phase};

mod halfmove;
pub use halfmove::HalfMove;

mod dice;
pub use dice::{Dice, DiceView};

//! Backgammon rules engine: board, dice and turn control.
//!
//! Rendering, input handling and move suggestion are left to the consumer,
//! which drives a [`Game`] through its commands and reads state back through
//! [`Game::board`] and [`Game::dice`].

pub mod backgammon;

pub use backgammon::{Board, Color, Dice, DiceView, Game, HalfMove, Phase, Position, RuleError};

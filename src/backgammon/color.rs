use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::backgammon::{DIE_FACES, HOME_SIZE, POINTS};

/// Side owning a stone, or [`Color::None`] for an empty point.
///
/// White travels from point 0 towards point 23 and bears off past 23.
/// Black travels the other way and bears off below 0.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, derive_more::Display,
)]
pub enum Color {
    White,
    Black,
    #[default]
    None,
}

impl Color {
    pub const PLAYERS: [Color; 2] = [Color::White, Color::Black];

    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
            Color::None => Color::None,
        }
    }

    pub fn is_player(&self) -> bool {
        *self != Color::None
    }

    /// Single character used by text renderers.
    pub fn glyph(&self) -> char {
        match self {
            Color::White => 'O',
            Color::Black => '#',
            Color::None => ' ',
        }
    }

    /// Sign of this color's stones in the signed point encoding.
    pub(crate) fn sign(&self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
            Color::None => 0,
        }
    }

    pub(crate) fn from_sign(value: i8) -> Color {
        match value.signum() {
            1 => Color::White,
            -1 => Color::Black,
            _ => Color::None,
        }
    }

    /// Slot of this color in per-side counters.
    pub(crate) fn slot(&self) -> Option<usize> {
        match self {
            Color::White => Some(0),
            Color::Black => Some(1),
            Color::None => None,
        }
    }

    /// Raw destination of a stone moving `count` points from `from`.
    /// Values outside `0..24` mean the stone leaves the board.
    pub(crate) fn advance(&self, from: u8, count: u8) -> Option<i16> {
        match self {
            Color::White => Some(from as i16 + count as i16),
            Color::Black => Some(from as i16 - count as i16),
            Color::None => None,
        }
    }

    /// Point where a stone from the bar enters with the die value `number`.
    pub fn entry_point(&self, number: u8) -> Option<u8> {
        if !(1..=DIE_FACES).contains(&number) {
            return None;
        }
        match self {
            Color::White => Some(number - 1),
            Color::Black => Some(POINTS as u8 - number),
            Color::None => None,
        }
    }

    /// The innermost six points, where every stone must be before bearing off.
    pub fn home_board(&self) -> Option<RangeInclusive<u8>> {
        let last = POINTS as u8 - 1;
        match self {
            Color::White => Some(last + 1 - HOME_SIZE..=last),
            Color::Black => Some(0..=HOME_SIZE - 1),
            Color::None => None,
        }
    }
}

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::backgammon::{Color, HalfMove, POINTS, Position, RuleError, STONES_PER_SIDE};

/// Backgammon board seen from White's side.
/// Every point stores a signed stone count: positive values are White stones,
/// negative values Black stones, so an empty point can never carry an owner.
/// Bar and home counters are indexed by [`Color::slot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    checkers: [i8; POINTS],
    bar: [u8; 2],
    home: [u8; 2],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates a new board with the default starting position.
    pub fn new() -> Self {
        Board {
            checkers: [2, 0, 0, 0, 0, -3, 0, -5, 0, 0, 0, 5, -5, 0, 0, 0, 5, 0, 3, 0, 0, 0, 0, -2],
            bar: [0, 0],
            home: [0, 0],
        }
    }

    /// Creates an empty board with no checkers on it.
    /// Stone conservation does not hold for this board; use it only as a
    /// scratch position for analysis.
    pub fn empty() -> Self {
        Board {
            checkers: [0; POINTS],
            bar: [0, 0],
            home: [0, 0],
        }
    }

    /// Builds a position from signed point counts (positive for White,
    /// negative for Black) plus `[white, black]` bar and home counters.
    pub fn from_checkers(
        checkers: [i8; POINTS],
        bar: [u8; 2],
        home: [u8; 2],
    ) -> Result<Self, RuleError> {
        let board = Board { checkers, bar, home };
        for color in Color::PLAYERS {
            let total = board.total_stones(color);
            if total != STONES_PER_SIDE as u32 {
                return Err(RuleError::InvariantViolation(format!(
                    "{color} has {total} stones, expected {STONES_PER_SIDE}"
                )));
            }
        }
        Ok(board)
    }

    pub fn point_stone_count(&self, index: u8) -> u8 {
        self.checkers
            .get(index as usize)
            .map_or(0, |value| value.unsigned_abs())
    }

    pub fn point_stone(&self, index: u8) -> Color {
        self.checkers
            .get(index as usize)
            .map_or(Color::None, |&value| Color::from_sign(value))
    }

    pub fn bar_count(&self, color: Color) -> u8 {
        color.slot().map_or(0, |slot| self.bar[slot])
    }

    pub fn home_count(&self, color: Color) -> u8 {
        color.slot().map_or(0, |slot| self.home[slot])
    }

    /// Stones of `color` still standing on one of the 24 points.
    pub fn stones_on_board(&self, color: Color) -> u32 {
        if !color.is_player() {
            return 0;
        }
        self.checkers
            .iter()
            .filter(|&&value| Color::from_sign(value) == color)
            .map(|value| value.unsigned_abs() as u32)
            .sum()
    }

    /// Points, bar and home together. Always 15 for a reachable position.
    pub fn total_stones(&self, color: Color) -> u32 {
        self.stones_on_board(color) + self.bar_count(color) as u32 + self.home_count(color) as u32
    }

    /// Destination of the stone on `from` when moved `count` points,
    /// or `None` when there is no stone to move.
    pub fn target(&self, from: u8, count: u8) -> Option<Position> {
        if count == 0 {
            return None;
        }
        let raw = self.point_stone(from).advance(from, count)?;
        if (0..POINTS as i16).contains(&raw) {
            Some(Position::Point(raw as u8))
        } else {
            Some(Position::Home)
        }
    }

    pub fn can_move(&self, from: u8, count: u8) -> bool {
        let color = self.point_stone(from);
        // A stone on the bar has to re-enter before anything else moves.
        if !color.is_player() || self.bar_count(color) > 0 {
            return false;
        }
        match self.target(from, count) {
            Some(Position::Point(to)) => {
                self.point_stone(to) != color.opposite() || self.point_stone_count(to) == 1
            }
            Some(Position::Home) => self.has_all_in_base(color, Some(from)),
            _ => false,
        }
    }

    pub fn can_put(&self, color: Color, number: u8) -> bool {
        if self.bar_count(color) == 0 {
            return false;
        }
        match color.entry_point(number) {
            Some(entry) => {
                self.point_stone(entry) != color.opposite() || self.point_stone_count(entry) < 2
            }
            None => false,
        }
    }

    /// Whether every stone of `color` stands on its home board.
    /// `except` is ignored when it holds that color's last stone on the point,
    /// which lets a caller ask "would this be true once the stone on `except`
    /// has moved" without touching the board.
    pub fn has_all_in_base(&self, color: Color, except: Option<u8>) -> bool {
        let Some(home_board) = color.home_board() else {
            return false;
        };
        if self.bar_count(color) > 0 {
            return false;
        }
        (0..POINTS as u8)
            .filter(|index| !home_board.contains(index))
            .all(|index| {
                self.point_stone(index) != color
                    || (except == Some(index) && self.point_stone_count(index) <= 1)
            })
    }

    /// Moves the stone on `from` by `count` points, hitting a lone opposing
    /// stone on the target or bearing it off past the last point.
    pub fn move_stone(&mut self, from: u8, count: u8) -> Result<HalfMove, RuleError> {
        if !self.can_move(from, count) {
            return Err(RuleError::IllegalMove { from: Position::Point(from), count });
        }
        let color = self.point_stone(from);
        let to = self
            .target(from, count)
            .ok_or(RuleError::IllegalMove { from: Position::Point(from), count })?;

        let mut next = *self;
        let hit = match to {
            Position::Point(index) => next.land(index, color)?,
            _ => {
                next.adjust_home(color, 1)?;
                false
            }
        };
        next.remove_stone(from)?;
        *self = next;

        trace!(%color, from, count, %to, hit, "stone moved");
        Ok(HalfMove::new(color, Position::Point(from), to, count, hit))
    }

    /// Enters a stone of `color` from the bar with the die value `number`.
    pub fn put(&mut self, color: Color, number: u8) -> Result<HalfMove, RuleError> {
        let illegal = RuleError::IllegalMove { from: Position::Bar, count: number };
        if !self.can_put(color, number) {
            return Err(illegal);
        }
        let entry = color.entry_point(number).ok_or(illegal)?;

        let mut next = *self;
        next.adjust_bar(color, -1)?;
        let hit = next.land(entry, color)?;
        *self = next;

        trace!(%color, number, entry, hit, "stone entered");
        Ok(HalfMove::new(color, Position::Bar, Position::Point(entry), number, hit))
    }

    /// Places a stone of `color` on `index`, sending a lone opposing stone to its bar.
    fn land(&mut self, index: u8, color: Color) -> Result<bool, RuleError> {
        let opponent = color.opposite();
        let hit = self.point_stone(index) == opponent && self.point_stone_count(index) == 1;
        if hit {
            self.remove_stone(index)?;
            self.adjust_bar(opponent, 1)?;
        }
        self.add_stone(index, color)?;
        Ok(hit)
    }

    fn add_stone(&mut self, index: u8, color: Color) -> Result<(), RuleError> {
        let owner = self.point_stone(index);
        if !color.is_player() || (owner.is_player() && owner != color) {
            return Err(RuleError::InvariantViolation(format!(
                "adding {color} stone to point {index} owned by {owner}"
            )));
        }
        self.checkers[index as usize] += color.sign();
        Ok(())
    }

    fn remove_stone(&mut self, index: u8) -> Result<(), RuleError> {
        let owner = self.point_stone(index);
        if !owner.is_player() {
            return Err(RuleError::InvariantViolation(format!(
                "removing stone from empty point {index}"
            )));
        }
        self.checkers[index as usize] -= owner.sign();
        Ok(())
    }

    fn adjust_bar(&mut self, color: Color, delta: i8) -> Result<(), RuleError> {
        let slot = color.slot().ok_or_else(|| {
            RuleError::InvariantViolation("bar has no slot for an unowned stone".to_string())
        })?;
        self.bar[slot] = self.bar[slot].checked_add_signed(delta).ok_or_else(|| {
            RuleError::InvariantViolation(format!("{color} bar count out of range"))
        })?;
        Ok(())
    }

    fn adjust_home(&mut self, color: Color, delta: i8) -> Result<(), RuleError> {
        let slot = color.slot().ok_or_else(|| {
            RuleError::InvariantViolation("home has no slot for an unowned stone".to_string())
        })?;
        self.home[slot] = self.home[slot].checked_add_signed(delta).ok_or_else(|| {
            RuleError::InvariantViolation(format!("{color} home count out of range"))
        })?;
        Ok(())
    }
}

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, instrument, warn};

use crate::backgammon::{
    Board, Color, Dice, DiceView, HalfMove, POINTS, Position, RuleError, STONES_PER_SIDE,
};

/// Where a game stands. Derived from the board and turn on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    NotStarted,
    Turn(Color),
    Ended(Color),
}

/// A playable game: the board, the dice and whose turn it is.
///
/// The first [`Game::roll`] rolls two different values to decide who opens,
/// die one standing for White and die two for Black. The opener plays that
/// roll. Every later roll hands the turn to the other side.
#[derive(Debug, Clone)]
pub struct Game<R = ChaCha8Rng> {
    board: Board,
    dice: Dice,
    turn: Color,
    rng: R,
}

impl Game<ChaCha8Rng> {
    pub fn new() -> Self {
        Self::with_rng(ChaCha8Rng::from_os_rng())
    }

    /// A game whose dice repeat for the same seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl Default for Game<ChaCha8Rng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Game<R> {
    pub fn with_rng(rng: R) -> Self {
        Self::from_parts(Board::new(), Dice::new(), Color::None, rng)
    }

    /// Resumes a game from a saved board, dice and turn.
    pub fn from_parts(board: Board, dice: Dice, turn: Color, rng: R) -> Self {
        Game { board, dice, turn, rng }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn dice(&self) -> DiceView {
        self.dice.view()
    }

    pub fn current_player(&self) -> Color {
        self.turn
    }

    pub fn phase(&self) -> Phase {
        match (self.winner(), self.turn) {
            (Color::None, Color::None) => Phase::NotStarted,
            (Color::None, turn) => Phase::Turn(turn),
            (winner, _) => Phase::Ended(winner),
        }
    }

    #[instrument(skip(self), fields(turn = %self.turn))]
    pub fn roll(&mut self) -> Result<DiceView, RuleError> {
        self.ensure_running()?;
        match self.turn {
            Color::None => {
                self.dice.roll_different(&mut self.rng);
                self.turn = if self.dice.die_one() > self.dice.die_two() {
                    Color::White
                } else {
                    Color::Black
                };
                info!(
                    white = self.dice.die_one(),
                    black = self.dice.die_two(),
                    opener = %self.turn,
                    "opening roll"
                );
            }
            player => {
                self.dice.roll(&mut self.rng);
                self.turn = player.opposite();
                debug!(dice = ?self.dice, next = %self.turn, "rolled");
            }
        }
        Ok(self.dice.view())
    }

    pub fn can_move(&self, from: u8, count: u8) -> bool {
        self.dice.is_rolled()
            && self.dice.is_on_dice(count)
            && self.board.can_move(from, count)
            && self.board.point_stone(from) == self.turn
    }

    /// Moves the current player's stone on `from` by `count`, spending that die.
    #[instrument(skip(self))]
    pub fn move_stone(&mut self, from: u8, count: u8) -> Result<HalfMove, RuleError> {
        self.ensure_running()?;
        if !self.can_move(from, count) {
            warn!(turn = %self.turn, "rejected move");
            let illegal = RuleError::IllegalMove { from: Position::Point(from), count };
            return Err(self.rejection(illegal));
        }
        let play = self.board.move_stone(from, count)?;
        self.dice.take_dice(count)?;
        self.log_play(&play);
        Ok(play)
    }

    pub fn can_put(&self, number: u8) -> bool {
        self.dice.is_rolled()
            && self.dice.is_on_dice(number)
            && self.board.can_put(self.turn, number)
    }

    /// Enters one of the current player's stones from the bar with `number`.
    #[instrument(skip(self))]
    pub fn put(&mut self, number: u8) -> Result<HalfMove, RuleError> {
        self.ensure_running()?;
        if !self.can_put(number) {
            warn!(turn = %self.turn, "rejected entry");
            let illegal = RuleError::IllegalMove { from: Position::Bar, count: number };
            return Err(self.rejection(illegal));
        }
        let play = self.board.put(self.turn, number)?;
        self.dice.take_dice(number)?;
        self.log_play(&play);
        Ok(play)
    }

    /// Every play the current player could make with the dice left.
    pub fn legal_plays(&self) -> Vec<HalfMove> {
        let mut plays = Vec::new();
        if !self.turn.is_player() {
            return plays;
        }
        let entering = self.board.bar_count(self.turn) > 0;
        for number in self.dice.available() {
            if entering {
                if self.can_put(number) {
                    let mut board = self.board;
                    plays.extend(board.put(self.turn, number).ok());
                }
                continue;
            }
            for from in 0..POINTS as u8 {
                if self.can_move(from, number) {
                    let mut board = self.board;
                    plays.extend(board.move_stone(from, number).ok());
                }
            }
        }
        plays
    }

    pub fn has_legal_play(&self) -> bool {
        !self.legal_plays().is_empty()
    }

    /// Gives up the rest of the roll. Only allowed when nothing can be played.
    #[instrument(skip(self), fields(turn = %self.turn))]
    pub fn pass(&mut self) -> Result<(), RuleError> {
        if !self.turn.is_player() {
            return Err(RuleError::NotStarted);
        }
        if self.has_legal_play() {
            warn!("pass refused");
            return Err(RuleError::MustPlay);
        }
        let mut forfeited = Vec::new();
        let takers: [fn(&mut Dice) -> u8; 2] = [Dice::take_die_one, Dice::take_die_two];
        for take in takers {
            loop {
                match take(&mut self.dice) {
                    0 => break,
                    value => forfeited.push(value),
                }
            }
        }
        debug!(?forfeited, "no legal play, dice forfeited");
        Ok(())
    }

    pub fn is_ended(&self) -> bool {
        Color::PLAYERS
            .iter()
            .any(|&color| self.board.home_count(color) == STONES_PER_SIDE)
    }

    pub fn winner(&self) -> Color {
        Color::PLAYERS
            .into_iter()
            .find(|&color| self.board.home_count(color) == STONES_PER_SIDE)
            .unwrap_or(Color::None)
    }

    fn ensure_running(&self) -> Result<(), RuleError> {
        if self.is_ended() {
            warn!(winner = %self.winner(), "command after the game ended");
            return Err(RuleError::GameOver);
        }
        Ok(())
    }

    fn rejection(&self, error: RuleError) -> RuleError {
        if self.turn.is_player() { error } else { RuleError::NotStarted }
    }

    fn log_play(&self, play: &HalfMove) {
        debug!(?play, left = self.dice.remaining_uses(), "played");
        if self.is_ended() {
            info!(winner = %self.winner(), "game over");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game_with(board: Board, dice: Dice, turn: Color) -> Game {
        Game::from_parts(board, dice, turn, ChaCha8Rng::seed_from_u64(0))
    }

    #[test]
    fn opening_roll_picks_the_higher_die() {
        for seed in 0..50 {
            let mut game = Game::seeded(seed);
            assert_eq!(game.phase(), Phase::NotStarted);
            let dice = game.roll().unwrap();
            assert_ne!(dice.die_one(), dice.die_two());
            let expected = if dice.die_one() > dice.die_two() {
                Color::White
            } else {
                Color::Black
            };
            assert_eq!(game.current_player(), expected);
            assert_eq!(dice.remaining_uses(), 2);
        }
    }

    #[test]
    fn later_rolls_alternate() {
        let mut game = Game::seeded(42);
        game.roll().unwrap();
        let opener = game.current_player();
        game.roll().unwrap();
        assert_eq!(game.current_player(), opener.opposite());
        game.roll().unwrap();
        assert_eq!(game.current_player(), opener);
    }

    #[test]
    fn commands_before_the_opening_roll() {
        let mut game = Game::seeded(1);
        assert!(!game.can_move(0, 1));
        assert_eq!(game.move_stone(0, 1), Err(RuleError::NotStarted));
        assert_eq!(game.put(1), Err(RuleError::NotStarted));
        assert_eq!(game.pass(), Err(RuleError::NotStarted));
        assert!(game.legal_plays().is_empty());
    }

    #[test]
    fn only_the_current_player_moves() {
        let mut game = game_with(Board::new(), Dice::from_numbers(3, 1).unwrap(), Color::White);
        assert!(game.can_move(0, 3));
        assert!(!game.can_move(23, 3));
        assert!(!game.can_move(0, 2));
        assert_eq!(
            game.move_stone(23, 1),
            Err(RuleError::IllegalMove { from: Position::Point(23), count: 1 })
        );

        let play = game.move_stone(0, 3).unwrap();
        assert_eq!(play.to(), Position::Point(3));
        assert!(!game.dice().is_on_dice(3));
        assert!(game.dice().is_on_dice(1));
    }

    #[test]
    fn doubles_give_four_moves() {
        let mut game = game_with(Board::new(), Dice::from_numbers(4, 4).unwrap(), Color::White);
        for from in [0, 0, 11, 11] {
            game.move_stone(from, 4).unwrap();
        }
        assert!(!game.dice().is_rolled());
        assert!(!game.can_move(16, 4));
        assert_eq!(game.board().point_stone_count(4), 2);
        assert_eq!(game.board().point_stone_count(15), 2);
    }

    #[test]
    fn rejected_commands_change_nothing() {
        let mut game = game_with(Board::new(), Dice::from_numbers(5, 2).unwrap(), Color::White);
        let board = *game.board();
        let dice = game.dice();
        assert!(game.move_stone(0, 5).is_err());
        assert!(game.move_stone(0, 3).is_err());
        assert!(game.put(2).is_err());
        assert_eq!(*game.board(), board);
        assert_eq!(game.dice(), dice);
    }

    #[test]
    fn entering_from_the_bar() {
        let mut checkers = [0; 24];
        checkers[11] = 14;
        checkers[3] = -2;
        checkers[20] = -13;
        let board = Board::from_checkers(checkers, [1, 0], [0, 0]).unwrap();
        let mut game = game_with(board, Dice::from_numbers(4, 2).unwrap(), Color::White);

        assert!(!game.can_put(4));
        assert!(!game.can_move(11, 2));
        assert_eq!(game.legal_plays().len(), 1);
        let play = game.put(2).unwrap();
        assert_eq!(play.from(), Position::Bar);
        assert_eq!(play.to(), Position::Point(1));
        assert!(game.can_move(11, 4));
    }

    #[test]
    fn blocked_entry_must_pass() {
        let mut checkers = [0; 24];
        checkers[11] = 14;
        checkers[3] = -2;
        checkers[5] = -2;
        checkers[20] = -11;
        let board = Board::from_checkers(checkers, [1, 0], [0, 0]).unwrap();
        let mut game = game_with(board, Dice::from_numbers(4, 6).unwrap(), Color::White);

        assert!(!game.has_legal_play());
        game.pass().unwrap();
        assert!(!game.dice().is_rolled());
        assert_eq!(*game.board(), board);
    }

    #[test]
    fn pass_is_refused_while_a_play_exists() {
        let mut game = game_with(Board::new(), Dice::from_numbers(6, 5).unwrap(), Color::Black);
        assert!(game.has_legal_play());
        assert_eq!(game.pass(), Err(RuleError::MustPlay));
        assert!(game.dice().is_rolled());
    }

    #[test]
    fn legal_plays_match_can_move() {
        let game = game_with(Board::new(), Dice::from_numbers(6, 1).unwrap(), Color::White);
        let plays = game.legal_plays();
        assert!(!plays.is_empty());
        for play in &plays {
            let from = play.from().point().unwrap();
            assert!(game.can_move(from, play.die()));
            assert_eq!(play.color(), Color::White);
        }
        // 0 -> 6 is open, 0 -> 1 is open, 11 -> 17, 11 -> 12 is black's point.
        assert!(plays.iter().any(|p| p.from() == Position::Point(0) && p.die() == 6));
        assert!(!plays.iter().any(|p| p.from() == Position::Point(11) && p.die() == 1));
    }

    #[test]
    fn winning_ends_the_game() {
        let mut checkers = [0; 24];
        checkers[23] = 1;
        checkers[2] = -15;
        let board = Board::from_checkers(checkers, [0, 0], [14, 0]).unwrap();
        let mut game = game_with(board, Dice::from_numbers(1, 3).unwrap(), Color::White);

        assert!(!game.is_ended());
        assert_eq!(game.winner(), Color::None);
        game.move_stone(23, 3).unwrap();
        assert!(game.is_ended());
        assert_eq!(game.winner(), Color::White);
        assert_eq!(game.phase(), Phase::Ended(Color::White));
        assert_eq!(game.roll(), Err(RuleError::GameOver));
    }

    #[test]
    fn finished_game_refuses_every_command() {
        let mut checkers = [0; 24];
        checkers[20] = -13;
        let board = Board::from_checkers(checkers, [0, 2], [15, 0]).unwrap();
        let mut game = game_with(board, Dice::from_numbers(2, 5).unwrap(), Color::Black);

        assert!(game.board().can_put(Color::Black, 2));
        assert_eq!(game.put(2), Err(RuleError::GameOver));
        assert_eq!(game.move_stone(20, 5), Err(RuleError::GameOver));
        assert_eq!(game.roll(), Err(RuleError::GameOver));
        assert_eq!(*game.board(), board);
        assert_eq!(game.dice().remaining_uses(), 2);
    }
}

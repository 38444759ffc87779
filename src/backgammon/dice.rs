use std::fmt::Debug;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::backgammon::{DIE_FACES, RuleError};

/// The pair of dice for the current turn and the uses left on each die.
///
/// A double gives each die two uses, four moves in total. Distinct values
/// give one use per die. A fresh [`Dice`] has not been rolled and has no uses.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Dice {
    values: [u8; 2],
    uses: [u8; 2],
}

impl Dice {
    pub fn new() -> Self {
        Self::default()
    }

    /// A roll with known faces, with uses assigned as if it had been rolled.
    pub fn from_numbers(die_one: u8, die_two: u8) -> Result<Self, RuleError> {
        if let Some(face) = [die_one, die_two]
            .into_iter()
            .find(|face| !(1..=DIE_FACES).contains(face))
        {
            return Err(RuleError::InvalidFace(face));
        }
        Ok(Self::fresh(die_one, die_two))
    }

    pub fn roll<R: Rng>(&mut self, rng: &mut R) {
        let die_one = rng.random_range(1..=DIE_FACES);
        let die_two = rng.random_range(1..=DIE_FACES);
        *self = Self::fresh(die_one, die_two);
    }

    fn fresh(die_one: u8, die_two: u8) -> Self {
        let uses = if die_one == die_two { 2 } else { 1 };
        Dice {
            values: [die_one, die_two],
            uses: [uses, uses],
        }
    }

    /// Rolls until the faces differ. Decides who opens the game.
    pub fn roll_different<R: Rng>(&mut self, rng: &mut R) {
        loop {
            self.roll(rng);
            if !self.is_double() {
                break;
            }
        }
    }

    pub fn die_one(&self) -> u8 {
        self.values[0]
    }

    pub fn die_two(&self) -> u8 {
        self.values[1]
    }

    pub fn is_double(&self) -> bool {
        self.values[0] == self.values[1]
    }

    pub fn is_on_dice(&self, number: u8) -> bool {
        self.matching_die(number).is_some()
    }

    /// Uses one move of `number`, from die one when both dice could serve it.
    pub fn take_dice(&mut self, number: u8) -> Result<(), RuleError> {
        let die = self.matching_die(number).ok_or(RuleError::InvalidDiceUse(number))?;
        self.uses[die] -= 1;
        Ok(())
    }

    /// Takes one use of die one and returns its face, or 0 once it is spent.
    pub fn take_die_one(&mut self) -> u8 {
        self.take_die(0)
    }

    /// Takes one use of die two and returns its face, or 0 once it is spent.
    pub fn take_die_two(&mut self) -> u8 {
        self.take_die(1)
    }

    /// Whether any move remains for the current roll.
    pub fn is_rolled(&self) -> bool {
        self.remaining_uses() > 0
    }

    pub fn remaining_uses(&self) -> u8 {
        self.uses[0] + self.uses[1]
    }

    /// Distinct face values that can still be played.
    pub fn available(&self) -> Vec<u8> {
        let mut values = Vec::with_capacity(2);
        for die in 0..2 {
            if self.uses[die] > 0 && !values.contains(&self.values[die]) {
                values.push(self.values[die]);
            }
        }
        values
    }

    /// Read-only copy handed out to renderers and other consumers.
    pub fn view(&self) -> DiceView {
        DiceView(*self)
    }

    fn matching_die(&self, number: u8) -> Option<usize> {
        (0..2).find(|&die| self.uses[die] > 0 && self.values[die] == number)
    }

    fn take_die(&mut self, die: usize) -> u8 {
        if self.uses[die] == 0 {
            return 0;
        }
        self.uses[die] -= 1;
        self.values[die]
    }
}

impl Debug for Dice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_double() {
            write!(f, "Double({}): {} uses left", self.values[0], self.remaining_uses())
        } else {
            write!(
                f,
                "Dice({} | {}): {} / {} uses left",
                self.values[0], self.values[1], self.uses[0], self.uses[1]
            )
        }
    }
}

/// Snapshot of the dice that can be queried but never played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceView(Dice);

impl DiceView {
    pub fn is_on_dice(&self, number: u8) -> bool {
        self.0.is_on_dice(number)
    }

    pub fn is_rolled(&self) -> bool {
        self.0.is_rolled()
    }

    pub fn die_one(&self) -> u8 {
        self.0.die_one()
    }

    pub fn die_two(&self) -> u8 {
        self.0.die_two()
    }

    pub fn is_double(&self) -> bool {
        self.0.is_double()
    }

    pub fn remaining_uses(&self) -> u8 {
        self.0.remaining_uses()
    }
}

use rand::{Rng, RngCore};
use std::collections::VecDeque;

pub fn fill_random(buf: &mut [u8]) {
    rand::thread_rng().fill_bytes(buf);
}

pub fn random_below(bound: u32) -> u32 {
    if bound == 0 {
        return 0;
    }
    rand::thread_rng().gen_range(0..bound)
}

/// Source of uniform samples in `[0, 1)` for probabilistic worker transitions.
pub trait Dice: Send {
    fn roll(&mut self) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngDice;

impl Dice for ThreadRngDice {
    fn roll(&mut self) -> f64 {
        rand::random::<f64>()
    }
}

/// Replays a fixed sequence of rolls, then keeps returning the last one.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<f64>,
    last: f64,
}

impl ScriptedDice {
    pub fn new(rolls: impl IntoIterator<Item = f64>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            last: 0.0,
        }
    }

    pub fn always(value: f64) -> Self {
        Self {
            rolls: VecDeque::new(),
            last: value,
        }
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self) -> f64 {
        if let Some(next) = self.rolls.pop_front() {
            self.last = next;
        }
        self.last
    }
}

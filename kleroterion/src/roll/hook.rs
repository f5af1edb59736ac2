use std::time::Duration;

use crate::roll::card::Card;

/// Observer for roll progress. The driving adapter typically renders the
/// card from `on_step`; the engine suspends for the step's delay only
/// after every hook has seen it, which keeps steps strictly ordered.
#[allow(unused)]
pub trait RollHook: Send + Sync {
    fn on_roll_start(&mut self) {}
    fn on_step(&mut self, card: &Card, step: u32, delay: Duration) {}
    fn on_roll_complete(&mut self, card: &Card) {}
}

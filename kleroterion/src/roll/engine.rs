use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    catalog::{Accessory, Catalog, Character, Variant},
    exclusions::Exclusions,
    roll::{
        card::Card,
        hook::RollHook,
        logging::{RollEvent, RollLog},
    },
    sampler::{Roller, pick_distinct_pair, pick_filtered},
};

pub type Timestamp = chrono::DateTime<chrono::Utc>;

pub const ROLL_STEPS: u32 = 25;
pub const INITIAL_DELAY_MS: f64 = 40.0;
pub const DELAY_DECAY: f64 = 1.08;

/// The reveal animation's shape: how many draws, the first inter-draw
/// delay, and the geometric factor applied after every draw. `decay >= 1`
/// keeps the delay sequence monotonically non-decreasing, which is what
/// makes the roll read as a slowing slot machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollSchedule {
    pub steps: u32,
    pub initial_delay_ms: f64,
    pub decay: f64,
}

impl Default for RollSchedule {
    fn default() -> Self {
        Self {
            steps: ROLL_STEPS,
            initial_delay_ms: INITIAL_DELAY_MS,
            decay: DELAY_DECAY,
        }
    }
}

impl RollSchedule {
    pub fn new(steps: u32, initial_delay_ms: f64, decay: f64) -> anyhow::Result<Self> {
        if steps == 0 {
            anyhow::bail!("a roll needs at least one step");
        }
        if !(initial_delay_ms >= 0.0) {
            anyhow::bail!("initial delay must be a non-negative duration");
        }
        if !(decay >= 1.0) {
            anyhow::bail!("delay decay below 1.0 would speed the roll up");
        }
        Ok(Self {
            steps,
            initial_delay_ms,
            decay,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollPhase {
    Idle,
    Rolling,
    Completing,
}

/// One intermediate frame of the reveal: the drawn card and how long the
/// adapter should wait before asking for the next frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RollTick {
    pub step: u32,
    pub card: Card,
    pub delay: Duration,
}

/// The final outcome of a roll. Arms the confetti batch and a fresh
/// `Reroller`; the engine retains no other history.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedRoll {
    pub card: Card,
    pub finished_at: Timestamp,
}

/// One draw's worth of selections, borrowed from the catalog.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub character: &'a Character,
    pub variant: &'a Variant,
    pub accessories: (&'a Accessory, &'a Accessory),
}

/// Draws a character, and a variant for it. The variant is drawn from the
/// character's variant list when variant display is enabled, otherwise the
/// character's default (first) variant is used as-is.
pub fn draw_character<'a>(
    catalog: &'a Catalog,
    exclusions: &Exclusions,
    show_variants: bool,
    roller: &mut Roller,
) -> (&'a Character, &'a Variant) {
    let character = pick_filtered(roller, &catalog.characters, &exclusions.characters, |c| {
        c.name.as_str()
    });
    let variant = if show_variants {
        pick_filtered(roller, &character.variants, &exclusions.variants, |v| {
            v.name.as_str()
        })
    } else {
        character.default_variant()
    };
    (character, variant)
}

/// Draws a full selection: character, variant, and a distinct accessory
/// pair. Exclusions are read here, at draw time, from whatever snapshot
/// the caller passes.
pub fn draw_selection<'a>(
    catalog: &'a Catalog,
    exclusions: &Exclusions,
    show_variants: bool,
    roller: &mut Roller,
) -> Selection<'a> {
    let (character, variant) = draw_character(catalog, exclusions, show_variants, roller);
    let accessories = pick_distinct_pair(
        roller,
        &catalog.accessories,
        &exclusions.accessories,
        |a| a.name.as_str(),
    );
    Selection {
        character,
        variant,
        accessories,
    }
}

/// The roll state machine: `Idle → Rolling → Completing → Idle`.
///
/// The engine computes each frame deterministically from its state and the
/// roller; it never sleeps. The driving adapter waits out each tick's
/// delay, which keeps steps strictly sequential, and calls `finish` once
/// the completion effects (confetti) are done, restoring `Idle`.
pub struct RollEngine {
    schedule: RollSchedule,
    phase: RollPhase,
    step: u32,
    delay_ms: f64,
    card: Option<Card>,
    pub log: RollLog,
    pub hooks: Vec<Box<dyn RollHook>>,
}

impl RollEngine {
    pub fn new(schedule: RollSchedule) -> Self {
        Self {
            schedule,
            phase: RollPhase::Idle,
            step: 0,
            delay_ms: schedule.initial_delay_ms,
            card: None,
            log: RollLog::default(),
            hooks: Vec::new(),
        }
    }

    pub fn schedule(&self) -> RollSchedule {
        self.schedule
    }

    pub fn phase(&self) -> RollPhase {
        self.phase
    }

    pub fn add_hook<H: RollHook + 'static>(&mut self, hook: H) {
        self.hooks.push(Box::new(hook));
    }

    pub fn take_log(&mut self) -> RollLog {
        std::mem::take(&mut self.log)
    }

    pub fn save_log(&self, path: &std::path::Path) -> anyhow::Result<()> {
        self.log.save(path)
    }

    /// Begins a roll. Fails while a roll or its completion effects are in
    /// flight; this guard is the sole protection against overlapping
    /// rolls, mirroring the hidden roll button in the original page.
    pub fn start(&mut self) -> anyhow::Result<()> {
        if self.phase != RollPhase::Idle {
            anyhow::bail!("a roll is already in flight");
        }
        self.phase = RollPhase::Rolling;
        self.step = 0;
        self.delay_ms = self.schedule.initial_delay_ms;
        self.card = None;
        self.log.record(RollEvent::RollStarted);
        for hook in &mut self.hooks {
            hook.on_roll_start();
        }
        Ok(())
    }

    /// Draws the next frame while `Rolling`, or returns `None` once every
    /// step has been drawn (or no roll is in flight). The last tick moves
    /// the engine into `Completing`.
    pub fn tick(
        &mut self,
        catalog: &Catalog,
        exclusions: &Exclusions,
        show_variants: bool,
        roller: &mut Roller,
    ) -> Option<RollTick> {
        if self.phase != RollPhase::Rolling {
            return None;
        }

        let selection = draw_selection(catalog, exclusions, show_variants, roller);
        let card = Card::compose(
            selection.character,
            selection.variant,
            selection.accessories,
            show_variants,
        );
        let step = self.step;
        let delay = Duration::from_secs_f64(self.delay_ms / 1000.0);

        self.log.record(RollEvent::StepDrawn {
            step,
            character: card.character.clone(),
        });
        self.card = Some(card.clone());
        self.delay_ms *= self.schedule.decay;
        self.step += 1;
        if self.step == self.schedule.steps {
            self.phase = RollPhase::Completing;
        }

        for hook in &mut self.hooks {
            hook.on_step(&card, step, delay);
        }

        Some(RollTick { step, card, delay })
    }

    /// Seals the roll after the last tick: logs the landing, notifies
    /// hooks, and hands the final card to the caller so it can arm the
    /// confetti batch and the reroll bindings.
    pub fn complete(&mut self) -> anyhow::Result<CompletedRoll> {
        if self.phase != RollPhase::Completing {
            anyhow::bail!("no roll is awaiting completion");
        }
        let Some(card) = self.card.take() else {
            anyhow::bail!("the roll was already completed");
        };
        self.log.record(RollEvent::RollCompleted { card: card.clone() });
        for hook in &mut self.hooks {
            hook.on_roll_complete(&card);
        }
        Ok(CompletedRoll {
            card,
            finished_at: chrono::Utc::now(),
        })
    }

    /// Returns to `Idle` once the completion effects have run, making the
    /// roll affordance available again.
    pub fn finish(&mut self) -> anyhow::Result<()> {
        if self.phase != RollPhase::Completing {
            anyhow::bail!("no roll to finish");
        }
        self.phase = RollPhase::Idle;
        Ok(())
    }

    /// Drives a whole roll synchronously: `start`, one `tick` per step
    /// with `wait` called on each yielded delay, then `complete`. The
    /// engine is left in `Completing`; call `finish` after the completion
    /// effects.
    pub fn run(
        &mut self,
        catalog: &Catalog,
        exclusions: &Exclusions,
        show_variants: bool,
        roller: &mut Roller,
        mut wait: impl FnMut(Duration),
    ) -> anyhow::Result<CompletedRoll> {
        self.start()?;
        while let Some(tick) = self.tick(catalog, exclusions, show_variants, roller) {
            wait(tick.delay);
        }
        self.complete()
    }
}

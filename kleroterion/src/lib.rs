pub mod catalog;
pub mod confetti;
pub mod exclusions;
pub mod roll;
pub mod sampler;

pub mod prelude {
    pub use crate::{
        catalog::{Accessory, Catalog, CatalogError, Character, Variant},
        confetti::{
            CONFETTI_DURATION, CONFETTI_PIECES, ConfettiBatch, ConfettiColor, Particle, Viewport,
        },
        exclusions::Exclusions,
        roll::{
            card::{AccessorySlot, Card, CardSlot, SlotUpdate},
            engine::{
                CompletedRoll, RollEngine, RollPhase, RollSchedule, RollTick, draw_character,
                draw_selection,
            },
            hook::RollHook,
            logging::{RollEvent, RollLog},
            reroll::Reroller,
        },
        sampler::{Roller, pick_avoiding, pick_distinct_pair, pick_filtered, pick_uniform},
    };
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::prelude::*;

    #[test]
    fn test_demo() -> anyhow::Result<()> {
        let catalog = Catalog::new(
            vec![
                Character::new(
                    "Fox",
                    vec![Variant::from_name("Fox"), Variant::from_name("Red Fox")],
                ),
                Character::new(
                    "Raccoon",
                    vec![
                        Variant::from_name("Raccoon"),
                        Variant::from_name("Bandit Raccoon"),
                    ],
                ),
                Character::new("Owl", vec![Variant::from_name("Owl")]),
            ],
            vec![
                Accessory::new("Hat", "Hat.webp"),
                Accessory::new("Scarf", "Scarf.webp"),
                Accessory::new("Badge", "Badge.webp"),
                Accessory::new("Lantern", "Lantern.webp"),
            ],
        )?;

        let mut exclusions = Exclusions::new();
        exclusions.exclude_character("Raccoon");

        let mut roller = Roller::from_seed(42);
        let mut engine = RollEngine::new(RollSchedule::default());

        let mut delays = Vec::new();
        let completed = engine.run(&catalog, &exclusions, true, &mut roller, |d| {
            delays.push(d);
        })?;
        assert_eq!(delays.len(), 25);
        assert_ne!(completed.card.character, "Raccoon");
        let [a, b] = &completed.card.accessories;
        assert_ne!(a.name, b.name);

        // Completion effects: confetti burst plus fresh reroll bindings.
        let mut confetti = ConfettiBatch::launch(
            Viewport {
                width: 1280.0,
                height: 720.0,
            },
            &mut roller,
        );
        engine.log.record(RollEvent::ConfettiLaunched {
            pieces: confetti.particles().len(),
        });
        assert_eq!(confetti.particles().len(), CONFETTI_PIECES);
        let mut elapsed = Duration::ZERO;
        let frame = Duration::from_millis(30);
        while !confetti.expired(elapsed) {
            confetti.advance();
            elapsed += frame;
        }

        let mut reroller = Reroller::bind(&completed);
        let accessory_before = reroller.card().accessories[0].name.clone();
        let update = reroller.reroll_accessory(0, &catalog, &exclusions, &mut roller)?;
        assert_ne!(update.name, accessory_before);
        engine.log.record(RollEvent::SlotRerolled {
            slot: update.slot,
            name: update.name,
        });
        let update = reroller.reroll_character(&catalog, &exclusions, true, &mut roller)?;
        assert_ne!(reroller.card().character, "Raccoon");
        engine.log.record(RollEvent::SlotRerolled {
            slot: update.slot,
            name: update.name,
        });

        engine.finish()?;
        assert_eq!(engine.phase(), RollPhase::Idle);

        // 25 quiet step frames plus start/completed/confetti/reroll markers.
        assert_eq!(engine.log.len(), 30);
        let rerolls = engine
            .take_log()
            .into_iter()
            .filter(|e| matches!(e, RollEvent::SlotRerolled { .. }))
            .count();
        assert_eq!(rerolls, 2);

        Ok(())
    }
}

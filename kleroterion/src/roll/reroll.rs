use crate::{
    catalog::Catalog,
    exclusions::Exclusions,
    roll::{
        card::{Card, CardSlot, SlotUpdate},
        engine::{CompletedRoll, draw_character},
    },
    sampler::{Roller, pick_avoiding},
};

/// Single-step re-selection of individual card slots after a roll has
/// completed. Bound to that roll's final card; binding a fresh `Reroller`
/// for the next roll is what discards the previous one, so handlers never
/// stack.
///
/// Slots are independent: a character reroll leaves both accessory slots
/// untouched and vice versa. There is no animation, just an immediate
/// in-place update through the card's slot handles. Each reroll returns
/// the applied `SlotUpdate`; recording it (`RollEvent::SlotRerolled`)
/// stays with the caller that owns the roll log.
#[derive(Debug, Clone, PartialEq)]
pub struct Reroller {
    card: Card,
}

impl Reroller {
    pub fn bind(completed: &CompletedRoll) -> Self {
        Self {
            card: completed.card.clone(),
        }
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    /// Draws a replacement character (and variant, when variant display is
    /// enabled) and updates the character slot in place.
    pub fn reroll_character(
        &mut self,
        catalog: &Catalog,
        exclusions: &Exclusions,
        show_variants: bool,
        roller: &mut Roller,
    ) -> anyhow::Result<SlotUpdate> {
        let (character, variant) = draw_character(catalog, exclusions, show_variants, roller);
        let update = SlotUpdate {
            slot: CardSlot::Character,
            name: character.name.clone(),
            variant: show_variants.then(|| variant.name.clone()),
            image: variant.image.clone(),
        };
        self.card.apply(&update)?;
        Ok(update)
    }

    /// Draws a replacement for one accessory slot, avoiding the item it
    /// currently shows (unless that item is the only eligible identity),
    /// and updates only that slot.
    pub fn reroll_accessory(
        &mut self,
        index: usize,
        catalog: &Catalog,
        exclusions: &Exclusions,
        roller: &mut Roller,
    ) -> anyhow::Result<SlotUpdate> {
        let Some(current) = self.card.accessories.get(index) else {
            anyhow::bail!("no accessory slot {index} on this card");
        };
        let replacement = pick_avoiding(
            roller,
            &catalog.accessories,
            &exclusions.accessories,
            |a| a.name.as_str(),
            &current.name,
        );
        let update = SlotUpdate {
            slot: CardSlot::Accessory(index),
            name: replacement.name.clone(),
            variant: None,
            image: replacement.image.clone(),
        };
        self.card.apply(&update)?;
        Ok(update)
    }
}

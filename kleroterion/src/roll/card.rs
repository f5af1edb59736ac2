use serde::{Deserialize, Serialize};

use crate::catalog::{Accessory, Character, Variant};

/// Stable handle addressing one rerollable element of a rendered card.
/// Handles are established when the card is composed and stay valid for
/// the card's lifetime, so reroll updates never re-derive their target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardSlot {
    Character,
    Accessory(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessorySlot {
    pub name: String,
    pub image: String,
}

impl From<&Accessory> for AccessorySlot {
    fn from(accessory: &Accessory) -> Self {
        Self {
            name: accessory.name.clone(),
            image: accessory.image.clone(),
        }
    }
}

/// A single in-place update to one slot of a card, produced by a reroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotUpdate {
    pub slot: CardSlot,
    pub name: String,
    /// Variant name to display; only meaningful for the character slot,
    /// and `None` when variant display is off.
    pub variant: Option<String>,
    pub image: String,
}

/// The renderable description of one drawn loadout: a character, its
/// variant's image, an optional variant name, and two accessories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub character: String,
    pub variant: Option<String>,
    pub image: String,
    pub accessories: [AccessorySlot; 2],
}

impl Card {
    pub fn compose(
        character: &Character,
        variant: &Variant,
        accessories: (&Accessory, &Accessory),
        show_variant: bool,
    ) -> Self {
        Self {
            character: character.name.clone(),
            variant: show_variant.then(|| variant.name.clone()),
            image: variant.image.clone(),
            accessories: [accessories.0.into(), accessories.1.into()],
        }
    }

    /// Applies a reroll update to exactly the slot it addresses. The two
    /// accessory slots and the character slot are independent.
    pub fn apply(&mut self, update: &SlotUpdate) -> anyhow::Result<()> {
        match update.slot {
            CardSlot::Character => {
                self.character = update.name.clone();
                self.variant = update.variant.clone();
                self.image = update.image.clone();
            }
            CardSlot::Accessory(index) => {
                let Some(slot) = self.accessories.get_mut(index) else {
                    anyhow::bail!("no accessory slot {index} on this card");
                };
                slot.name = update.name.clone();
                slot.image = update.image.clone();
            }
        }
        Ok(())
    }

    pub fn pretty_print(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        write!(f, "{}", self.character)?;
        if let Some(variant) = &self.variant {
            write!(f, " ({variant})")?;
        }
        write!(
            f,
            " with {} + {}",
            self.accessories[0].name, self.accessories[1].name
        )
    }
}

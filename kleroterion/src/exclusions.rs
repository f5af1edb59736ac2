use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// The per-category exclusion sets, keyed by item name.
///
/// Only the embedding application mutates these (the settings editor in
/// the original page, the `--exclude-*` flags in the CLI); the sampling
/// core receives a reference at each draw and never writes through it.
/// An exclusion set that covers an entire category never stalls a draw:
/// the samplers fall back to the unfiltered pool.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exclusions {
    pub characters: FxHashSet<String>,
    pub variants: FxHashSet<String>,
    pub accessories: FxHashSet<String>,
}

impl Exclusions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exclude_character(&mut self, name: impl Into<String>) {
        self.characters.insert(name.into());
    }

    pub fn exclude_variant(&mut self, name: impl Into<String>) {
        self.variants.insert(name.into());
    }

    pub fn exclude_accessory(&mut self, name: impl Into<String>) {
        self.accessories.insert(name.into());
    }

    pub fn restore_character(&mut self, name: &str) {
        self.characters.remove(name);
    }

    pub fn restore_variant(&mut self, name: &str) {
        self.variants.remove(name);
    }

    pub fn restore_accessory(&mut self, name: &str) {
        self.accessories.remove(name);
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty() && self.variants.is_empty() && self.accessories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclude_and_restore() {
        let mut exclusions = Exclusions::new();
        assert!(exclusions.is_empty());

        exclusions.exclude_character("Fox");
        exclusions.exclude_accessory("Hat");
        assert!(exclusions.characters.contains("Fox"));
        assert!(exclusions.accessories.contains("Hat"));
        assert!(!exclusions.is_empty());

        exclusions.restore_character("Fox");
        exclusions.restore_accessory("Hat");
        assert!(exclusions.is_empty());
    }
}

use std::{io::Read, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Extension appended to slugified variant names when the catalog only
/// provides a bare name.
pub const VARIANT_IMAGE_EXT: &str = ".webp";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog has no characters")]
    NoCharacters,
    #[error("catalog has no accessories")]
    NoAccessories,
    #[error("character {0:?} has no variants")]
    NoVariants(String),
}

/// A cosmetic look for a character. Catalogs may spell a variant as a bare
/// name string or as a full record; both normalize to this shape at
/// ingestion, and nothing downstream branches on the original spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    pub name: String,
    pub image: String,
}

impl Variant {
    /// Normalizes a bare name: whitespace runs collapse to `_`, then the
    /// fixed image extension is appended.
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        let image = slugify_image(&name);
        Self { name, image }
    }
}

impl<'de> Deserialize<'de> for Variant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Name(String),
            Record { name: String, image: String },
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Name(name) => Variant::from_name(name),
            Raw::Record { name, image } => Variant { name, image },
        })
    }
}

pub fn slugify_image(name: &str) -> String {
    let mut slug = String::with_capacity(name.len() + VARIANT_IMAGE_EXT.len());
    let mut in_whitespace = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('_');
            }
            in_whitespace = true;
        } else {
            slug.push(c);
            in_whitespace = false;
        }
    }
    slug.push_str(VARIANT_IMAGE_EXT);
    slug
}

/// A rollable character. The first variant is the character's default look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub variants: Vec<Variant>,
}

impl Character {
    pub fn new(name: impl Into<String>, variants: Vec<Variant>) -> Self {
        Self {
            name: name.into(),
            variants,
        }
    }

    pub fn default_variant(&self) -> &Variant {
        &self.variants[0]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accessory {
    pub name: String,
    pub image: String,
}

impl Accessory {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
        }
    }
}

/// The full set of rollable entries, immutable for the session.
///
/// Validation guarantees every category is non-empty and every character
/// has at least one variant, so `default_variant` and the samplers never
/// see an empty pool outside of exclusion filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub characters: Vec<Character>,
    pub accessories: Vec<Accessory>,
}

impl Catalog {
    pub fn new(
        characters: Vec<Character>,
        accessories: Vec<Accessory>,
    ) -> Result<Self, CatalogError> {
        Self {
            characters,
            accessories,
        }
        .validated()
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_reader(reader)?;
        catalog.validated()
    }

    fn validated(self) -> Result<Self, CatalogError> {
        if self.characters.is_empty() {
            return Err(CatalogError::NoCharacters);
        }
        if self.accessories.is_empty() {
            return Err(CatalogError::NoAccessories);
        }
        if let Some(character) = self.characters.iter().find(|c| c.variants.is_empty()) {
            return Err(CatalogError::NoVariants(character.name.clone()));
        }
        Ok(self)
    }
}

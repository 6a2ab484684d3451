//! Guessable entity catalog.
//!
//! The catalog is ordered and append-only across releases: the daily selector
//! indexes into it, so removing or reordering entries would change which
//! entity an already-published date resolves to.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hasher;
use thiserror::Error;
use twox_hash::XxHash64;

const BUNDLED_CATALOG: &str = include_str!("../data/catalog.json");

/// A single guessable character with its five displayed attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub name: String,
    pub house: String,
    pub blood_status: String,
    /// May hold a composite value such as `Human/Giant`.
    pub species: String,
    pub first_appearance: String,
    pub occupation: String,
}

impl Entity {
    /// Value of the given attribute.
    #[must_use]
    pub fn attribute(&self, attribute: Attribute) -> &str {
        match attribute {
            Attribute::House => &self.house,
            Attribute::BloodStatus => &self.blood_status,
            Attribute::Species => &self.species,
            Attribute::FirstAppearance => &self.first_appearance,
            Attribute::Occupation => &self.occupation,
        }
    }

    /// Identity check on the unique key, independent of displayed attributes.
    #[must_use]
    pub fn same_key(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// The fixed attribute schema, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    House,
    BloodStatus,
    Species,
    FirstAppearance,
    Occupation,
}

impl Attribute {
    pub const ALL: [Self; 5] = [
        Self::House,
        Self::BloodStatus,
        Self::Species,
        Self::FirstAppearance,
        Self::Occupation,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::House => "House",
            Self::BloodStatus => "Blood Status",
            Self::Species => "Species",
            Self::FirstAppearance => "First Appearance",
            Self::Occupation => "Occupation",
        }
    }

    /// Whether values may be `/`-delimited composites eligible for partial matches.
    #[must_use]
    pub const fn is_multi_valued(self) -> bool {
        matches!(self, Self::Species)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors raised while constructing a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON could not be parsed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog contains no entities")]
    Empty,
    #[error("entity #{index} has a blank name")]
    BlankName { index: usize },
}

/// Immutable, versioned, ordered list of entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CatalogDocument")]
pub struct Catalog {
    version: u32,
    entities: Vec<Entity>,
}

/// Unchecked wire shape of a catalog asset.
#[derive(Deserialize)]
struct CatalogDocument {
    version: u32,
    entities: Vec<Entity>,
}

impl TryFrom<CatalogDocument> for Catalog {
    type Error = CatalogError;

    fn try_from(doc: CatalogDocument) -> Result<Self, Self::Error> {
        Self::from_entities(doc.version, doc.entities)
    }
}

impl Catalog {
    /// Load the catalog shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded asset is malformed.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Parse a catalog document of the form `{ "version": n, "entities": [...] }`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or the catalog is invalid.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = serde_json::from_str(json)?;
        doc.try_into()
    }

    /// Build a catalog from pre-parsed entities.
    ///
    /// Repeated names are tolerated (and reported) because dropping them would
    /// shift the index of every later entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or an entity has a blank name.
    pub fn from_entities(version: u32, entities: Vec<Entity>) -> Result<Self, CatalogError> {
        if entities.is_empty() {
            return Err(CatalogError::Empty);
        }
        if let Some(index) = entities.iter().position(|e| e.name.trim().is_empty()) {
            return Err(CatalogError::BlankName { index });
        }
        let catalog = Self { version, entities };
        for name in catalog.duplicate_names() {
            log::warn!("catalog v{version} repeats entity name {name:?}; first entry wins on lookup");
        }
        Ok(catalog)
    }

    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    /// Exact, case-sensitive lookup by unique key.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Resolve free-form guess text to an entity.
    ///
    /// Matching ignores letter case and is otherwise exact, except that
    /// surrounding whitespace is trimmed first so a stray space from a text
    /// field still resolves. Partial names never resolve.
    #[must_use]
    pub fn resolve(&self, raw: &str) -> Option<&Entity> {
        let needle = raw.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.entities
            .iter()
            .find(|e| e.name.to_lowercase() == needle)
    }

    /// Names that appear more than once, in first-seen order.
    #[must_use]
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut dupes = Vec::new();
        for entity in &self.entities {
            let name = entity.name.as_str();
            if !seen.insert(name) && reported.insert(name) {
                dupes.push(name);
            }
        }
        dupes
    }

    /// Content fingerprint used to tag the persisted session with the catalog
    /// revision it was played against.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = XxHash64::with_seed(u64::from(self.version));
        for entity in &self.entities {
            hasher.write(entity.name.as_bytes());
            for attribute in Attribute::ALL {
                hasher.write_u8(0x1f);
                hasher.write(entity.attribute(attribute).as_bytes());
            }
            hasher.write_u8(0x1e);
        }
        hasher.finish()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_catalog_loads_in_published_order() {
        let catalog = Catalog::bundled().unwrap();
        assert_eq!(catalog.len(), 47);
        assert_eq!(catalog.version(), 1);
        assert_eq!(catalog.get(0).unwrap().name, "Harry Potter");
        assert_eq!(catalog.get(46).unwrap().name, "Remus Lupin");
    }

    #[test]
    fn resolve_ignores_case_and_whitespace() {
        let catalog = Catalog::bundled().unwrap();
        let hit = catalog.resolve("  hermione GRANGER ").unwrap();
        assert_eq!(hit.name, "Hermione Granger");
        assert!(catalog.resolve("Hermione").is_none());
        assert!(catalog.resolve("   ").is_none());
    }

    #[test]
    fn duplicate_names_are_reported_once() {
        let catalog = Catalog::bundled().unwrap();
        assert_eq!(
            catalog.duplicate_names(),
            vec!["Fleur Delacour", "Nymphadora Tonks"]
        );
        let first = catalog.resolve("fleur delacour").unwrap();
        assert_eq!(first.species, "Part-veela");
    }

    #[test]
    fn fingerprint_tracks_content() {
        let catalog = Catalog::bundled().unwrap();
        assert_eq!(catalog.fingerprint(), catalog.clone().fingerprint());

        let mut entities = catalog.entities().to_vec();
        entities.push(fixtures::entity("Dobby", "Unknown", "House-elf"));
        let extended = Catalog::from_entities(catalog.version(), entities).unwrap();
        assert_ne!(catalog.fingerprint(), extended.fingerprint());
    }

    #[test]
    fn rejects_empty_and_blank_catalogs() {
        assert!(matches!(
            Catalog::from_json(r#"{"version":1,"entities":[]}"#),
            Err(CatalogError::Empty)
        ));
        let blank = vec![fixtures::entity(" ", "Gryffindor", "Human")];
        assert!(matches!(
            Catalog::from_entities(1, blank),
            Err(CatalogError::BlankName { index: 0 })
        ));
        assert!(matches!(
            Catalog::from_json("not json"),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn deserializing_validates_like_from_entities() {
        let empty = serde_json::from_str::<Catalog>(r#"{"version":1,"entities":[]}"#);
        assert!(empty.unwrap_err().to_string().contains("no entities"));

        let catalog = Catalog::bundled().unwrap();
        let json = serde_json::to_string(&catalog).unwrap();
        let reparsed: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(reparsed, catalog);
    }

    #[test]
    fn attribute_accessors_follow_schema() {
        let e = fixtures::entity("Rubeus Hagrid", "Gryffindor", "Human/Giant");
        assert_eq!(e.attribute(Attribute::Species), "Human/Giant");
        assert_eq!(e.attribute(Attribute::House), "Gryffindor");
        assert!(Attribute::Species.is_multi_valued());
        assert!(!Attribute::House.is_multi_valued());
        assert_eq!(Attribute::BloodStatus.to_string(), "Blood Status");
    }
}

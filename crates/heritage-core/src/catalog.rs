//! Catalog model and loader.
//!
//! The catalog is loaded once at startup and never mutated afterwards.  Raw
//! records from TOML or JSON are validated into `CatalogItem`s here, so an
//! unknown category or a malformed duration is a load-time fault instead of a
//! silent filter mismatch later on.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Catalog shipped with the binary.
const BUNDLED_CATALOG: &str = include_str!("../assets/catalog.toml");

// ── Identifiers ───────────────────────────────────────────────────────────────

/// Opaque, unique item identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to the media behind an item.  Never dereferenced by the core; a
/// playback backend is free to interpret it as a path or URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(String);

impl MediaRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ── Categories ────────────────────────────────────────────────────────────────

/// Closed set of catalog categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    History,
    Culture,
    Legends,
    People,
    Architecture,
    Religious,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::History,
        Category::Culture,
        Category::Legends,
        Category::People,
        Category::Architecture,
        Category::Religious,
    ];

    /// Wire/config name (`"history"`, `"culture"`, …).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::History => "history",
            Self::Culture => "culture",
            Self::Legends => "legends",
            Self::People => "people",
            Self::Architecture => "architecture",
            Self::Religious => "religious",
        }
    }

    /// Human label for tabs.
    pub fn label(self) -> &'static str {
        match self {
            Self::History => "History",
            Self::Culture => "Culture",
            Self::Legends => "Legends",
            Self::People => "People",
            Self::Architecture => "Architecture",
            Self::Religious => "Religious",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category {0:?}")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// Category filter: the `all` sentinel or one concrete category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(c) => c.label(),
        }
    }

    /// Every filter value in tab order, `All` first.
    pub fn cycle() -> impl Iterator<Item = CategoryFilter> {
        std::iter::once(Self::All).chain(Category::ALL.into_iter().map(Self::Only))
    }

    pub fn next(self) -> Self {
        let all: Vec<_> = Self::cycle().collect();
        let pos = all.iter().position(|&f| f == self).unwrap_or(0);
        all[(pos + 1) % all.len()]
    }

    pub fn prev(self) -> Self {
        let all: Vec<_> = Self::cycle().collect();
        let pos = all.iter().position(|&f| f == self).unwrap_or(0);
        if pos == 0 {
            all[all.len() - 1]
        } else {
            all[pos - 1]
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

// ── Items ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A physical place with visiting information.
    Site,
    /// An audio story told by a narrator.
    Narration,
}

impl FromStr for ItemKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "site" => Ok(Self::Site),
            "narration" | "story" => Ok(Self::Narration),
            _ => Err(()),
        }
    }
}

/// Presentation-only metadata.  None of it takes part in filtering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemDetails {
    pub language: Option<String>,
    pub plays: Option<String>,
    pub period: Option<String>,
    pub location: Option<String>,
    pub distance: Option<String>,
    pub significance: Option<String>,
    pub full_description: Option<String>,
    pub features: Vec<String>,
    pub visiting_hours: Option<String>,
    pub entry_fee: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub kind: ItemKind,
    pub category: Category,
    pub title: String,
    pub description: String,
    /// Narrator for stories, author/curator for sites.  May be empty.
    pub narrator: String,
    /// Nominal length, used only to turn a progress percentage into a clock.
    pub duration_secs: u32,
    pub media: MediaRef,
    pub details: ItemDetails,
}

impl CatalogItem {
    /// Authored duration as `m:ss`.
    pub fn duration_label(&self) -> String {
        format_clock(self.duration_secs)
    }

    /// Text fields the free-text search looks at.
    pub fn search_fields(&self) -> [&str; 3] {
        [&self.title, &self.description, &self.narrator]
    }

    /// One-line text for sharing.
    pub fn share_text(&self) -> String {
        let mut out = self.title.clone();
        if !self.narrator.is_empty() {
            out.push_str(", narrated by ");
            out.push_str(&self.narrator);
        }
        out.push_str(&format!(" ({})", self.duration_label()));
        out
    }
}

/// One hero slide for the landing carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub image: MediaRef,
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("item {id}: unknown category {value:?}")]
    UnknownCategory { id: ItemId, value: String },
    #[error("item {id}: unknown kind {value:?}")]
    UnknownKind { id: ItemId, value: String },
    #[error("item {id}: invalid duration {value:?} (expected m:ss)")]
    InvalidDuration { id: ItemId, value: String },
    #[error("item {0}: title is empty")]
    EmptyTitle(ItemId),
    #[error("duplicate item id {0}")]
    DuplicateId(ItemId),
    #[error("unsupported catalog format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML catalog: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),
}

// ── On-disk schema ────────────────────────────────────────────────────────────

/// Matches the `[[item]]` / `[[slide]]` tables.  Category and kind stay plain
/// strings so validation can report them with the offending item id.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "item")]
    items: Vec<RawItem>,
    #[serde(default, rename = "slide")]
    slides: Vec<Slide>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    id: u32,
    kind: String,
    category: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    narrator: String,
    duration: String,
    media: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    plays: Option<String>,
    #[serde(default)]
    period: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    distance: Option<String>,
    #[serde(default)]
    significance: Option<String>,
    #[serde(default)]
    full_description: Option<String>,
    #[serde(default)]
    features: Vec<String>,
    #[serde(default)]
    visiting_hours: Option<String>,
    #[serde(default)]
    entry_fee: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

impl RawItem {
    fn validate(self) -> Result<CatalogItem, CatalogError> {
        let id = ItemId(self.id);
        let category = self
            .category
            .parse::<Category>()
            .map_err(|_| CatalogError::UnknownCategory {
                id,
                value: self.category.clone(),
            })?;
        let kind = self
            .kind
            .parse::<ItemKind>()
            .map_err(|_| CatalogError::UnknownKind {
                id,
                value: self.kind.clone(),
            })?;
        let duration_secs =
            parse_duration(&self.duration).ok_or_else(|| CatalogError::InvalidDuration {
                id,
                value: self.duration.clone(),
            })?;
        if self.title.trim().is_empty() {
            return Err(CatalogError::EmptyTitle(id));
        }

        Ok(CatalogItem {
            id,
            kind,
            category,
            title: self.title,
            description: self.description,
            narrator: self.narrator,
            duration_secs,
            media: MediaRef::new(self.media),
            details: ItemDetails {
                language: self.language,
                plays: self.plays,
                period: self.period,
                location: self.location,
                distance: self.distance,
                significance: self.significance,
                full_description: self.full_description,
                features: self.features,
                visiting_hours: self.visiting_hours,
                entry_fee: self.entry_fee,
                image: self.image,
            },
        })
    }
}

// ── Catalog ───────────────────────────────────────────────────────────────────

/// Immutable, ordered item collection plus the hero slides.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    slides: Vec<Slide>,
}

impl Catalog {
    /// Build a catalog from already-validated items.  Ids must be unique.
    pub fn new(items: Vec<CatalogItem>, slides: Vec<Slide>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id) {
                return Err(CatalogError::DuplicateId(item.id));
            }
        }
        Ok(Self { items, slides })
    }

    /// The catalog embedded in the binary.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUNDLED_CATALOG)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::from_file(file)
    }

    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(content)?;
        Self::from_file(file)
    }

    /// Load from a `.toml` or `.json` file, picked by extension.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let content = std::fs::read_to_string(path)?;
        let catalog = match ext.as_deref() {
            Some("toml") => Self::from_toml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            _ => return Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
        };
        info!(
            "catalog: loaded {} items, {} slides from {}",
            catalog.items.len(),
            catalog.slides.len(),
            path.display()
        );
        Ok(catalog)
    }

    fn from_file(file: CatalogFile) -> Result<Self, CatalogError> {
        let items = file
            .items
            .into_iter()
            .map(RawItem::validate)
            .collect::<Result<Vec<_>, _>>()?;
        debug!("catalog: validated {} items", items.len());
        Self::new(items, file.slides)
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn get(&self, id: ItemId) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item count per filter value, in tab order (`All` first).
    pub fn category_counts(&self) -> Vec<(CategoryFilter, usize)> {
        CategoryFilter::cycle()
            .map(|filter| {
                let n = self
                    .items
                    .iter()
                    .filter(|item| filter.matches(item.category))
                    .count();
                (filter, n)
            })
            .collect()
    }
}

// ── Clock helpers ─────────────────────────────────────────────────────────────

/// Parse `m:ss` or `h:mm:ss` into seconds.
pub fn parse_duration(text: &str) -> Option<u32> {
    let parts: Vec<&str> = text.trim().split(':').collect();
    let nums = parts
        .iter()
        .map(|p| {
            if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
                None
            } else {
                p.parse::<u32>().ok()
            }
        })
        .collect::<Option<Vec<u32>>>()?;
    match nums.as_slice() {
        // Checked so an absurd hour/minute count is rejected, not wrapped.
        [m, s] if *s < 60 && parts[1].len() == 2 => m.checked_mul(60)?.checked_add(*s),
        [h, m, s] if *m < 60 && *s < 60 && parts[2].len() == 2 => h
            .checked_mul(3600)?
            .checked_add(m * 60)?
            .checked_add(*s),
        _ => None,
    }
}

/// Format seconds as `m:ss`, or `h:mm:ss` past an hour.
pub fn format_clock(secs: u32) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"
[[item]]
id = 7
kind = "narration"
category = "History"
title = "Gates of the Old City"
narrator = "Dr. Selam"
duration = "3:05"
media = "gates.mp3"

[[slide]]
title = "Ancient Walls"
image = "/hero.png"
"#;

    #[test]
    fn bundled_catalog_loads() {
        let catalog = Catalog::bundled().unwrap();
        assert_eq!(catalog.len(), 8);
        assert_eq!(catalog.slides().len(), 4);
        let walls = catalog.get(ItemId(2)).unwrap();
        assert_eq!(walls.category, Category::History);
        assert_eq!(walls.duration_secs, 6 * 60 + 15);
        assert_eq!(walls.duration_label(), "6:15");
    }

    #[test]
    fn category_names_are_case_insensitive() {
        let catalog = Catalog::from_toml_str(SMALL).unwrap();
        assert_eq!(catalog.items()[0].category, Category::History);
        assert_eq!(catalog.slides()[0].description, "");
    }

    #[test]
    fn unknown_category_is_a_load_fault() {
        let bad = SMALL.replace("History", "cuisine");
        match Catalog::from_toml_str(&bad) {
            Err(CatalogError::UnknownCategory { id, value }) => {
                assert_eq!(id, ItemId(7));
                assert_eq!(value, "cuisine");
            }
            other => panic!("expected UnknownCategory, got {:?}", other),
        }
    }

    #[test]
    fn malformed_duration_is_rejected() {
        let bad = SMALL.replace("3:05", "3:5");
        assert!(matches!(
            Catalog::from_toml_str(&bad),
            Err(CatalogError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn oversized_duration_is_rejected_not_wrapped() {
        assert_eq!(parse_duration("99999999:00"), None);
        assert_eq!(parse_duration("9999999:00:00"), None);
        for huge in ["99999999:00", "9999999:00:00"] {
            let bad = SMALL.replace("3:05", huge);
            match Catalog::from_toml_str(&bad) {
                Err(CatalogError::InvalidDuration { id, value }) => {
                    assert_eq!(id, ItemId(7));
                    assert_eq!(value, huge);
                }
                other => panic!("expected InvalidDuration, got {:?}", other),
            }
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let doubled = format!("{}\n{}", SMALL, SMALL.split("[[slide]]").next().unwrap());
        assert!(matches!(
            Catalog::from_toml_str(&doubled),
            Err(CatalogError::DuplicateId(ItemId(7)))
        ));
    }

    #[test]
    fn json_catalog_uses_same_schema() {
        let json = r#"{
            "item": [{
                "id": 1, "kind": "site", "category": "religious",
                "title": "Grand Mosque", "duration": "5:30", "media": "m.mp3",
                "features": ["Spiritual Site"]
            }]
        }"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        let item = &catalog.items()[0];
        assert_eq!(item.kind, ItemKind::Site);
        assert_eq!(item.details.features, vec!["Spiritual Site".to_string()]);
        assert!(catalog.slides().is_empty());
    }

    #[test]
    fn parse_and_format_clock() {
        assert_eq!(parse_duration("4:32"), Some(272));
        assert_eq!(parse_duration("1:02:03"), Some(3723));
        assert_eq!(parse_duration("4:75"), None);
        assert_eq!(parse_duration("abc"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(3723), "1:02:03");
    }

    #[test]
    fn category_counts_start_with_all() {
        let catalog = Catalog::bundled().unwrap();
        let counts = catalog.category_counts();
        assert_eq!(counts[0], (CategoryFilter::All, 8));
        let culture = counts
            .iter()
            .find(|(f, _)| *f == CategoryFilter::Only(Category::Culture))
            .unwrap();
        assert_eq!(culture.1, 3);
    }

    #[test]
    fn filter_cycle_wraps() {
        assert_eq!(
            CategoryFilter::All.next(),
            CategoryFilter::Only(Category::History)
        );
        assert_eq!(
            CategoryFilter::All.prev(),
            CategoryFilter::Only(Category::Religious)
        );
        assert_eq!("all".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
    }
}

//! # Record Generator
//!
//! Synthesizes product attribute sets. Pure: nothing here touches storage.
//!
//! ## Determinism
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     What the seed controls                              │
//! │                                                                         │
//! │  seed = Some(7) ──► StdRng::seed_from_u64(7)                           │
//! │                        │                                                │
//! │                        ├──► name, description, category, brand         │
//! │                        └──► price, stock                               │
//! │                                                                         │
//! │  BatchTag (fresh UUID per batch) ──► SKU-{TAG}-{NNNN}                  │
//! │                                                                         │
//! │  Same seed + count  ⇒ same attribute values                            │
//! │  Two batches        ⇒ different SKUs (tag differs)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::types::NewProduct;

// =============================================================================
// Vocabulary
// =============================================================================

pub const CATEGORIES: &[&str] = &["Electronics", "Home", "Sports", "Toys", "Books"];

pub const BRANDS: &[&str] = &["Acme", "Globex", "Umbrella", "Soylent", "Initech"];

const ADJECTIVES: &[&str] = &[
    "Compact", "Wireless", "Durable", "Premium", "Eco", "Smart", "Portable", "Ultra", "Classic",
    "Hybrid",
];

const NOUNS: &[&str] = &[
    "Speaker", "Lamp", "Mixer", "Backpack", "Helmet", "Camera", "Monitor", "Keyboard", "Cooker",
    "Cleaner",
];

const BENEFITS: &[&str] = &[
    "Designed for everyday use",
    "Built with recyclable materials",
    "Engineered for long-lasting comfort",
    "Optimized for high performance",
    "Ideal for small spaces",
    "Perfect for travel and commuting",
    "Tested for rugged durability",
    "Offers seamless connectivity",
    "Features intuitive controls",
    "Includes extended battery life",
];

const FEATURES: &[&str] = &[
    "sleek design",
    "advanced sensors",
    "quick setup",
    "modern styling",
    "quiet operation",
];

/// Price range in cents: $5.00 - $999.00.
const PRICE_CENTS: std::ops::RangeInclusive<i64> = 500..=99_900;

const MAX_STOCK: i64 = 500;

// =============================================================================
// Batch Tag
// =============================================================================

/// Per-batch SKU prefix.
///
/// Twelve uppercase hex digits taken from a fresh UUID v4. Combined with the
/// in-batch counter it keeps SKUs unique within a batch by construction and
/// across batches with overwhelming probability. The store's UNIQUE
/// constraint catches the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchTag(String);

impl BatchTag {
    pub fn random() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        BatchTag(hex[..12].to_uppercase())
    }

    /// Fixed tag, for tests that need reproducible SKUs.
    pub fn fixed(tag: impl Into<String>) -> Self {
        BatchTag(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// SKU for the `index`-th product of this batch.
    pub fn sku(&self, index: u32) -> String {
        format!("SKU-{}-{:04}", self.0, index)
    }
}

// =============================================================================
// Generator
// =============================================================================

/// Seeded product generator.
///
/// ## Example
/// ```rust
/// use catalog_core::generator::{BatchTag, ProductGenerator};
///
/// let a = ProductGenerator::new(Some(42)).generate(5, &BatchTag::random());
/// let b = ProductGenerator::new(Some(42)).generate(5, &BatchTag::random());
///
/// assert_eq!(a[0].name, b[0].name);
/// assert_ne!(a[0].sku, b[0].sku);
/// ```
#[derive(Debug, Clone)]
pub struct ProductGenerator {
    rng: StdRng,
}

impl ProductGenerator {
    /// Seeds from `seed`, or from OS entropy when absent.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        ProductGenerator { rng }
    }

    /// Produces `count` attribute sets tagged with `tag`.
    pub fn generate(&mut self, count: u32, tag: &BatchTag) -> Vec<NewProduct> {
        (0..count).map(|index| self.next_product(tag, index)).collect()
    }

    fn next_product(&mut self, tag: &BatchTag, index: u32) -> NewProduct {
        let name = format!(
            "{} {} {}",
            self.pick(BRANDS),
            self.pick(ADJECTIVES),
            self.pick(NOUNS)
        );
        let description = format!("{} with {}.", self.pick(BENEFITS), self.pick(FEATURES));
        let category = self.pick(CATEGORIES).to_string();
        let brand = self.pick(BRANDS).to_string();
        let price_cents = self.rng.gen_range(PRICE_CENTS);
        let stock = self.rng.gen_range(0..=MAX_STOCK);

        NewProduct {
            sku: tag.sku(index),
            name,
            description,
            category,
            brand,
            price_cents,
            stock,
        }
    }

    fn pick(&mut self, items: &'static [&'static str]) -> &'static str {
        items[self.rng.gen_range(0..items.len())]
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_same_seed_same_attributes() {
        let a = ProductGenerator::new(Some(7)).generate(50, &BatchTag::random());
        let b = ProductGenerator::new(Some(7)).generate(50, &BatchTag::random());

        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.name, y.name);
            assert_eq!(x.description, y.description);
            assert_eq!(x.category, y.category);
            assert_eq!(x.brand, y.brand);
            assert_eq!(x.price_cents, y.price_cents);
            assert_eq!(x.stock, y.stock);
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = ProductGenerator::new(Some(1)).generate(20, &BatchTag::fixed("A"));
        let b = ProductGenerator::new(Some(2)).generate(20, &BatchTag::fixed("A"));

        assert_ne!(a, b);
    }

    #[test]
    fn test_skus_unique_within_batch() {
        let batch = ProductGenerator::new(None).generate(2000, &BatchTag::random());
        let skus: HashSet<_> = batch.iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(skus.len(), 2000);
    }

    #[test]
    fn test_attributes_in_bounds() {
        let batch = ProductGenerator::new(Some(99)).generate(300, &BatchTag::random());

        for product in &batch {
            assert!(CATEGORIES.contains(&product.category.as_str()));
            assert!(BRANDS.contains(&product.brand.as_str()));
            assert!(PRICE_CENTS.contains(&product.price_cents));
            assert!((0..=MAX_STOCK).contains(&product.stock));
            assert!(product.description.ends_with('.'));
        }
    }

    #[test]
    fn test_batch_tag_format() {
        let tag = BatchTag::random();
        assert_eq!(tag.as_str().len(), 12);
        assert!(tag.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert!(tag.as_str().chars().all(|c| !c.is_ascii_lowercase()));

        assert_eq!(BatchTag::fixed("TAG").sku(7), "SKU-TAG-0007");
    }
}

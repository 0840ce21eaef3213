//! Slug derivation and collision detection.
//!
//! A slug is the human-readable external key of a law, derived from its
//! primary abbreviation. Distinct laws occasionally share an abbreviation
//! modulo case and punctuation; those collisions need manual disambiguation
//! by the consuming store.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::types::LawDocument;

/// Characters outside the slug alphabet.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SLUG_INVALID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]").expect("valid regex"));

/// Runs of underscores.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SLUG_UNDERSCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("valid regex"));

/// German special characters and their ASCII transcriptions.
const TRANSCRIPTIONS: [(char, &str); 4] = [('ß', "ss"), ('ä', "ae"), ('ö', "oe"), ('ü', "ue")];

/// Derive a slug from an abbreviation.
///
/// # Examples
/// ```
/// use gii_ingest::slug::slugify;
///
/// assert_eq!(slugify("AbwAG"), "abwag");
/// assert_eq!(slugify("BÄrbaüV 1999"), "baerbauev_1999");
/// assert_eq!(slugify("SGB 5 § 1..3"), "sgb_5_1_3");
/// ```
#[must_use]
pub fn slugify(abbreviation: &str) -> String {
    // Composed form, so that umlauts written as base letter + diaeresis transcribe.
    let text: String = abbreviation.nfc().collect::<String>().to_lowercase();

    let mut transcribed = String::with_capacity(text.len());
    for c in text.chars() {
        match TRANSCRIPTIONS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => transcribed.push_str(to),
            None => transcribed.push(c),
        }
    }

    let text = SLUG_INVALID.replace_all(&transcribed, "_");
    SLUG_UNDERSCORES.replace_all(&text, "_").into_owned()
}

/// Laws sharing one slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugCollision {
    pub slug: String,

    /// Document identifiers of the colliding laws, in input order.
    pub doknrs: Vec<String>,
}

/// Group the laws whose slugs collide.
///
/// Collisions are returned sorted by slug.
#[must_use]
pub fn find_slug_collisions<'a>(
    laws: impl IntoIterator<Item = &'a LawDocument>,
) -> Vec<SlugCollision> {
    let mut by_slug: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for law in laws {
        by_slug.entry(law.slug()).or_default().push(law.doknr.clone());
    }

    by_slug
        .into_iter()
        .filter(|(_, doknrs)| doknrs.len() > 1)
        .map(|(slug, doknrs)| SlugCollision { slug, doknrs })
        .collect()
}

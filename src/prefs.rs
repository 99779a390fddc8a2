//! # Preference Level Mapping
//!
//! Ordinal preference levels and their engine tokens. The engine reads the
//! tokens literally: `R` forces an assignment, `P` forbids it, and the signed
//! magnitudes in between weigh it. An *unavailable* entry has no token at
//! all; such entries are left out of the document and their absence is the
//! signal the engine acts on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::RsHashMap;

/// Ordinal preference strength, from forced to forbidden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefLevel {
    /// The entry must be chosen
    Required,
    StronglyPreferred,
    Preferred,
    /// No opinion; the default for anything unmapped
    Neutral,
    Discouraged,
    StronglyDiscouraged,
    /// The entry must not be chosen
    Prohibited,
    /// The entry is not emitted at all
    Unavailable,
}

impl PrefLevel {
    /// The engine token for this level, or [`None`] for [`Unavailable`]
    ///
    /// [`Unavailable`]: PrefLevel::Unavailable
    #[must_use]
    pub fn token(self) -> Option<&'static str> {
        match self {
            PrefLevel::Required => Some("R"),
            PrefLevel::StronglyPreferred => Some("-2"),
            PrefLevel::Preferred => Some("-1"),
            PrefLevel::Neutral => Some("0"),
            PrefLevel::Discouraged => Some("1"),
            PrefLevel::StronglyDiscouraged => Some("2"),
            PrefLevel::Prohibited => Some("P"),
            PrefLevel::Unavailable => None,
        }
    }

    /// Parses a level name, accepting `snake_case`, hyphenated, and spaced
    /// spellings case-insensitively
    #[must_use]
    pub fn from_name(name: &str) -> Option<PrefLevel> {
        let normalized: String = name
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Some(match normalized.as_str() {
            "required" => PrefLevel::Required,
            "stronglypreferred" => PrefLevel::StronglyPreferred,
            "preferred" => PrefLevel::Preferred,
            "neutral" => PrefLevel::Neutral,
            "discouraged" => PrefLevel::Discouraged,
            "stronglydiscouraged" => PrefLevel::StronglyDiscouraged,
            "prohibited" => PrefLevel::Prohibited,
            "unavailable" => PrefLevel::Unavailable,
            _ => return None,
        })
    }
}

/// Resolves the numeric preference codes of a problem definition to levels
///
/// Built from the submission's `preferences` table (level name to numeric
/// code). Resolution is total: codes the table does not cover come out as
/// [`PrefLevel::Neutral`], intentional leniency so that encoding never fails
/// on arbitrary numeric input.
#[derive(Debug, Clone, Default)]
pub struct PrefMap {
    by_code: RsHashMap<i32, PrefLevel>,
}

impl PrefMap {
    /// Builds the map from a `level name -> numeric code` table
    ///
    /// Level names that are not part of the fixed vocabulary are dropped.
    #[must_use]
    pub fn from_table(table: &BTreeMap<String, i32>) -> PrefMap {
        let mut by_code = RsHashMap::default();
        for (name, &code) in table {
            match PrefLevel::from_name(name) {
                Some(level) => {
                    by_code.insert(code, level);
                }
                None => tracing::debug!(%name, "ignoring unknown preference level"),
            }
        }
        PrefMap { by_code }
    }

    /// Resolves a numeric code, falling back to [`PrefLevel::Neutral`]
    #[must_use]
    pub fn resolve(&self, code: i32) -> PrefLevel {
        self.by_code.get(&code).copied().unwrap_or(PrefLevel::Neutral)
    }
}

//! # Distribution Constraints
//!
//! Typed pairwise/group constraints between class meetings, generated from
//! the declarative flags of a submission and serialized into the document's
//! `groupConstraints` section.

/// Constraint kind, named after the engine's distribution types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistributionKind {
    /// All member meetings share one room
    SameRoom,
    /// All member meetings start at the same slot
    SameStart,
    /// Member meetings fall on different days
    DifferentDay,
    /// Member meetings do not overlap in time
    DifferentTime,
    /// Member meetings run back to back
    BackToBack,
}

impl DistributionKind {
    /// The engine's wire name for this kind
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            DistributionKind::SameRoom => "SAME_ROOM",
            DistributionKind::SameStart => "SAME_START",
            DistributionKind::DifferentDay => "DIFF_DAY",
            DistributionKind::DifferentTime => "DIFF_TIME",
            DistributionKind::BackToBack => "BTB_TIME",
        }
    }
}

/// Constraint strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strength {
    /// The engine must satisfy the constraint
    Required,
    /// The engine should satisfy the constraint
    Preferred,
}

impl Strength {
    /// The preference token carried on the wire, one of the
    /// [`PrefLevel`](crate::prefs::PrefLevel) tokens
    #[must_use]
    pub fn pref_token(self) -> &'static str {
        match self {
            Strength::Required => "R",
            Strength::Preferred => "-1",
        }
    }

    /// Whether this is [`Strength::Required`]
    #[must_use]
    pub fn is_required(self) -> bool {
        matches!(self, Strength::Required)
    }
}

/// One generated constraint over an ordered set of meetings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    /// Fresh id from the constraint namespace
    pub id: u32,
    /// Constraint kind
    pub kind: DistributionKind,
    /// Strength
    pub strength: Strength,
    /// Member meeting ids, in document order
    pub classes: Vec<u32>,
}

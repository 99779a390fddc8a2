//! # Shared Types
//!
//! The assembled wire-document tree the encoder produces, the meeting indexes
//! the constraint generator consumes, and the value objects a decoded
//! solution is made of. Document types are plain data; all invariants are
//! established by the encoder, and [`crate::fio::timetable`] serializes them
//! verbatim.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    prefs::PrefLevel,
    slots::DayMask,
    types::constraints::Distribution,
};

pub mod constraints;

/// Hash map type used within the crate
pub type RsHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// Wire format version the encoder emits and the engine expects
pub const FORMAT_VERSION: &str = "2.4";

/// The assembled problem document, ready for serialization
///
/// Produced by [`crate::encode::Encoder::encode`]; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Timetable {
    /// Academic session, written as the root `initiative` attribute
    pub initiative: String,
    /// Academic term
    pub term: String,
    /// Academic year
    pub year: Option<i32>,
    /// Creation timestamp, `%Y-%m-%d %H:%M:%S`
    pub created: String,
    /// Free-text description, emitted as a leading comment
    pub description: String,
    /// Rooms section; never empty
    pub rooms: Vec<Room>,
    /// Class meetings section; never empty
    pub classes: Vec<Class>,
    /// Generated distribution constraints
    pub distributions: Vec<Distribution>,
    /// Student roster; omitted from the document when empty
    pub students: Vec<StudentEntry>,
    /// Meeting indexes built during encoding
    pub meetings: MeetingIndexes,
}

/// One room of the problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    /// Dense numeric id, unique among rooms
    pub id: u32,
    /// The external identifier the submission used
    pub external_id: String,
    /// Seats
    pub capacity: u32,
    /// Whether the engine should enforce room constraints for this room
    pub constraint: bool,
    /// Coordinates for travel-time computation; the codec has no geometry,
    /// so this stays at the origin
    pub location: (i32, i32),
}

/// One schedulable class meeting
#[derive(Debug, Clone)]
pub struct Class {
    /// Dense numeric id, unique among meetings
    pub id: u32,
    /// The external identifier the submission used
    pub external_id: String,
    /// Owning offering id
    pub offering: u32,
    /// Config id within the offering
    pub config: u32,
    /// Subpart id within the config
    pub subpart: u32,
    /// Class size limit
    pub class_limit: u32,
    /// Rooms required per meeting
    pub nr_rooms: u32,
    /// Assigned instructor id, when the submission named one
    pub instructor: Option<u32>,
    /// Candidate rooms; never empty
    pub room_prefs: Vec<RoomPref>,
    /// Candidate times; never empty
    pub time_prefs: Vec<TimeEntry>,
}

/// A candidate room with a preference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomPref {
    /// Room id
    pub room: u32,
    /// Preference level; never [`PrefLevel::Unavailable`] in an emitted
    /// document
    pub pref: PrefLevel,
}

/// A candidate time placement with a preference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeEntry {
    /// Weekday mask
    pub days: DayMask,
    /// Start slot, `0..288`
    pub start: u32,
    /// Length in slots, at least 1
    pub length: u32,
    /// Preference level; never [`PrefLevel::Unavailable`] in an emitted
    /// document
    pub pref: PrefLevel,
}

/// One student roster entry with enrolled-meeting back-references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentEntry {
    /// Dense numeric id, unique among students
    pub id: u32,
    /// The external identifier the submission used
    pub external_id: String,
    /// Meeting ids the student is enrolled in
    pub classes: Vec<u32>,
}

/// Meeting groupings built during encoding
///
/// Keyed by dense ids, so iteration order is the id order and generated
/// constraint ids are deterministic.
#[derive(Debug, Clone, Default)]
pub struct MeetingIndexes {
    /// Meeting ids per offering id
    pub by_offering: BTreeMap<u32, Vec<u32>>,
    /// Meeting ids per instructor id
    pub by_instructor: BTreeMap<u32, Vec<u32>>,
    /// Offering id per submitted class name, for resolving references
    pub offering_by_name: RsHashMap<String, u32>,
}

/// A decoded solution document
#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    /// Run metadata
    pub info: SolutionInfo,
    /// Classes that received at least one assignment
    pub classes: Vec<ClassAssignment>,
}

/// Metadata of a solver run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolutionInfo {
    /// Format version of the document
    pub version: String,
    /// Creation timestamp of the document
    pub created: String,
    /// Human-readable runtime, e.g. `2.5 minutes`
    pub runtime: String,
    /// Remaining `Key: Value` statistics from the solution comment
    pub statistics: BTreeMap<String, String>,
}

/// The assignment the engine chose for one class
#[derive(Debug, Clone, Serialize)]
pub struct ClassAssignment {
    /// Class id as it appears in the document
    pub id: String,
    /// Class name, when present
    pub name: String,
    /// Owning offering, when present
    pub offering: String,
    /// Chosen time placement
    pub time: Option<AssignedTime>,
    /// Chosen rooms
    pub rooms: Vec<AssignedRoom>,
    /// Chosen instructor ids
    pub instructors: Vec<String>,
}

/// A chosen time placement, in both human-readable and raw form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignedTime {
    /// Weekday names, Monday..Sunday order
    pub days: Vec<String>,
    /// 12-hour start time, e.g. `7:30 AM`
    pub start: String,
    /// 12-hour end time
    pub end: String,
    /// The raw 7-character day mask
    pub days_mask: String,
    /// The raw start slot
    pub start_slot: u32,
    /// The raw length in slots
    pub length: u32,
}

/// A chosen room
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignedRoom {
    /// Room id as it appears in the document
    pub id: String,
    /// Room name, when present
    pub name: String,
}

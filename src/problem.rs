//! # Problem Definition Input Model
//!
//! Serde mirror of the JSON submission the service accepts. Every section is
//! optional and defaults to empty; the encoder synthesizes whatever structure
//! the engine requires but the submission left out. Map-backed sections use
//! [`BTreeMap`] so that id assignment is deterministic across runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Constraint flag: all meetings of an offering share one room
pub const FLAG_SAME_ROOM: &str = "sameRoom";
/// Constraint flag: all meetings of an offering start at the same slot
pub const FLAG_SAME_TIME_SLOT: &str = "sameTimeSlot";
/// Constraint flag: meetings of an offering spread over distinct days
pub const FLAG_ONE_MEETING_PER_DAY: &str = "oneMeetingPerDay";
/// Constraint flag: meetings of one instructor never overlap
pub const FLAG_INSTRUCTOR_NO_OVERLAP: &str = "instructorNoOverlap";
/// Constraint flag: emit every room for every class, regardless of capacity
pub const FLAG_IGNORE_ROOM_CAPACITY: &str = "ignoreRoomCapacity";

/// A full problem submission
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Problem {
    /// Session metadata
    pub general: General,
    /// Room name to capacity
    pub rooms: BTreeMap<String, u32>,
    /// Class-group name to definition; one offering each
    pub classes: BTreeMap<String, ClassDef>,
    /// Instructor name to per-day preference vectors
    pub instructors: BTreeMap<String, InstructorPrefs>,
    /// The logical time-slot grid preferences index into
    pub time_slots: TimeSlots,
    /// Preference level name to the numeric code the submission uses for it
    pub preferences: BTreeMap<String, i32>,
    /// Declarative constraint flags
    pub constraints: BTreeMap<String, Flag>,
    /// Offering pairs that must not overlap in time
    pub mutually_exclusive: MutuallyExclusive,
    /// Offering groups whose meetings should run back to back
    pub back_to_back: BackToBack,
    /// Student id to enrollment; optional section
    pub students: BTreeMap<String, StudentDef>,
}

/// Per-day preference vectors, day name to one code per logical time slot
pub type InstructorPrefs = BTreeMap<String, Vec<i32>>;

impl Problem {
    /// Deserializes a problem from its JSON representation
    ///
    /// # Errors
    ///
    /// When the input is not valid JSON or does not match the schema.
    pub fn from_json(json: &str) -> Result<Problem, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Whether a constraint flag is set
    ///
    /// Flag names are matched ignoring case, `_`, and `-`, so `sameRoom`,
    /// `same_room`, and `same-room` all address the same flag.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.constraints
            .iter()
            .any(|(key, flag)| flag.value && normalize(key) == normalize(name))
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-'))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Session metadata of a submission
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct General {
    /// Academic session name
    pub academic_session: String,
    /// Academic year
    pub year: Option<i32>,
    /// Free-text description
    pub description: String,
}

/// One class group: a single offering with `slots` weekly meetings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassDef {
    /// Class size limit
    pub capacity: u32,
    /// Instructor name; resolved against the instructor table
    pub teacher: Option<String>,
    /// Number of weekly meetings
    pub slots: u32,
    /// Course title, for display only
    pub course: Option<String>,
}

impl Default for ClassDef {
    fn default() -> ClassDef {
        ClassDef {
            capacity: 30,
            teacher: None,
            slots: 1,
            course: None,
        }
    }
}

/// The logical time-slot grid of a submission
///
/// Instructor preference vectors are indexed positionally against `allDays`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeSlots {
    /// Clock-time ranges (`H:MM-H:MM`) applying to every day
    pub all_days: Vec<String>,
}

/// A boolean constraint flag
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Flag {
    /// Whether the flag is enabled
    pub value: bool,
}

/// Offering pairs whose meetings must never overlap
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MutuallyExclusive {
    /// Pairs of class-group names
    pub pairs: Vec<[String; 2]>,
}

/// Offering groups whose meetings should be scheduled back to back
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BackToBack {
    /// Groups of class-group names
    pub groups: Vec<Vec<String>>,
}

/// One student's enrollment
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StudentDef {
    /// Enrolled class-group names
    pub classes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::Problem;

    #[test]
    fn empty_object_is_a_valid_problem() {
        let problem = Problem::from_json("{}").unwrap();
        assert!(problem.rooms.is_empty());
        assert!(problem.classes.is_empty());
        assert!(problem.students.is_empty());
    }

    #[test]
    fn full_submission() {
        let problem = Problem::from_json(
            r#"{
                "general": {"academicSession": "Fall", "year": 2023, "description": "demo"},
                "rooms": {"A101": 40, "B202": 120},
                "classes": {
                    "CS101": {"capacity": 35, "teacher": "Turing", "slots": 2, "course": "Intro"},
                    "MA201": {}
                },
                "instructors": {"Turing": {"Monday": [1, 8], "Friday": [4]}},
                "timeSlots": {"allDays": ["7:45-9:15", "9:30-11:00"]},
                "preferences": {"required": 1, "neutral": 4, "unavailable": 8},
                "constraints": {"sameRoom": {"value": true}, "oneMeetingPerDay": {"value": false}},
                "mutuallyExclusive": {"pairs": [["CS101", "MA201"]]},
                "backToBack": {"groups": [["CS101", "MA201"]]},
                "students": {"s1": {"classes": ["CS101"]}}
            }"#,
        )
        .unwrap();
        assert_eq!(problem.rooms["A101"], 40);
        assert_eq!(problem.classes["CS101"].slots, 2);
        // defaults fill unspecified class fields
        assert_eq!(problem.classes["MA201"].capacity, 30);
        assert_eq!(problem.classes["MA201"].slots, 1);
        assert_eq!(problem.instructors["Turing"]["Monday"], vec![1, 8]);
        assert_eq!(problem.time_slots.all_days.len(), 2);
        assert_eq!(problem.mutually_exclusive.pairs.len(), 1);
        assert_eq!(problem.back_to_back.groups, vec![vec!["CS101", "MA201"]]);
        assert_eq!(problem.general.year, Some(2023));
    }

    #[test]
    fn flag_lookup_is_spelling_insensitive() {
        let problem = Problem::from_json(
            r#"{"constraints": {"same_room": {"value": true}, "sameTimeSlot": {"value": false}}}"#,
        )
        .unwrap();
        assert!(problem.flag(super::FLAG_SAME_ROOM));
        assert!(!problem.flag(super::FLAG_SAME_TIME_SLOT));
        assert!(!problem.flag(super::FLAG_INSTRUCTOR_NO_OVERLAP));
    }
}

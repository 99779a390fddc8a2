//! # Problem Encoder
//!
//! Builds the engine's document tree from a [`Problem`]. The engine rejects
//! documents with empty required sections or classes without candidate rooms
//! and times, so the encoder synthesizes neutral defaults wherever the
//! submission supplied nothing.
//!
//! Encoding is strict by default: a malformed time range or a dangling class
//! reference fails the whole encode. [`Mode::Lenient`] restores the historical
//! behavior of logging a warning and skipping the offending entry.
//!
//! Every encode call builds its own [`IdRegistry`]; encoder state is never
//! shared across calls.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::warn;

use crate::{
    prefs::{PrefLevel, PrefMap},
    problem::{ClassDef, InstructorPrefs, Problem, FLAG_IGNORE_ROOM_CAPACITY},
    registry::{IdKind, IdPolicy, IdRegistry},
    slots::{time_range_to_slot, DayMask, InvalidTimeRange, DAY_NAMES},
    types::{Class, MeetingIndexes, Room, RoomPref, StudentEntry, TimeEntry, Timetable},
};

pub mod distributions;

/// Name under which the dummy room is registered when none are submitted
pub const DUMMY_ROOM_NAME: &str = "Default Room";
/// Capacity of the dummy room
pub const DUMMY_ROOM_CAPACITY: u32 = 100;
/// Name under which the dummy class is registered when none are submitted
pub const DUMMY_CLASS_NAME: &str = "DEFAULT";

/// Errors failing a strict encode
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A `timeSlots.allDays` entry does not parse
    #[error("invalid time range in `timeSlots.allDays[{index}]`: {source}")]
    TimeRange {
        /// Index of the offending entry
        index: usize,
        /// The underlying parse failure
        source: InvalidTimeRange,
    },
    /// A student enrollment names a class the submission does not define
    #[error("student `{student}` references unknown class `{class}`")]
    UnknownEnrollment {
        /// Student external id
        student: String,
        /// The dangling class name
        class: String,
    },
    /// A mutually-exclusive pair names a class the submission does not define
    #[error("mutually exclusive pair references unknown class `{0}`")]
    UnknownExclusion(String),
    /// A back-to-back group names a class the submission does not define
    #[error("back-to-back group references unknown class `{0}`")]
    UnknownBackToBack(String),
}

/// How the encoder treats malformed or dangling entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Fail the whole encode on the first offending entry
    #[default]
    Strict,
    /// Log a warning and skip the offending entry
    Lenient,
}

/// Encoder options
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Error handling mode
    pub mode: Mode,
    /// Overrides the `created` timestamp; defaults to the current local time
    pub created: Option<String>,
}

/// Encodes problem definitions into [`Timetable`] documents
///
/// The encoder itself only carries options; all request-scoped state (the id
/// registry, the document under construction) lives inside a single
/// [`Encoder::encode`] call.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    opts: Options,
}

impl Encoder {
    /// Creates a strict encoder with default options
    #[must_use]
    pub fn new() -> Encoder {
        Encoder::default()
    }

    /// Creates an encoder with the given options
    #[must_use]
    pub fn with_options(opts: Options) -> Encoder {
        Encoder { opts }
    }

    /// Creates a lenient encoder (warn-and-skip on malformed entries)
    #[must_use]
    pub fn lenient() -> Encoder {
        Encoder::with_options(Options {
            mode: Mode::Lenient,
            ..Options::default()
        })
    }

    /// Encodes a problem into a document tree
    ///
    /// # Errors
    ///
    /// In [`Mode::Strict`], any [`Error`]; in [`Mode::Lenient`], never.
    pub fn encode(&self, problem: &Problem) -> Result<Timetable, Error> {
        let mut reg = IdRegistry::new(IdPolicy::Sequential);
        let pref_map = PrefMap::from_table(&problem.preferences);
        let logical_slots = self.parse_logical_slots(problem)?;

        let rooms = encode_rooms(problem, &mut reg);

        // Instructors come from two sources: the explicit table and teacher
        // names referenced on classes. Table order wins the lower ids.
        for name in problem.instructors.keys() {
            reg.get_or_create(IdKind::Instructor, name);
        }
        for def in problem.classes.values() {
            if let Some(teacher) = &def.teacher {
                reg.get_or_create(IdKind::Instructor, teacher);
            }
        }

        let synthesized;
        let class_defs = if problem.classes.is_empty() {
            synthesized =
                BTreeMap::from([(DUMMY_CLASS_NAME.to_string(), ClassDef::default())]);
            &synthesized
        } else {
            &problem.classes
        };

        let ignore_capacity = problem.flag(FLAG_IGNORE_ROOM_CAPACITY);
        let mut classes = Vec::new();
        let mut meetings = MeetingIndexes::default();
        for (name, def) in class_defs {
            let offering = reg.get_or_create(IdKind::Offering, name);
            let config = reg.get_or_create(IdKind::Config, name);
            let subpart = reg.get_or_create(IdKind::Subpart, name);
            meetings.offering_by_name.insert(name.clone(), offering);
            let instructor = def
                .teacher
                .as_ref()
                .map(|t| reg.get_or_create(IdKind::Instructor, t));

            let n_meetings = def.slots.max(1);
            for nr in 1..=n_meetings {
                let key = if n_meetings == 1 {
                    name.clone()
                } else {
                    format!("{}#{}", name, nr)
                };
                let id = reg.get_or_create(IdKind::Meeting, &key);
                meetings.by_offering.entry(offering).or_default().push(id);
                if let Some(instr) = instructor {
                    meetings.by_instructor.entry(instr).or_default().push(id);
                }
                classes.push(Class {
                    id,
                    external_id: key,
                    offering,
                    config,
                    subpart,
                    class_limit: def.capacity,
                    nr_rooms: 1,
                    instructor,
                    room_prefs: room_prefs_for(&rooms, def, ignore_capacity),
                    time_prefs: time_prefs_for(
                        problem,
                        def,
                        &logical_slots,
                        &pref_map,
                    ),
                });
            }
        }

        let students = self.encode_students(problem, &meetings, &mut reg)?;
        let exclusive_pairs = self.resolve_exclusions(problem, &meetings)?;
        let btb_groups = self.resolve_back_to_back(problem, &meetings)?;
        let flags = distributions::ConstraintFlags::from_problem(problem);
        let dists =
            distributions::generate(&meetings, &flags, &exclusive_pairs, &btb_groups, &mut reg);

        Ok(Timetable {
            initiative: problem.general.academic_session.clone(),
            term: "1".to_string(),
            year: problem.general.year,
            created: self.created(),
            description: problem.general.description.clone(),
            rooms,
            classes,
            distributions: dists,
            students,
            meetings,
        })
    }

    /// Parses `timeSlots.allDays`, keeping positions aligned with the
    /// instructor preference vectors that index into it
    fn parse_logical_slots(
        &self,
        problem: &Problem,
    ) -> Result<Vec<Option<(u32, u32)>>, Error> {
        let mut slots = Vec::with_capacity(problem.time_slots.all_days.len());
        for (index, range) in problem.time_slots.all_days.iter().enumerate() {
            match time_range_to_slot(range) {
                Ok(slot) => slots.push(Some(slot)),
                Err(source) => match self.opts.mode {
                    Mode::Strict => return Err(Error::TimeRange { index, source }),
                    Mode::Lenient => {
                        warn!(index, %range, %source, "skipping malformed time range");
                        slots.push(None);
                    }
                },
            }
        }
        Ok(slots)
    }

    fn encode_students(
        &self,
        problem: &Problem,
        meetings: &MeetingIndexes,
        reg: &mut IdRegistry,
    ) -> Result<Vec<StudentEntry>, Error> {
        let mut students = Vec::with_capacity(problem.students.len());
        for (external_id, def) in &problem.students {
            let id = reg.get_or_create(IdKind::Student, external_id);
            let mut enrolled = Vec::new();
            for class in &def.classes {
                match meetings.offering_by_name.get(class) {
                    Some(offering) => {
                        // enrollment covers every meeting of the offering
                        enrolled
                            .extend_from_slice(&meetings.by_offering[offering]);
                    }
                    None => match self.opts.mode {
                        Mode::Strict => {
                            return Err(Error::UnknownEnrollment {
                                student: external_id.clone(),
                                class: class.clone(),
                            })
                        }
                        Mode::Lenient => {
                            warn!(student = %external_id, %class, "skipping unknown enrollment");
                        }
                    },
                }
            }
            students.push(StudentEntry {
                id,
                external_id: external_id.clone(),
                classes: enrolled,
            });
        }
        Ok(students)
    }

    /// Resolves mutually-exclusive class-name pairs to offering-id pairs
    fn resolve_exclusions(
        &self,
        problem: &Problem,
        meetings: &MeetingIndexes,
    ) -> Result<Vec<(u32, u32)>, Error> {
        let mut pairs = Vec::with_capacity(problem.mutually_exclusive.pairs.len());
        'pairs: for pair in &problem.mutually_exclusive.pairs {
            let mut resolved = [0; 2];
            for (slot, name) in resolved.iter_mut().zip(pair.iter()) {
                match meetings.offering_by_name.get(name) {
                    Some(&offering) => *slot = offering,
                    None => match self.opts.mode {
                        Mode::Strict => {
                            return Err(Error::UnknownExclusion(name.clone()))
                        }
                        Mode::Lenient => {
                            warn!(class = %name, "skipping exclusion pair with unknown class");
                            continue 'pairs;
                        }
                    },
                }
            }
            pairs.push((resolved[0], resolved[1]));
        }
        Ok(pairs)
    }

    /// Resolves back-to-back class-name groups to offering-id groups
    fn resolve_back_to_back(
        &self,
        problem: &Problem,
        meetings: &MeetingIndexes,
    ) -> Result<Vec<Vec<u32>>, Error> {
        let mut groups = Vec::with_capacity(problem.back_to_back.groups.len());
        'groups: for group in &problem.back_to_back.groups {
            let mut resolved = Vec::with_capacity(group.len());
            for name in group {
                match meetings.offering_by_name.get(name) {
                    Some(&offering) => resolved.push(offering),
                    None => match self.opts.mode {
                        Mode::Strict => {
                            return Err(Error::UnknownBackToBack(name.clone()))
                        }
                        Mode::Lenient => {
                            warn!(class = %name, "skipping back-to-back group with unknown class");
                            continue 'groups;
                        }
                    },
                }
            }
            groups.push(resolved);
        }
        Ok(groups)
    }

    fn created(&self) -> String {
        self.opts.created.clone().unwrap_or_else(|| {
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
        })
    }
}

/// Encodes the room section, synthesizing the dummy room when none are given
fn encode_rooms(problem: &Problem, reg: &mut IdRegistry) -> Vec<Room> {
    let mut rooms: Vec<Room> = problem
        .rooms
        .iter()
        .map(|(name, &capacity)| Room {
            id: reg.get_or_create(IdKind::Room, name),
            external_id: name.clone(),
            capacity,
            constraint: true,
            location: (0, 0),
        })
        .collect();
    if rooms.is_empty() {
        rooms.push(Room {
            id: reg.get_or_create(IdKind::Room, DUMMY_ROOM_NAME),
            external_id: DUMMY_ROOM_NAME.to_string(),
            capacity: DUMMY_ROOM_CAPACITY,
            constraint: true,
            location: (0, 0),
        });
    }
    rooms
}

/// Candidate rooms for one meeting: every room the class fits into, or every
/// room when capacity filtering is off; falls back to the first room so the
/// list is never empty
fn room_prefs_for(rooms: &[Room], def: &ClassDef, ignore_capacity: bool) -> Vec<RoomPref> {
    let mut prefs: Vec<RoomPref> = rooms
        .iter()
        .filter(|room| ignore_capacity || room.capacity >= def.capacity)
        .map(|room| RoomPref {
            room: room.id,
            pref: PrefLevel::Neutral,
        })
        .collect();
    if prefs.is_empty() {
        prefs.push(RoomPref {
            room: rooms[0].id,
            pref: PrefLevel::Neutral,
        });
    }
    prefs
}

/// Candidate times for one meeting: every day crossed with every logical
/// time slot, preferences resolved through the instructor's vectors, with
/// unavailable entries omitted; falls back to the fixed weekday-morning
/// pattern when nothing would be emitted
fn time_prefs_for(
    problem: &Problem,
    def: &ClassDef,
    logical_slots: &[Option<(u32, u32)>],
    pref_map: &PrefMap,
) -> Vec<TimeEntry> {
    let mut entries = Vec::new();
    let day_prefs = def
        .teacher
        .as_ref()
        .and_then(|t| problem.instructors.get(t));
    if let Some(day_prefs) = day_prefs {
        for (day_idx, day_name) in DAY_NAMES.iter().enumerate() {
            let Some(codes) = day_vector(day_prefs, day_name) else {
                continue;
            };
            for (slot_idx, slot) in logical_slots.iter().enumerate() {
                let Some(&(start, length)) = slot.as_ref() else {
                    continue;
                };
                // vectors shorter than the slot grid read as neutral
                let pref = match codes.get(slot_idx) {
                    Some(&code) => pref_map.resolve(code),
                    None => PrefLevel::Neutral,
                };
                if pref == PrefLevel::Unavailable {
                    continue;
                }
                entries.push(TimeEntry {
                    days: DayMask::single(day_idx),
                    start,
                    length,
                    pref,
                });
            }
        }
    }
    if entries.is_empty() {
        entries.extend_from_slice(&default_pattern());
    }
    entries
}

/// Looks up one day's preference vector, matching the day name
/// case-insensitively
fn day_vector<'a>(prefs: &'a InstructorPrefs, day_name: &str) -> Option<&'a Vec<i32>> {
    prefs
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(day_name))
        .map(|(_, codes)| codes)
}

/// The fixed fallback pattern: MWF 7:30 for an hour, TTh 7:30 for 90 minutes
fn default_pattern() -> [TimeEntry; 2] {
    [
        TimeEntry {
            days: DayMask::from_days(["Monday", "Wednesday", "Friday"]),
            start: 90,
            length: 12,
            pref: PrefLevel::Neutral,
        },
        TimeEntry {
            days: DayMask::from_days(["Tuesday", "Thursday"]),
            start: 90,
            length: 18,
            pref: PrefLevel::Neutral,
        },
    ]
}

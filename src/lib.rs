//! # ttwire - UniTime Course Timetabling Wire Codec
//!
//! `ttwire` translates a loosely-structured timetabling problem definition
//! (rooms, classes, instructors, availability, preferences, pairwise
//! constraints) into the dense XML exchange format consumed by the UniTime
//! CPSolver course timetabling engine (`org.cpsolver.coursett`), and decodes
//! the engine's solved document back into a structured result.
//!
//! The crate contains no solver: it is the data transformation boundary
//! around one. Process management, file orchestration, and the HTTP service
//! layer are external collaborators.
//!
//! ## Wire contract
//!
//! The following conventions are fixed and used symmetrically by the encoder
//! and the decoder:
//!
//! - A day is discretized into 288 five-minute slots
//!   ([`slots::SLOTS_PER_DAY`]).
//! - Day masks are 7 characters of `0`/`1` with **Monday as bit 0** and
//!   Sunday as bit 6 ([`slots::DayMask`]).
//! - Preference strength is encoded as one of the tokens `R`, `-2`, `-1`,
//!   `0`, `1`, `2`, `P` ([`prefs::PrefLevel`]). *Unavailable* entries are
//!   omitted from the document entirely; their absence is the signal.
//! - Solved documents mark the chosen time/room/instructor child of a class
//!   with `solution="true"` and carry run statistics in a free-text comment
//!   block of `Key: Value` lines, among them `Time: <float> min`.
//!
//! ## Example
//!
//! ```
//! use ttwire::{Encoder, Problem};
//!
//! let problem = Problem::from_json(
//!     r#"{"rooms": {"A101": 40}, "classes": {"CS101": {"capacity": 30}}}"#,
//! )?;
//! let doc = Encoder::new().encode(&problem)?;
//! let xml = ttwire::fio::timetable::to_xml_string(&doc);
//! assert!(xml.contains("slotsPerDay=\"288\""));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod encode;
pub mod fio;
pub mod prefs;
pub mod problem;
pub mod registry;
pub mod slots;
pub mod types;

pub use encode::{Encoder, Mode, Options};
pub use fio::solution::parse_solution;
pub use problem::Problem;
pub use types::{Solution, Timetable};

//! # Reading Solved Documents
//!
//! Decodes the engine's solved document: the chosen time/room/instructor
//! children of each class carry `solution="true"`, and run statistics live in
//! a free-text comment block with a fixed micro-grammar:
//!
//! ```text
//! Solution Info:
//! Time: 2.5 min
//! Assigned variables: 42
//! ```
//!
//! `Time: <float> min` is the runtime; every other `Key: Value` line is an
//! opaque statistic. A missing block is not an error; the runtime then reads
//! [`DEFAULT_RUNTIME`].

use std::collections::BTreeMap;

use nom::{
    bytes::complete::{is_not, tag},
    character::complete::{char, space0},
    combinator::rest,
    number::complete::double,
    sequence::separated_pair,
    IResult,
};
use thiserror::Error;
use tracing::debug;

use crate::{
    slots::{slot_to_clock, DayMask},
    types::{AssignedRoom, AssignedTime, ClassAssignment, Solution, SolutionInfo},
};

/// Runtime reported when the document carries no statistics block
pub const DEFAULT_RUNTIME: &str = "Less than a minute";

/// Marker opening the statistics comment block
const STATS_MARKER: &str = "Solution Info:";

/// Errors decoding a solved document
#[derive(Error, Debug)]
pub enum Error {
    /// The input is not well-formed XML
    #[error("invalid solution XML: {0}")]
    Xml(#[from] roxmltree::Error),
    /// An assignment attribute does not parse
    #[error("invalid `{attr}` attribute on <{element}>: `{value}`")]
    Attr {
        /// Element carrying the attribute
        element: &'static str,
        /// Attribute name
        attr: &'static str,
        /// The value that failed to parse
        value: String,
    },
}

/// Decodes a solved document
///
/// Only classes with at least one selected assignment appear in the result.
///
/// # Errors
///
/// [`Error::Xml`] on unparsable input, [`Error::Attr`] when a selected
/// assignment carries a malformed day mask or slot number.
pub fn parse_solution(xml: &str) -> Result<Solution, Error> {
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();

    let (runtime, mut statistics) = extract_stats(&doc);
    // explicit statistic elements supplement the comment block
    for node in doc.root().descendants().filter(|n| n.has_tag_name("statistic")) {
        if let Some(name) = node.attribute("name") {
            statistics
                .insert(name.to_string(), node.text().unwrap_or_default().to_string());
        }
    }

    let mut classes = Vec::new();
    for node in doc.root().descendants().filter(|n| n.has_tag_name("class")) {
        // class back-references under students and constraints also use the
        // `class` tag; only the classes section holds assignments
        if !node.parent().is_some_and(|p| p.has_tag_name("classes")) {
            continue;
        }
        let time = selected_time(&node)?;
        let rooms: Vec<AssignedRoom> = node
            .children()
            .filter(|c| c.has_tag_name("room") && selected(c))
            .map(|c| AssignedRoom {
                id: c.attribute("id").unwrap_or_default().to_string(),
                name: c.attribute("name").unwrap_or_default().to_string(),
            })
            .collect();
        let instructors: Vec<String> = node
            .children()
            .filter(|c| c.has_tag_name("instructor") && selected(c))
            .map(|c| c.attribute("id").unwrap_or_default().to_string())
            .collect();
        if time.is_none() && rooms.is_empty() && instructors.is_empty() {
            debug!(
                class = node.attribute("id").unwrap_or_default(),
                "dropping class without selected assignment"
            );
            continue;
        }
        classes.push(ClassAssignment {
            id: node.attribute("id").unwrap_or_default().to_string(),
            name: node.attribute("name").unwrap_or_default().to_string(),
            offering: node.attribute("offering").unwrap_or_default().to_string(),
            time,
            rooms,
            instructors,
        });
    }

    Ok(Solution {
        info: SolutionInfo {
            version: root.attribute("version").unwrap_or_default().to_string(),
            created: root.attribute("created").unwrap_or_default().to_string(),
            runtime,
            statistics,
        },
        classes,
    })
}

fn selected(node: &roxmltree::Node) -> bool {
    node.attribute("solution") == Some("true")
}

/// Decodes the selected time child of a class, if any
///
/// The engine emits at most one; any further selected time children are
/// ignored.
fn selected_time(class: &roxmltree::Node) -> Result<Option<AssignedTime>, Error> {
    let Some(time) = class
        .children()
        .find(|c| c.has_tag_name("time") && selected(c))
    else {
        return Ok(None);
    };
    let mask_value = time.attribute("days").unwrap_or("0000000");
    let mask: DayMask = mask_value.parse().map_err(|_| Error::Attr {
        element: "time",
        attr: "days",
        value: mask_value.to_string(),
    })?;
    let start = slot_attr(&time, "start")?;
    let length = slot_attr(&time, "length")?;
    Ok(Some(AssignedTime {
        days: mask.day_names().iter().map(ToString::to_string).collect(),
        start: slot_to_clock(start),
        end: slot_to_clock(start.saturating_add(length)),
        days_mask: mask.to_string(),
        start_slot: start,
        length,
    }))
}

/// Reads a numeric slot attribute, defaulting to 0 when absent
fn slot_attr(time: &roxmltree::Node, attr: &'static str) -> Result<u32, Error> {
    match time.attribute(attr) {
        None => Ok(0),
        Some(value) => value.parse().map_err(|_| Error::Attr {
            element: "time",
            attr,
            value: value.to_string(),
        }),
    }
}

/// Extracts runtime and statistics from the comment block, if present
fn extract_stats(doc: &roxmltree::Document) -> (String, BTreeMap<String, String>) {
    let mut runtime = DEFAULT_RUNTIME.to_string();
    let mut statistics = BTreeMap::new();
    let Some(text) = doc
        .root()
        .descendants()
        .filter(|n| n.is_comment())
        .filter_map(|n| n.text())
        .find_map(|t| t.split_once(STATS_MARKER).map(|(_, rest)| rest.to_string()))
    else {
        return (runtime, statistics);
    };
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Ok((_, minutes)) = time_line(line) {
            if minutes > 0.0 {
                runtime = format!("{} minutes", minutes);
            }
            continue;
        }
        if let Ok((_, (key, value))) = stat_line(line) {
            statistics.insert(key.trim().to_string(), value.trim().to_string());
        }
        // lines without a colon carry no statistic and are skipped
    }
    (runtime, statistics)
}

/// Parses the `Time: <float> min` runtime line
fn time_line(input: &str) -> IResult<&str, f64> {
    let (input, _) = tag("Time:")(input)?;
    let (input, _) = space0(input)?;
    let (input, minutes) = double(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = tag("min")(input)?;
    Ok((input, minutes))
}

/// Parses one `Key: Value` statistics line
fn stat_line(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(is_not(":"), char(':'), rest)(input)
}

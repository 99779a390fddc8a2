//! # Writing Problem Documents
//!
//! Serializes an assembled [`Timetable`] into the engine's XML exchange
//! format. Emission is direct `write!`-based text output; the document tree
//! is small and the element inventory fixed, so no XML library is involved on
//! the writing side.

use std::io::{self, Write};

use crate::{
    prefs::PrefLevel,
    slots::SLOTS_PER_DAY,
    types::{constraints::Distribution, Class, Room, StudentEntry, Timetable, FORMAT_VERSION},
};

/// Hours covered by the compatibility preference grid
const GRID_HOURS: u32 = 24;
/// Days covered by the compatibility preference grid
const GRID_DAYS: u32 = 7;

/// Writes a problem document to a writer
///
/// # Errors
///
/// Any IO error from the underlying writer.
pub fn write_timetable<W: Write>(writer: &mut W, tt: &Timetable) -> Result<(), io::Error> {
    writeln!(writer, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    if !tt.description.is_empty() {
        // comments must not contain a double hyphen
        writeln!(writer, "<!-- {} -->", tt.description.replace("--", "- -"))?;
    }
    write!(
        writer,
        "<timetable version=\"{}\" initiative=\"{}\" term=\"{}\"",
        FORMAT_VERSION,
        escape(&tt.initiative),
        escape(&tt.term),
    )?;
    if let Some(year) = tt.year {
        write!(writer, " year=\"{}\"", year)?;
    }
    writeln!(
        writer,
        " created=\"{}\" nrDays=\"7\" slotsPerDay=\"{}\">",
        escape(&tt.created),
        SLOTS_PER_DAY,
    )?;

    writeln!(writer, " <rooms>")?;
    for room in &tt.rooms {
        write_room(writer, room)?;
    }
    writeln!(writer, " </rooms>")?;

    writeln!(writer, " <classes>")?;
    for class in &tt.classes {
        write_class(writer, class)?;
    }
    writeln!(writer, " </classes>")?;

    writeln!(writer, " <groupConstraints>")?;
    for dist in &tt.distributions {
        write_constraint(writer, dist)?;
    }
    writeln!(writer, " </groupConstraints>")?;

    if !tt.students.is_empty() {
        writeln!(writer, " <students>")?;
        for student in &tt.students {
            write_student(writer, student)?;
        }
        writeln!(writer, " </students>")?;
    }

    writeln!(writer, "</timetable>")?;
    writer.flush()
}

/// Writes a problem document into a string
#[must_use]
pub fn to_xml_string(tt: &Timetable) -> String {
    let mut buf = Vec::new();
    write_timetable(&mut buf, tt).expect("writing to a Vec cannot fail");
    String::from_utf8(buf).expect("the writer only emits UTF-8")
}

fn write_room<W: Write>(writer: &mut W, room: &Room) -> Result<(), io::Error> {
    writeln!(
        writer,
        "  <room id=\"{}\" externalId=\"{}\" capacity=\"{}\" location=\"{},{}\" constraint=\"{}\"/>",
        room.id,
        escape(&room.external_id),
        room.capacity,
        room.location.0,
        room.location.1,
        room.constraint,
    )
}

fn write_class<W: Write>(writer: &mut W, class: &Class) -> Result<(), io::Error> {
    writeln!(
        writer,
        "  <class id=\"{}\" externalId=\"{}\" offering=\"{}\" config=\"{}\" subpart=\"{}\" classLimit=\"{}\" nrRooms=\"{}\">",
        class.id,
        escape(&class.external_id),
        class.offering,
        class.config,
        class.subpart,
        class.class_limit,
        class.nr_rooms,
    )?;
    if let Some(instructor) = class.instructor {
        writeln!(writer, "   <instructor id=\"{}\"/>", instructor)?;
    }
    for pref in &class.room_prefs {
        writeln!(
            writer,
            "   <room id=\"{}\" pref=\"{}\"/>",
            pref.room,
            token(pref.pref),
        )?;
    }
    for entry in &class.time_prefs {
        writeln!(
            writer,
            "   <time days=\"{}\" start=\"{}\" length=\"{}\" pref=\"{}\"/>",
            entry.days,
            entry.start,
            entry.length,
            token(entry.pref),
        )?;
    }
    write_grid(writer)?;
    writeln!(writer, "  </class>")
}

/// The neutral per-day/per-hour grid the strict schema variants require
fn write_grid<W: Write>(writer: &mut W) -> Result<(), io::Error> {
    writeln!(writer, "   <timePreferences>")?;
    for day in 0..GRID_DAYS {
        for hour in 0..GRID_HOURS {
            writeln!(
                writer,
                "    <pref day=\"{}\" slot=\"{}\" pref=\"0\"/>",
                day,
                hour * 12,
            )?;
        }
    }
    writeln!(writer, "   </timePreferences>")
}

fn write_constraint<W: Write>(writer: &mut W, dist: &Distribution) -> Result<(), io::Error> {
    writeln!(
        writer,
        "  <constraint id=\"{}\" type=\"{}\" pref=\"{}\" required=\"{}\">",
        dist.id,
        dist.kind.wire_name(),
        dist.strength.pref_token(),
        dist.strength.is_required(),
    )?;
    for class in &dist.classes {
        writeln!(writer, "   <class id=\"{}\"/>", class)?;
    }
    writeln!(writer, "  </constraint>")
}

fn write_student<W: Write>(writer: &mut W, student: &StudentEntry) -> Result<(), io::Error> {
    writeln!(
        writer,
        "  <student id=\"{}\" externalId=\"{}\">",
        student.id,
        escape(&student.external_id),
    )?;
    for class in &student.classes {
        writeln!(writer, "   <class id=\"{}\" weight=\"1.0\"/>", class)?;
    }
    writeln!(writer, "  </student>")
}

/// A preference token for emission
///
/// The encoder never stores unavailable entries, but falling back to neutral
/// here keeps emission total.
fn token(pref: PrefLevel) -> &'static str {
    pref.token().unwrap_or("0")
}

/// Escapes an attribute value
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{escape, to_xml_string};
    use crate::{encode::Encoder, problem::Problem};

    fn render(json: &str) -> String {
        let problem = Problem::from_json(json).unwrap();
        let doc = Encoder::new().encode(&problem).unwrap();
        to_xml_string(&doc)
    }

    #[test]
    fn escaping() {
        assert_eq!(escape("a&b"), "a&amp;b");
        assert_eq!(escape("<\"x\">"), "&lt;&quot;x&quot;&gt;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn root_attributes() {
        let xml = render(r#"{"general": {"academicSession": "Fall", "year": 2023}}"#);
        assert!(xml.contains("version=\"2.4\""));
        assert!(xml.contains("initiative=\"Fall\""));
        assert!(xml.contains("year=\"2023\""));
        assert!(xml.contains("nrDays=\"7\""));
        assert!(xml.contains("slotsPerDay=\"288\""));
    }

    #[test]
    fn sections_are_never_empty() {
        let xml = render("{}");
        assert!(xml.contains("<room id=\"1\""));
        assert!(xml.contains("<class id=\"1\""));
        // no students section for an empty roster
        assert!(!xml.contains("<students>"));
    }

    #[test]
    fn grid_has_full_coverage() {
        let xml = render(r#"{"classes": {"CS101": {}}}"#);
        let grid_entries = xml.matches("<pref day=").count();
        assert_eq!(grid_entries, 7 * 24);
        assert!(xml.contains("<pref day=\"6\" slot=\"276\" pref=\"0\"/>"));
    }

    #[test]
    fn constraints_and_students() {
        let xml = render(
            r#"{
                "classes": {"CS101": {"slots": 2}},
                "constraints": {"sameRoom": {"value": true}},
                "students": {"s1": {"classes": ["CS101"]}}
            }"#,
        );
        assert!(xml.contains("type=\"SAME_ROOM\""));
        assert!(xml.contains("pref=\"R\""));
        assert!(xml.contains("<student id=\"1\" externalId=\"s1\">"));
        assert!(xml.contains("<class id=\"1\" weight=\"1.0\"/>"));
    }

    #[test]
    fn description_becomes_a_comment() {
        let xml = render(r#"{"general": {"description": "spring -- draft"}}"#);
        assert!(xml.contains("<!-- spring - - draft -->"));
    }
}

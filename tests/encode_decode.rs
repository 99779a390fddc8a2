//! Full-cycle tests: submission JSON -> document XML, and a solved document
//! back to a structured result.

use anyhow::Result;
use ttwire::{
    encode::Options,
    fio::{self, timetable::to_xml_string},
    parse_solution, Encoder, Problem,
};

const SUBMISSION: &str = r#"{
    "general": {"academicSession": "Fall 2023", "year": 2023, "description": "demo"},
    "rooms": {"A101": 40, "B202": 120, "C303": 15},
    "classes": {
        "CS101": {"capacity": 35, "teacher": "Turing", "slots": 2, "course": "Intro CS"},
        "MA201": {"capacity": 100, "teacher": "Noether", "slots": 3}
    },
    "instructors": {
        "Turing": {"Monday": [1, 4], "Wednesday": [8, 4]},
        "Noether": {}
    },
    "timeSlots": {"allDays": ["7:45-9:15", "9:30-11:00"]},
    "preferences": {"required": 1, "neutral": 4, "unavailable": 8},
    "constraints": {
        "sameRoom": {"value": true},
        "oneMeetingPerDay": {"value": true},
        "instructorNoOverlap": {"value": true}
    },
    "mutuallyExclusive": {"pairs": [["CS101", "MA201"]]},
    "backToBack": {"groups": [["CS101", "MA201"]]},
    "students": {"s1": {"classes": ["CS101"]}, "s2": {"classes": ["CS101", "MA201"]}}
}"#;

#[test]
fn encode_full_submission() -> Result<()> {
    let problem = Problem::from_json(SUBMISSION)?;
    let encoder = Encoder::with_options(Options {
        created: Some("2023-09-01 08:00:00".to_string()),
        ..Options::default()
    });
    let doc = encoder.encode(&problem)?;

    assert_eq!(doc.rooms.len(), 3);
    // 2 + 3 meetings, dense ids
    assert_eq!(doc.classes.len(), 5);
    let ids: Vec<u32> = doc.classes.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);

    // capacity filtering: MA201 (100 seats) only fits into B202
    let ma = doc
        .classes
        .iter()
        .find(|c| c.external_id == "MA201#1")
        .unwrap();
    assert_eq!(ma.room_prefs.len(), 1);

    // Turing's Wednesday first slot is unavailable and must be absent
    let cs = doc
        .classes
        .iter()
        .find(|c| c.external_id == "CS101#1")
        .unwrap();
    assert!(cs
        .time_prefs
        .iter()
        .all(|t| !(t.days.to_string() == "0010000" && t.start == 93)));
    // Monday: required first slot, neutral second
    assert!(cs
        .time_prefs
        .iter()
        .any(|t| t.days.to_string() == "1000000" && t.start == 93));

    // sameRoom: one per offering with >= 2 meetings = 2 constraints
    // oneMeetingPerDay: C(2,2) + C(3,2) = 4
    // instructorNoOverlap: C(2,2) + C(3,2) = 4
    // mutual exclusion: 2 x 3 = 6
    // back to back: one constraint over the group
    assert_eq!(doc.distributions.len(), 2 + 4 + 4 + 6 + 1);

    let xml = to_xml_string(&doc);
    assert!(xml.contains("created=\"2023-09-01 08:00:00\""));
    assert!(xml.contains("type=\"DIFF_TIME\""));
    assert!(xml.contains("type=\"DIFF_DAY\""));
    assert!(xml.contains("type=\"BTB_TIME\""));
    // s2 is enrolled in every meeting of both offerings
    assert!(xml.contains("externalId=\"s2\""));
    Ok(())
}

#[test]
fn empty_submission_round_trip() -> Result<()> {
    let problem = Problem::from_json("{}")?;
    let doc = Encoder::new().encode(&problem)?;
    assert_eq!(doc.rooms.len(), 1);
    assert_eq!(doc.classes.len(), 1);

    let xml = to_xml_string(&doc);
    // the writer's output must at least satisfy our own reader
    let decoded = parse_solution(&xml)?;
    assert_eq!(decoded.info.version, "2.4");
    // an unsolved document carries no selected assignments
    assert!(decoded.classes.is_empty());
    Ok(())
}

#[test]
fn decode_solved_document() -> Result<()> {
    let solved = r#"<?xml version="1.0" encoding="UTF-8"?>
<!--Solution Info:
Time: 2.5 min
Assigned variables: 5
-->
<timetable version="2.4" created="2023-09-01 09:10:00">
 <classes>
  <class id="1" name="CS101" offering="1">
   <time days="1000100" start="90" length="12" solution="true"/>
   <room id="1" name="A101" solution="true"/>
  </class>
  <class id="2" name="MA201" offering="2">
   <time days="0101000" start="114" length="18"/>
  </class>
 </classes>
</timetable>"#;
    let solution = fio::read_solution(solved.as_bytes())?;
    assert_eq!(solution.info.runtime, "2.5 minutes");
    assert_eq!(solution.info.statistics["Assigned variables"], "5");
    assert_eq!(solution.classes.len(), 1);
    let time = solution.classes[0].time.as_ref().unwrap();
    assert_eq!(time.days, vec!["Monday", "Friday"]);
    assert_eq!(time.start, "7:30 AM");
    Ok(())
}

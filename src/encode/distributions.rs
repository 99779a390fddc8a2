//! # Distribution Constraint Generation
//!
//! Expands the declarative constraint flags of a submission into explicit
//! constraints over the meetings the encoder produced. Group flags become one
//! constraint per offering; the per-day and no-overlap flags expand to all
//! C(n,2) pairs; mutually-exclusive offering pairs expand to the full cross
//! product of their meetings; back-to-back groups become one constraint over
//! every meeting of the named offerings.

use itertools::Itertools;

use crate::{
    problem::{
        Problem, FLAG_INSTRUCTOR_NO_OVERLAP, FLAG_ONE_MEETING_PER_DAY, FLAG_SAME_ROOM,
        FLAG_SAME_TIME_SLOT,
    },
    registry::{IdKind, IdRegistry},
    types::{
        constraints::{Distribution, DistributionKind, Strength},
        MeetingIndexes,
    },
};

/// The declarative constraint flags of a submission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstraintFlags {
    /// All meetings of an offering share one room
    pub same_room: bool,
    /// All meetings of an offering start at the same slot
    pub same_start: bool,
    /// Meetings of an offering fall on distinct days
    pub one_meeting_per_day: bool,
    /// Meetings of one instructor never overlap
    pub instructor_no_overlap: bool,
}

impl ConstraintFlags {
    /// Reads the flags out of a submission's `constraints` section
    #[must_use]
    pub fn from_problem(problem: &Problem) -> ConstraintFlags {
        ConstraintFlags {
            same_room: problem.flag(FLAG_SAME_ROOM),
            same_start: problem.flag(FLAG_SAME_TIME_SLOT),
            one_meeting_per_day: problem.flag(FLAG_ONE_MEETING_PER_DAY),
            instructor_no_overlap: problem.flag(FLAG_INSTRUCTOR_NO_OVERLAP),
        }
    }
}

/// Expands flags, exclusive pairs, and back-to-back groups into explicit
/// constraints
///
/// `exclusive_pairs` holds offering-id pairs and `btb_groups` offering-id
/// groups (both already resolved from names). Constraint ids are drawn from
/// the registry's [`IdKind::Constraint`] namespace in generation order, so
/// output is deterministic for a given problem.
#[must_use]
pub fn generate(
    meetings: &MeetingIndexes,
    flags: &ConstraintFlags,
    exclusive_pairs: &[(u32, u32)],
    btb_groups: &[Vec<u32>],
    reg: &mut IdRegistry,
) -> Vec<Distribution> {
    let mut out = Vec::new();

    // group constraints: one per offering over all its meetings
    for (kind, enabled) in [
        (DistributionKind::SameRoom, flags.same_room),
        (DistributionKind::SameStart, flags.same_start),
    ] {
        if !enabled {
            continue;
        }
        for members in meetings.by_offering.values() {
            if members.len() < 2 {
                continue;
            }
            out.push(Distribution {
                id: reg.fresh(IdKind::Constraint),
                kind,
                strength: Strength::Required,
                classes: members.clone(),
            });
        }
    }

    if flags.one_meeting_per_day {
        for members in meetings.by_offering.values() {
            pairwise(
                members,
                DistributionKind::DifferentDay,
                Strength::Preferred,
                reg,
                &mut out,
            );
        }
    }

    if flags.instructor_no_overlap {
        for members in meetings.by_instructor.values() {
            pairwise(
                members,
                DistributionKind::DifferentTime,
                Strength::Required,
                reg,
                &mut out,
            );
        }
    }

    for &(first, second) in exclusive_pairs {
        cross_product(meetings, first, second, reg, &mut out);
    }

    // one back-to-back constraint per group over all meetings of its offerings
    for group in btb_groups {
        let members: Vec<u32> = group
            .iter()
            .flat_map(|offering| meetings.by_offering.get(offering))
            .flatten()
            .copied()
            .collect();
        if members.len() < 2 {
            continue;
        }
        out.push(Distribution {
            id: reg.fresh(IdKind::Constraint),
            kind: DistributionKind::BackToBack,
            strength: Strength::Required,
            classes: members,
        });
    }

    out
}

/// Emits one constraint for every unordered pair of `members`
fn pairwise(
    members: &[u32],
    kind: DistributionKind,
    strength: Strength,
    reg: &mut IdRegistry,
    out: &mut Vec<Distribution>,
) {
    for (a, b) in members.iter().copied().tuple_combinations() {
        out.push(Distribution {
            id: reg.fresh(IdKind::Constraint),
            kind,
            strength,
            classes: vec![a, b],
        });
    }
}

/// Emits a required different-time constraint for every meeting of `first`
/// crossed with every meeting of `second`
fn cross_product(
    meetings: &MeetingIndexes,
    first: u32,
    second: u32,
    reg: &mut IdRegistry,
    out: &mut Vec<Distribution>,
) {
    let empty = Vec::new();
    let firsts = meetings.by_offering.get(&first).unwrap_or(&empty);
    let seconds = meetings.by_offering.get(&second).unwrap_or(&empty);
    for &a in firsts {
        for &b in seconds {
            out.push(Distribution {
                id: reg.fresh(IdKind::Constraint),
                kind: DistributionKind::DifferentTime,
                strength: Strength::Required,
                classes: vec![a, b],
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{generate, ConstraintFlags};
    use crate::{
        registry::{IdPolicy, IdRegistry},
        types::{
            constraints::{DistributionKind, Strength},
            MeetingIndexes,
        },
    };

    fn indexes() -> MeetingIndexes {
        let mut meetings = MeetingIndexes::default();
        // offering 1 with 2 meetings, offering 2 with 3
        meetings.by_offering.insert(1, vec![1, 2]);
        meetings.by_offering.insert(2, vec![3, 4, 5]);
        // instructor 1 teaches meetings 1, 3, 4
        meetings.by_instructor.insert(1, vec![1, 3, 4]);
        meetings
    }

    #[test]
    fn group_flags_emit_one_constraint_per_offering() {
        let mut reg = IdRegistry::new(IdPolicy::Sequential);
        let flags = ConstraintFlags {
            same_room: true,
            same_start: true,
            ..ConstraintFlags::default()
        };
        let dists = generate(&indexes(), &flags, &[], &[], &mut reg);
        assert_eq!(dists.len(), 4);
        let same_room: Vec<_> = dists
            .iter()
            .filter(|d| d.kind == DistributionKind::SameRoom)
            .collect();
        assert_eq!(same_room.len(), 2);
        assert_eq!(same_room[0].classes, vec![1, 2]);
        assert_eq!(same_room[1].classes, vec![3, 4, 5]);
        assert!(dists.iter().all(|d| d.strength.is_required()));
    }

    #[test]
    fn one_meeting_per_day_is_pairwise_preferred() {
        let mut reg = IdRegistry::new(IdPolicy::Sequential);
        let flags = ConstraintFlags {
            one_meeting_per_day: true,
            ..ConstraintFlags::default()
        };
        let dists = generate(&indexes(), &flags, &[], &[], &mut reg);
        // C(2,2)=1 for offering 1, C(3,2)=3 for offering 2
        assert_eq!(dists.len(), 4);
        assert!(dists
            .iter()
            .all(|d| d.kind == DistributionKind::DifferentDay && d.classes.len() == 2));
        assert!(dists.iter().all(|d| d.strength == Strength::Preferred));
        let offering_two: Vec<_> =
            dists.iter().filter(|d| d.classes[0] >= 3).collect();
        assert_eq!(offering_two.len(), 3);
    }

    #[test]
    fn instructor_no_overlap_is_pairwise_required() {
        let mut reg = IdRegistry::new(IdPolicy::Sequential);
        let flags = ConstraintFlags {
            instructor_no_overlap: true,
            ..ConstraintFlags::default()
        };
        let dists = generate(&indexes(), &flags, &[], &[], &mut reg);
        // C(3,2) over the instructor's meetings
        assert_eq!(dists.len(), 3);
        assert_eq!(dists[0].classes, vec![1, 3]);
        assert_eq!(dists[1].classes, vec![1, 4]);
        assert_eq!(dists[2].classes, vec![3, 4]);
        assert!(dists
            .iter()
            .all(|d| d.kind == DistributionKind::DifferentTime && d.strength.is_required()));
    }

    #[test]
    fn exclusion_pair_is_full_cross_product() {
        let mut reg = IdRegistry::new(IdPolicy::Sequential);
        let flags = ConstraintFlags::default();
        let dists = generate(&indexes(), &flags, &[(1, 2)], &[], &mut reg);
        // 2 meetings x 3 meetings
        assert_eq!(dists.len(), 6);
        assert!(dists
            .iter()
            .all(|d| d.kind == DistributionKind::DifferentTime && d.strength.is_required()));
        assert_eq!(dists[0].classes, vec![1, 3]);
        assert_eq!(dists[5].classes, vec![2, 5]);
    }

    #[test]
    fn back_to_back_group_spans_all_member_meetings() {
        let mut reg = IdRegistry::new(IdPolicy::Sequential);
        let flags = ConstraintFlags::default();
        let dists = generate(&indexes(), &flags, &[], &[vec![1, 2]], &mut reg);
        // one constraint over every meeting of both offerings
        assert_eq!(dists.len(), 1);
        assert_eq!(dists[0].kind, DistributionKind::BackToBack);
        assert!(dists[0].strength.is_required());
        assert_eq!(dists[0].classes, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn ids_are_sequential_across_sections() {
        let mut reg = IdRegistry::new(IdPolicy::Sequential);
        let flags = ConstraintFlags {
            same_room: true,
            one_meeting_per_day: true,
            ..ConstraintFlags::default()
        };
        let dists = generate(&indexes(), &flags, &[(1, 2)], &[vec![1, 2]], &mut reg);
        let ids: Vec<u32> = dists.iter().map(|d| d.id).collect();
        let expected: Vec<u32> = (1..=ids.len() as u32).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn single_meeting_offerings_emit_nothing() {
        let mut meetings = MeetingIndexes::default();
        meetings.by_offering.insert(1, vec![1]);
        let mut reg = IdRegistry::new(IdPolicy::Sequential);
        let flags = ConstraintFlags {
            same_room: true,
            same_start: true,
            one_meeting_per_day: true,
            instructor_no_overlap: true,
        };
        assert!(generate(&meetings, &flags, &[], &[vec![1]], &mut reg).is_empty());
    }
}

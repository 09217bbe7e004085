//! Reshaping of flat schedule assignments into a dense
//! day → parity → period → lessons grid.
//!
//! Grouping keys are plain identifiers (`period.id`, `teacher.id`, ...), so a
//! period loaded with an assignment and the same period loaded with the
//! semester always land in the same slot.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::{
    DayOfWeek, Group, GroupRef, LessonType, Period, RoomRef, ScheduleAssignment, SemesterDetails,
    TeacherName,
};
use crate::schedule::GroupMapper;

/// One collapsed lesson occurrence inside a period slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonEntry {
    pub subject_name: String,
    pub lesson_type: LessonType,
    pub teacher: TeacherName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<RoomRef>,
    pub groups: Vec<GroupRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSlot {
    pub class_id: String,
    pub class_name: String,
    pub lessons: Vec<LessonEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub day: DayOfWeek,
    pub even: Vec<PeriodSlot>,
    pub odd: Vec<PeriodSlot>,
}

/// Whether lesson entries carry the room they take place in. Room views
/// omit it since the room is the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomColumn {
    Omit,
    Include,
}

type PeriodBuckets<'a> = HashMap<&'a str, Vec<&'a ScheduleAssignment>>;

#[derive(Debug, Default)]
pub(crate) struct ParityBuckets<'a> {
    even: PeriodBuckets<'a>,
    odd: PeriodBuckets<'a>,
}

/// Partitions assignments by day, then parity, then period id. A weekly
/// assignment is filed under both parities.
pub(crate) fn group_by_day<'a, I>(assignments: I) -> BTreeMap<DayOfWeek, ParityBuckets<'a>>
where
    I: IntoIterator<Item = &'a ScheduleAssignment>,
{
    let mut days: BTreeMap<DayOfWeek, ParityBuckets<'a>> = BTreeMap::new();

    for assignment in assignments {
        let buckets = days.entry(assignment.day_of_week).or_default();
        let period_id = assignment.period.id.as_str();

        if assignment.even_odd.is_even_week() {
            buckets.even.entry(period_id).or_default().push(assignment);
        }
        if assignment.even_odd.is_odd_week() {
            buckets.odd.entry(period_id).or_default().push(assignment);
        }
    }

    days
}

/// Iteration domain of a semester: its days in week order without
/// duplicates and its periods in the semester's own order.
#[derive(Debug, Clone)]
pub struct SemesterGrid<'a> {
    days: Vec<DayOfWeek>,
    periods: &'a [Period],
}

impl<'a> SemesterGrid<'a> {
    pub fn new(semester: &'a SemesterDetails) -> Self {
        Self::from_parts(&semester.days_of_week, &semester.periods)
    }

    pub fn from_parts(days: &[DayOfWeek], periods: &'a [Period]) -> Self {
        let mut days = days.to_vec();
        days.sort();
        days.dedup();
        Self { days, periods }
    }

    pub fn days(&self) -> &[DayOfWeek] {
        &self.days
    }

    pub fn periods(&self) -> &[Period] {
        self.periods
    }
}

/// Builds dense day lists for one semester.
pub struct GridBuilder<'a> {
    grid: SemesterGrid<'a>,
    mapper: &'a dyn GroupMapper,
    room_column: RoomColumn,
}

impl<'a> GridBuilder<'a> {
    pub fn new(
        grid: SemesterGrid<'a>,
        mapper: &'a dyn GroupMapper,
        room_column: RoomColumn,
    ) -> Self {
        Self {
            grid,
            mapper,
            room_column,
        }
    }

    /// Exactly one entry per semester day, each with one slot per semester
    /// period in both parities, whatever `assignments` contains.
    pub fn days_for(&self, assignments: &[ScheduleAssignment]) -> Vec<DaySchedule> {
        let grouped = group_by_day(assignments);
        let empty = ParityBuckets::default();

        self.grid
            .days()
            .iter()
            .map(|day| {
                let buckets = grouped.get(day).unwrap_or(&empty);
                DaySchedule {
                    day: *day,
                    even: self.fill_periods(&buckets.even),
                    odd: self.fill_periods(&buckets.odd),
                }
            })
            .collect()
    }

    /// Placeholder for an owner without assignments. Same shape as
    /// `days_for` with no matches, since it is the same code path.
    pub fn empty_days(&self) -> Vec<DaySchedule> {
        self.days_for(&[])
    }

    fn fill_periods(&self, buckets: &PeriodBuckets<'_>) -> Vec<PeriodSlot> {
        self.grid
            .periods()
            .iter()
            .map(|period| PeriodSlot {
                class_id: period.id.clone(),
                class_name: period.name.clone(),
                lessons: buckets
                    .get(period.id.as_str())
                    .map(|slot| self.collapse_lessons(slot))
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// Occurrences sharing subject, type, teacher and room become a single
    /// entry listing every attending group, in first-seen order.
    fn collapse_lessons(&self, slot: &[&ScheduleAssignment]) -> Vec<LessonEntry> {
        let mut keyed: Vec<(LessonKey<'_>, Vec<&Group>)> = Vec::new();

        for assignment in slot {
            let key = LessonKey::of(assignment);
            let group = &assignment.lesson.group;
            match keyed.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, groups)) => {
                    if !groups.iter().any(|g| g.id == group.id) {
                        groups.push(group);
                    }
                }
                None => keyed.push((key, vec![group])),
            }
        }

        keyed
            .into_iter()
            .map(|(key, groups)| LessonEntry {
                subject_name: key.source.lesson.subject_for_site.clone(),
                lesson_type: key.lesson_type,
                teacher: key.source.lesson.teacher.clone(),
                room: match self.room_column {
                    RoomColumn::Include => Some(key.source.room.clone()),
                    RoomColumn::Omit => None,
                },
                groups: self.mapper.to_group_refs(&groups),
            })
            .collect()
    }
}

struct LessonKey<'a> {
    subject: &'a str,
    lesson_type: LessonType,
    teacher_id: &'a str,
    room_id: &'a str,
    source: &'a ScheduleAssignment,
}

impl<'a> LessonKey<'a> {
    fn of(assignment: &'a ScheduleAssignment) -> Self {
        Self {
            subject: &assignment.lesson.subject_for_site,
            lesson_type: assignment.lesson.lesson_type,
            teacher_id: &assignment.lesson.teacher.id,
            room_id: &assignment.room.id,
            source: assignment,
        }
    }
}

// `source` only carries display data and is not part of the identity.
impl PartialEq for LessonKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.subject == other.subject
            && self.lesson_type == other.lesson_type
            && self.teacher_id == other.teacher_id
            && self.room_id == other.room_id
    }
}

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{
    Group, GroupRef, Room, ScheduleAssignment, SemesterDetails, Teacher, TeacherName,
};
use crate::schedule::grid::{DaySchedule, GridBuilder, RoomColumn, SemesterGrid};
use crate::schedule::GroupMapper;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleForRoom {
    pub room_id: String,
    pub room_name: String,
    pub room_type: String,
    pub schedules: Vec<DaySchedule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleForGroup {
    pub group: GroupRef,
    pub days: Vec<DaySchedule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleForTeacher {
    pub teacher: TeacherName,
    pub days: Vec<DaySchedule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleFull {
    pub semester: SemesterDetails,
    pub schedule: Vec<ScheduleForGroup>,
}

pub type AssignmentsByOwner = HashMap<String, Vec<ScheduleAssignment>>;

fn partition<F>(assignments: Vec<ScheduleAssignment>, owner_id: F) -> AssignmentsByOwner
where
    F: Fn(&ScheduleAssignment) -> &str,
{
    let mut by_owner: AssignmentsByOwner = HashMap::new();
    for assignment in assignments {
        let key = owner_id(&assignment).to_string();
        by_owner.entry(key).or_default().push(assignment);
    }
    by_owner
}

pub fn partition_by_room(assignments: Vec<ScheduleAssignment>) -> AssignmentsByOwner {
    partition(assignments, |a| a.room.id.as_str())
}

pub fn partition_by_group(assignments: Vec<ScheduleAssignment>) -> AssignmentsByOwner {
    partition(assignments, |a| a.lesson.group.id.as_str())
}

pub fn partition_by_teacher(assignments: Vec<ScheduleAssignment>) -> AssignmentsByOwner {
    partition(assignments, |a| a.lesson.teacher.id.as_str())
}

/// Distinct groups attending any of `assignments`, by sort order.
pub fn groups_in(assignments: &[ScheduleAssignment]) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    for assignment in assignments {
        let group = &assignment.lesson.group;
        if !groups.iter().any(|g| g.id == group.id) {
            groups.push(group.clone());
        }
    }
    groups.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.title.cmp(&b.title)));
    groups
}

// One view per owner, in owner order. Owners missing from `by_owner`
// still get the full grid.
fn compose<O, V, I, B>(
    owners: &[O],
    by_owner: &AssignmentsByOwner,
    builder: &GridBuilder<'_>,
    owner_id: I,
    build: B,
) -> Vec<V>
where
    I: Fn(&O) -> &str,
    B: Fn(&O, Vec<DaySchedule>) -> V,
{
    owners
        .iter()
        .map(|owner| {
            let days = match by_owner.get(owner_id(owner)) {
                Some(assignments) => builder.days_for(assignments),
                None => builder.empty_days(),
            };
            build(owner, days)
        })
        .collect()
}

pub fn schedule_for_rooms(
    rooms: &[Room],
    semester: &SemesterDetails,
    by_room: &AssignmentsByOwner,
    mapper: &dyn GroupMapper,
) -> Vec<ScheduleForRoom> {
    let builder = GridBuilder::new(SemesterGrid::new(semester), mapper, RoomColumn::Omit);
    compose(
        rooms,
        by_room,
        &builder,
        |room| room.id.as_str(),
        |room, schedules| ScheduleForRoom {
            room_id: room.id.clone(),
            room_name: room.name.clone(),
            room_type: room.room_type.clone(),
            schedules,
        },
    )
}

pub fn schedule_for_groups(
    groups: &[Group],
    semester: &SemesterDetails,
    by_group: &AssignmentsByOwner,
    mapper: &dyn GroupMapper,
) -> Vec<ScheduleForGroup> {
    let builder = GridBuilder::new(SemesterGrid::new(semester), mapper, RoomColumn::Include);
    compose(
        groups,
        by_group,
        &builder,
        |group| group.id.as_str(),
        |group, days| ScheduleForGroup {
            group: GroupRef {
                id: group.id.clone(),
                title: group.title.clone(),
            },
            days,
        },
    )
}

pub fn schedule_for_teachers(
    teachers: &[Teacher],
    semester: &SemesterDetails,
    by_teacher: &AssignmentsByOwner,
    mapper: &dyn GroupMapper,
) -> Vec<ScheduleForTeacher> {
    let builder = GridBuilder::new(SemesterGrid::new(semester), mapper, RoomColumn::Include);
    compose(
        teachers,
        by_teacher,
        &builder,
        |teacher| teacher.id.as_str(),
        |teacher, days| ScheduleForTeacher {
            teacher: TeacherName::from(teacher),
            days,
        },
    )
}

/// Group views for every group that has at least one assignment.
pub fn schedule_full(
    semester: SemesterDetails,
    assignments: Vec<ScheduleAssignment>,
    mapper: &dyn GroupMapper,
) -> ScheduleFull {
    let groups = groups_in(&assignments);
    let by_group = partition_by_group(assignments);
    let schedule = schedule_for_groups(&groups, &semester, &by_group, mapper);
    ScheduleFull { semester, schedule }
}

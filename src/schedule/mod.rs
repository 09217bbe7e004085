//! Composition of schedule views: flat assignments in, render-ready
//! owner → day → parity → period → lessons trees out.
//!
//! Everything here is pure and synchronous. Callers fetch the semester,
//! the owners and their assignments, then hand them over together with a
//! [`GroupMapper`].

pub mod grid;
pub mod view;

#[cfg(test)]
pub(crate) mod fixtures;

pub use grid::{DaySchedule, GridBuilder, LessonEntry, PeriodSlot, RoomColumn, SemesterGrid};
pub use view::{
    AssignmentsByOwner, ScheduleForGroup, ScheduleForRoom, ScheduleForTeacher, ScheduleFull,
    groups_in, partition_by_group, partition_by_room, partition_by_teacher, schedule_for_groups,
    schedule_for_rooms, schedule_for_teachers, schedule_full,
};

use crate::models::{Group, GroupRef};

/// Turns groups attending a lesson into the references embedded in views.
pub trait GroupMapper: Send + Sync {
    fn to_group_refs(&self, groups: &[&Group]) -> Vec<GroupRef>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultGroupMapper;

impl GroupMapper for DefaultGroupMapper {
    fn to_group_refs(&self, groups: &[&Group]) -> Vec<GroupRef> {
        groups
            .iter()
            .map(|group| GroupRef {
                id: group.id.clone(),
                title: group.title.clone(),
            })
            .collect()
    }
}

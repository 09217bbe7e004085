pub mod schedule_service;
pub mod schedule_views;

pub use schedule_service::{CreateScheduleInfo, RoomAvailability, ScheduleService, SlotQuery};
pub use schedule_views::ScheduleViewService;

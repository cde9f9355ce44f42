mod plan;
mod scheduler;

pub use plan::{PlannedReminder, build_plan};
pub use scheduler::{AppliedSchedule, ReminderScheduler, ScheduleError};

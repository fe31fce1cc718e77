//! Greedy weekly timetable construction for class groups, courses, teachers
//! and classrooms, with free-room lookup, conflict-checked rescheduling and
//! slot suggestions on the same conflict model.

pub mod calendar;
pub mod config;
pub mod conflict;
pub mod data;
pub mod error;
pub mod queries;
pub mod reschedule;
pub mod server;
pub mod solver;
pub mod store;

pub use calendar::Calendar;
pub use conflict::{ConflictIndex, ConflictKey};
pub use error::{Result, ScheduleError};
pub use queries::{available_rooms, grid, suggest};
pub use reschedule::reschedule;
pub use solver::generate;
pub use store::{EntryFilter, Store};

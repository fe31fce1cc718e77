use thiserror::Error;

use crate::data::{ClassId, ClassroomId, CourseId, EntryId, TeacherId, TimeSlot};

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Timetable entry {0} not found")]
    NotFound(EntryId),

    #[error("Classroom {classroom} is already taken on {day} {slot} by entry {entry}")]
    Conflict {
        entry: EntryId,
        classroom: ClassroomId,
        day: String,
        slot: TimeSlot,
    },

    #[error("The calendar needs at least one day and one time slot")]
    EmptyCalendar,

    #[error("Unknown course {0}")]
    UnknownCourse(CourseId),

    #[error("Unknown teacher {0}")]
    UnknownTeacher(TeacherId),

    #[error("Unknown classroom {0}")]
    UnknownClassroom(ClassroomId),

    #[error("Unknown {kind} named '{name}'")]
    UnknownName { kind: &'static str, name: String },

    #[error("A {kind} named '{name}' already exists")]
    DuplicateName { kind: &'static str, name: String },

    #[error("Class {class} already has a teacher for course {course}")]
    DuplicateAssignment { class: ClassId, course: CourseId },

    #[error("Roster file could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse roster JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScheduleError {
    /// Stable machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ScheduleError::NotFound(_) => "not_found",
            ScheduleError::Conflict { .. } => "conflict",
            ScheduleError::EmptyCalendar => "empty_calendar",
            ScheduleError::UnknownCourse(_)
            | ScheduleError::UnknownTeacher(_)
            | ScheduleError::UnknownClassroom(_)
            | ScheduleError::UnknownName { .. } => "unknown_reference",
            ScheduleError::DuplicateName { .. } => "duplicate_name",
            ScheduleError::DuplicateAssignment { .. } => "duplicate_assignment",
            ScheduleError::Io(_) => "io",
            ScheduleError::Json(_) => "invalid_json",
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;

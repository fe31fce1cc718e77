use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// Roster and timetable ids, assigned by the store from 1.
pub type ClassId = u32;
pub type CourseId = u32;
pub type TeacherId = u32;
pub type ClassroomId = u32;
pub type EntryId = u32;

/// A physical classroom. Capacity is recorded for display only; placement never consults it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Classroom {
    pub id: ClassroomId,
    pub name: String,
    pub capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
}

/// A teacher. No load limit is modelled, only time conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    pub subject: String,
}

/// A cohort of students scheduled together.
///
/// `course_teachers` maps each course the class takes to the single teacher
/// who teaches it, so a second teacher for the same course cannot exist.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassGroup {
    pub id: ClassId,
    pub name: String,
    pub course_teachers: BTreeMap<CourseId, TeacherId>,
}

impl ClassGroup {
    /// The class's course assignments, ascending by course id.
    pub fn assignments(&self) -> impl Iterator<Item = CourseAssignment> + '_ {
        self.course_teachers
            .iter()
            .map(|(&course_id, &teacher_id)| CourseAssignment {
                class_id: self.id,
                course_id,
                teacher_id,
            })
    }

    pub fn assignment_for(&self, course_id: CourseId) -> Option<CourseAssignment> {
        self.course_teachers
            .get(&course_id)
            .map(|&teacher_id| CourseAssignment {
                class_id: self.id,
                course_id,
                teacher_id,
            })
    }
}

/// One (class, course, teacher) unit the generator must place once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseAssignment {
    pub class_id: ClassId,
    pub course_id: CourseId,
    pub teacher_id: TeacherId,
}

/// A fixed wall-clock window such as `09:00`-`10:00`.
///
/// Two slots conflict only when both bounds are equal; partial overlaps are
/// not detected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct TimeSlot {
    pub start: String,
    pub end: String,
}

impl TimeSlot {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A unit placed at a day, slot and classroom.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    pub id: EntryId,
    pub class_id: ClassId,
    pub course_id: CourseId,
    pub teacher_id: TeacherId,
    pub classroom_id: ClassroomId,
    pub day: String,
    pub slot: TimeSlot,
}

/// The final output of a generation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    pub entries: Vec<TimetableEntry>,
    /// One line per unit, in unit order, success or failure.
    pub summary: Vec<String>,
    pub unscheduled: Vec<CourseAssignment>,
}

impl GenerationReport {
    pub fn is_complete(&self) -> bool {
        self.unscheduled.is_empty()
    }
}

/// A free (day, slot, classroom) placement for a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub day: String,
    pub slot: TimeSlot,
    pub classroom_id: ClassroomId,
    pub classroom_name: String,
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Day: {}, Time: {}, Room: {}",
            self.day, self.slot, self.classroom_name
        )
    }
}

/// One occupied cell of a class timetable grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub entry_id: EntryId,
    pub course: String,
    pub teacher: String,
    pub classroom: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRow {
    pub slot: TimeSlot,
    /// One cell per calendar day, in calendar order.
    pub cells: Vec<Option<GridCell>>,
}

/// A class's week laid out as slots x days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassGrid {
    pub class_id: ClassId,
    pub class_name: String,
    pub days: Vec<String>,
    pub rows: Vec<GridRow>,
}

/// A roster document where classes refer to courses and teachers by name.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterInput {
    #[serde(default)]
    pub classrooms: Vec<ClassroomInput>,
    #[serde(default)]
    pub courses: Vec<String>,
    #[serde(default)]
    pub teachers: Vec<TeacherInput>,
    #[serde(default)]
    pub classes: Vec<ClassInput>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassroomInput {
    pub name: String,
    pub capacity: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TeacherInput {
    pub name: String,
    pub subject: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInput {
    pub name: String,
    /// Course name to teacher name.
    pub courses: BTreeMap<String, String>,
}

impl RosterInput {
    /// Two rooms, two courses, two teachers and two classes.
    pub fn demo() -> Self {
        Self {
            classrooms: vec![
                ClassroomInput {
                    name: "Room 101".into(),
                    capacity: 40,
                },
                ClassroomInput {
                    name: "Room 102".into(),
                    capacity: 30,
                },
            ],
            courses: vec!["Mathematics".into(), "Physics".into()],
            teachers: vec![
                TeacherInput {
                    name: "Alice".into(),
                    subject: "Mathematics".into(),
                },
                TeacherInput {
                    name: "Bob".into(),
                    subject: "Physics".into(),
                },
            ],
            classes: vec![
                ClassInput {
                    name: "FYBSc".into(),
                    courses: BTreeMap::from([("Mathematics".into(), "Alice".into())]),
                },
                ClassInput {
                    name: "SYBSc".into(),
                    courses: BTreeMap::from([("Physics".into(), "Bob".into())]),
                },
            ],
        }
    }
}

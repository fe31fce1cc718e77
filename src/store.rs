//! In-memory storage handle for the roster and the timetable.
//!
//! Every scheduling operation takes a `Store` explicitly. Roster tables and
//! entries are kept in `BTreeMap`s so iteration is ascending by id, which is
//! the order the generator and the queries rely on.

use log::debug;
use std::collections::BTreeMap;

use crate::conflict::ConflictIndex;
use crate::data::{
    ClassGroup, ClassId, Classroom, ClassroomId, Course, CourseAssignment, CourseId, EntryId,
    RosterInput, Teacher, TeacherId, TimeSlot, TimetableEntry,
};
use crate::error::{Result, ScheduleError};

/// Filtered lookup over timetable entries. Unset fields match anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryFilter<'a> {
    pub day: Option<&'a str>,
    pub slot: Option<&'a TimeSlot>,
    pub class: Option<ClassId>,
    pub classroom: Option<ClassroomId>,
    pub teacher: Option<TeacherId>,
    pub exclude: Option<EntryId>,
}

impl<'a> EntryFilter<'a> {
    pub fn at(day: &'a str, slot: &'a TimeSlot) -> Self {
        Self {
            day: Some(day),
            slot: Some(slot),
            ..Default::default()
        }
    }

    pub fn class(mut self, class: ClassId) -> Self {
        self.class = Some(class);
        self
    }

    pub fn classroom(mut self, classroom: ClassroomId) -> Self {
        self.classroom = Some(classroom);
        self
    }

    pub fn teacher(mut self, teacher: TeacherId) -> Self {
        self.teacher = Some(teacher);
        self
    }

    pub fn excluding(mut self, exclude: Option<EntryId>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn matches(&self, entry: &TimetableEntry) -> bool {
        self.day.is_none_or(|d| entry.day == d)
            && self.slot.is_none_or(|s| entry.slot == *s)
            && self.class.is_none_or(|c| entry.class_id == c)
            && self.classroom.is_none_or(|r| entry.classroom_id == r)
            && self.teacher.is_none_or(|t| entry.teacher_id == t)
            && self.exclude.is_none_or(|x| entry.id != x)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Store {
    classrooms: BTreeMap<ClassroomId, Classroom>,
    courses: BTreeMap<CourseId, Course>,
    teachers: BTreeMap<TeacherId, Teacher>,
    classes: BTreeMap<ClassId, ClassGroup>,
    entries: BTreeMap<EntryId, TimetableEntry>,
    index: ConflictIndex,
}

fn next_id<V>(table: &BTreeMap<u32, V>) -> u32 {
    table.keys().next_back().map_or(1, |last| last + 1)
}

fn ensure_unique<'a>(
    mut names: impl Iterator<Item = &'a str>,
    kind: &'static str,
    name: &str,
) -> Result<()> {
    if names.any(|existing| existing == name) {
        return Err(ScheduleError::DuplicateName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_classroom(&mut self, name: &str, capacity: u32) -> Result<Classroom> {
        ensure_unique(self.classrooms.values().map(|r| r.name.as_str()), "classroom", name)?;
        let classroom = Classroom {
            id: next_id(&self.classrooms),
            name: name.to_string(),
            capacity,
        };
        debug!("Added classroom {} ({})", classroom.name, classroom.id);
        self.classrooms.insert(classroom.id, classroom.clone());
        Ok(classroom)
    }

    pub fn add_course(&mut self, name: &str) -> Result<Course> {
        ensure_unique(self.courses.values().map(|c| c.name.as_str()), "course", name)?;
        let course = Course {
            id: next_id(&self.courses),
            name: name.to_string(),
        };
        debug!("Added course {} ({})", course.name, course.id);
        self.courses.insert(course.id, course.clone());
        Ok(course)
    }

    pub fn add_teacher(&mut self, name: &str, subject: &str) -> Result<Teacher> {
        ensure_unique(self.teachers.values().map(|t| t.name.as_str()), "teacher", name)?;
        let teacher = Teacher {
            id: next_id(&self.teachers),
            name: name.to_string(),
            subject: subject.to_string(),
        };
        debug!("Added teacher {} ({})", teacher.name, teacher.id);
        self.teachers.insert(teacher.id, teacher.clone());
        Ok(teacher)
    }

    /// Adds a class with one teacher per course. Nothing is stored unless
    /// every pair is valid.
    pub fn add_class(
        &mut self,
        name: &str,
        course_teachers: &[(CourseId, TeacherId)],
    ) -> Result<ClassGroup> {
        ensure_unique(self.classes.values().map(|c| c.name.as_str()), "class", name)?;
        let id = next_id(&self.classes);
        let mut map = BTreeMap::new();
        for &(course_id, teacher_id) in course_teachers {
            self.check_pair(course_id, teacher_id)?;
            if map.insert(course_id, teacher_id).is_some() {
                return Err(ScheduleError::DuplicateAssignment {
                    class: id,
                    course: course_id,
                });
            }
        }
        let class = ClassGroup {
            id,
            name: name.to_string(),
            course_teachers: map,
        };
        debug!(
            "Added class {} ({}) with {} courses",
            class.name,
            class.id,
            class.course_teachers.len()
        );
        self.classes.insert(id, class.clone());
        Ok(class)
    }

    fn check_pair(&self, course_id: CourseId, teacher_id: TeacherId) -> Result<()> {
        if !self.courses.contains_key(&course_id) {
            return Err(ScheduleError::UnknownCourse(course_id));
        }
        if !self.teachers.contains_key(&teacher_id) {
            return Err(ScheduleError::UnknownTeacher(teacher_id));
        }
        Ok(())
    }

    /// Inserts a whole roster document. On error the store is left as it was.
    pub fn load_roster(&mut self, roster: &RosterInput) -> Result<()> {
        let mut staged = self.clone();
        for room in &roster.classrooms {
            staged.add_classroom(&room.name, room.capacity)?;
        }
        for course in &roster.courses {
            staged.add_course(course)?;
        }
        for teacher in &roster.teachers {
            staged.add_teacher(&teacher.name, &teacher.subject)?;
        }
        for class in &roster.classes {
            let pairs = class
                .courses
                .iter()
                .map(|(course, teacher)| {
                    Ok((staged.course_id(course)?, staged.teacher_id(teacher)?))
                })
                .collect::<Result<Vec<_>>>()?;
            staged.add_class(&class.name, &pairs)?;
        }
        *self = staged;
        Ok(())
    }

    fn course_id(&self, name: &str) -> Result<CourseId> {
        self.courses
            .values()
            .find(|c| c.name == name)
            .map(|c| c.id)
            .ok_or_else(|| ScheduleError::UnknownName {
                kind: "course",
                name: name.to_string(),
            })
    }

    fn teacher_id(&self, name: &str) -> Result<TeacherId> {
        self.teachers
            .values()
            .find(|t| t.name == name)
            .map(|t| t.id)
            .ok_or_else(|| ScheduleError::UnknownName {
                kind: "teacher",
                name: name.to_string(),
            })
    }

    pub fn classroom(&self, id: ClassroomId) -> Option<&Classroom> {
        self.classrooms.get(&id)
    }

    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses.get(&id)
    }

    pub fn teacher(&self, id: TeacherId) -> Option<&Teacher> {
        self.teachers.get(&id)
    }

    pub fn class(&self, id: ClassId) -> Option<&ClassGroup> {
        self.classes.get(&id)
    }

    pub fn classrooms(&self) -> impl Iterator<Item = &Classroom> {
        self.classrooms.values()
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassGroup> {
        self.classes.values()
    }

    pub fn entry(&self, id: EntryId) -> Option<&TimetableEntry> {
        self.entries.get(&id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &TimetableEntry> {
        self.entries.values()
    }

    pub fn find_entry(&self, filter: &EntryFilter<'_>) -> Option<&TimetableEntry> {
        self.entries.values().find(|e| filter.matches(e))
    }

    pub fn index(&self) -> &ConflictIndex {
        &self.index
    }

    /// Bulk delete of every entry. Entry ids restart at 1 afterwards.
    pub(crate) fn clear_entries(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    pub(crate) fn insert_entry(
        &mut self,
        unit: CourseAssignment,
        classroom_id: ClassroomId,
        day: &str,
        slot: &TimeSlot,
    ) -> TimetableEntry {
        let entry = TimetableEntry {
            id: next_id(&self.entries),
            class_id: unit.class_id,
            course_id: unit.course_id,
            teacher_id: unit.teacher_id,
            classroom_id,
            day: day.to_string(),
            slot: slot.clone(),
        };
        self.index.mark_entry(&entry);
        self.entries.insert(entry.id, entry.clone());
        entry
    }

    /// Moves an entry in place, keeping the index in step.
    pub(crate) fn move_entry(
        &mut self,
        id: EntryId,
        day: &str,
        slot: &TimeSlot,
        classroom_id: ClassroomId,
    ) -> Result<TimetableEntry> {
        let entry = self.entries.get_mut(&id).ok_or(ScheduleError::NotFound(id))?;
        self.index.release_entry(entry);
        entry.day = day.to_string();
        entry.slot = slot.clone();
        entry.classroom_id = classroom_id;
        self.index.mark_entry(entry);
        Ok(entry.clone())
    }

    pub fn class_name(&self, id: ClassId) -> &str {
        self.classes.get(&id).map_or("?", |c| c.name.as_str())
    }

    pub fn course_name(&self, id: CourseId) -> &str {
        self.courses.get(&id).map_or("?", |c| c.name.as_str())
    }

    pub fn teacher_name(&self, id: TeacherId) -> &str {
        self.teachers.get(&id).map_or("?", |t| t.name.as_str())
    }

    pub fn classroom_name(&self, id: ClassroomId) -> &str {
        self.classrooms.get(&id).map_or("?", |r| r.name.as_str())
    }

    /// `"<class> - <course> in <room> by <teacher> on <day> <start>-<end>"`
    pub fn describe(&self, entry: &TimetableEntry) -> String {
        format!(
            "{} - {} in {} by {} on {} {}",
            self.class_name(entry.class_id),
            self.course_name(entry.course_id),
            self.classroom_name(entry.classroom_id),
            self.teacher_name(entry.teacher_id),
            entry.day,
            entry.slot
        )
    }
}

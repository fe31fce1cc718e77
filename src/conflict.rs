use std::collections::HashMap;

use crate::data::{ClassroomId, TeacherId, TimeSlot, TimetableEntry};

/// Identifies one resource's occupancy at one day and slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConflictKey {
    Classroom {
        day: String,
        slot: TimeSlot,
        classroom: ClassroomId,
    },
    Teacher {
        day: String,
        slot: TimeSlot,
        teacher: TeacherId,
    },
}

impl ConflictKey {
    pub fn classroom(day: &str, slot: &TimeSlot, classroom: ClassroomId) -> Self {
        ConflictKey::Classroom {
            day: day.to_string(),
            slot: slot.clone(),
            classroom,
        }
    }

    pub fn teacher(day: &str, slot: &TimeSlot, teacher: TeacherId) -> Self {
        ConflictKey::Teacher {
            day: day.to_string(),
            slot: slot.clone(),
            teacher,
        }
    }

    /// The classroom key and the teacher key an entry holds.
    pub fn for_entry(entry: &TimetableEntry) -> [ConflictKey; 2] {
        [
            Self::classroom(&entry.day, &entry.slot, entry.classroom_id),
            Self::teacher(&entry.day, &entry.slot, entry.teacher_id),
        ]
    }
}

/// Occupancy markers for classrooms and teachers.
///
/// Markers are counted: reschedule never checks teachers, so two entries can
/// end up holding the same teacher key and releasing one must not free the
/// other.
#[derive(Debug, Clone, Default)]
pub struct ConflictIndex {
    used: HashMap<ConflictKey, usize>,
}

impl ConflictIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_occupied(&self, key: &ConflictKey) -> bool {
        self.used.contains_key(key)
    }

    pub fn mark(&mut self, key: ConflictKey) {
        *self.used.entry(key).or_insert(0) += 1;
    }

    pub fn release(&mut self, key: &ConflictKey) {
        if let Some(count) = self.used.get_mut(key) {
            *count -= 1;
            if *count == 0 {
                self.used.remove(key);
            }
        }
    }

    pub fn mark_entry(&mut self, entry: &TimetableEntry) {
        for key in ConflictKey::for_entry(entry) {
            self.mark(key);
        }
    }

    pub fn release_entry(&mut self, entry: &TimetableEntry) {
        for key in ConflictKey::for_entry(entry) {
            self.release(&key);
        }
    }

    pub fn clear(&mut self) {
        self.used.clear();
    }

    /// Total markers held, counting duplicates.
    pub fn len(&self) -> usize {
        self.used.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u32, classroom_id: u32, teacher_id: u32) -> TimetableEntry {
        TimetableEntry {
            id,
            class_id: 1,
            course_id: 1,
            teacher_id,
            classroom_id,
            day: "Monday".into(),
            slot: TimeSlot::new("09:00", "10:00"),
        }
    }

    #[test]
    fn classroom_and_teacher_keys_never_alias() {
        let slot = TimeSlot::new("09:00", "10:00");
        let mut index = ConflictIndex::new();
        index.mark(ConflictKey::classroom("Monday", &slot, 1));
        assert!(index.is_occupied(&ConflictKey::classroom("Monday", &slot, 1)));
        assert!(!index.is_occupied(&ConflictKey::teacher("Monday", &slot, 1)));
    }

    #[test]
    fn keys_are_exact_slot_matches() {
        let mut index = ConflictIndex::new();
        index.mark(ConflictKey::classroom("Monday", &TimeSlot::new("09:00", "10:00"), 1));
        assert!(!index.is_occupied(&ConflictKey::classroom(
            "Monday",
            &TimeSlot::new("09:30", "10:30"),
            1
        )));
        assert!(!index.is_occupied(&ConflictKey::classroom(
            "Tuesday",
            &TimeSlot::new("09:00", "10:00"),
            1
        )));
    }

    #[test]
    fn shared_keys_survive_a_single_release() {
        let mut index = ConflictIndex::new();
        let a = entry(1, 1, 5);
        let b = entry(2, 2, 5);
        index.mark_entry(&a);
        index.mark_entry(&b);
        assert_eq!(index.len(), 4);

        index.release_entry(&a);
        assert!(!index.is_occupied(&ConflictKey::for_entry(&a)[0]));
        assert!(index.is_occupied(&ConflictKey::teacher("Monday", &a.slot, 5)));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn clear_empties_the_index() {
        let mut index = ConflictIndex::new();
        index.mark_entry(&entry(1, 1, 1));
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }
}

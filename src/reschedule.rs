use log::{info, warn};

use crate::data::{ClassroomId, EntryId, TimeSlot, TimetableEntry};
use crate::error::{Result, ScheduleError};
use crate::store::{EntryFilter, Store};

/// Moves one entry to `new_day`/`new_slot`, optionally into another classroom.
///
/// Only the classroom is checked for a clash; the teacher's other sessions are
/// not. On any error the store is unchanged.
pub fn reschedule(
    store: &mut Store,
    entry_id: EntryId,
    new_day: &str,
    new_slot: &TimeSlot,
    new_classroom: Option<ClassroomId>,
) -> Result<TimetableEntry> {
    let entry = store
        .entry(entry_id)
        .ok_or(ScheduleError::NotFound(entry_id))?;
    let classroom = new_classroom.unwrap_or(entry.classroom_id);
    if store.classroom(classroom).is_none() {
        return Err(ScheduleError::UnknownClassroom(classroom));
    }

    let clash = EntryFilter::at(new_day, new_slot)
        .classroom(classroom)
        .excluding(Some(entry_id));
    if let Some(other) = store.find_entry(&clash) {
        warn!(
            "Cannot move entry {} to {} {}: {} holds {}",
            entry_id,
            new_day,
            new_slot,
            other.id,
            store.classroom_name(classroom)
        );
        return Err(ScheduleError::Conflict {
            entry: other.id,
            classroom,
            day: new_day.to_string(),
            slot: new_slot.clone(),
        });
    }

    let moved = store.move_entry(entry_id, new_day, new_slot, classroom)?;
    info!("Rescheduled {}", store.describe(&moved));
    Ok(moved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Calendar;
    use crate::conflict::ConflictKey;
    use crate::data::RosterInput;
    use crate::solver::generate;

    fn scheduled() -> Store {
        let mut store = Store::new();
        store.load_roster(&RosterInput::demo()).unwrap();
        let calendar = Calendar::new(
            vec!["Monday".into()],
            vec![TimeSlot::new("09:00", "10:00")],
        );
        generate(&mut store, &calendar).unwrap();
        store
    }

    #[test]
    fn missing_entry_is_not_found() {
        let mut store = scheduled();
        let err = reschedule(&mut store, 42, "Monday", &TimeSlot::new("10:00", "11:00"), None)
            .unwrap_err();
        assert!(matches!(err, ScheduleError::NotFound(42)));
    }

    #[test]
    fn occupied_classroom_is_a_conflict_and_nothing_moves() {
        let mut store = scheduled();
        let before: Vec<TimetableEntry> = store.entries().cloned().collect();

        let err = reschedule(&mut store, 2, "Monday", &TimeSlot::new("09:00", "10:00"), Some(1))
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Conflict { entry: 1, classroom: 1, .. }));

        let after: Vec<TimetableEntry> = store.entries().cloned().collect();
        assert_eq!(before, after);
        assert_eq!(store.index().len(), 4);
    }

    #[test]
    fn move_updates_entry_and_index() {
        let mut store = scheduled();
        let slot = TimeSlot::new("10:00", "11:00");
        let moved = reschedule(&mut store, 1, "Tuesday", &slot, None).unwrap();
        assert_eq!(moved.day, "Tuesday");
        assert_eq!(moved.classroom_id, 1);
        assert_eq!(store.entry(1), Some(&moved));

        let old = TimeSlot::new("09:00", "10:00");
        assert!(!store.index().is_occupied(&ConflictKey::classroom("Monday", &old, 1)));
        assert!(!store.index().is_occupied(&ConflictKey::teacher("Monday", &old, 1)));
        assert!(store.index().is_occupied(&ConflictKey::classroom("Tuesday", &slot, 1)));
        assert!(store.index().is_occupied(&ConflictKey::teacher("Tuesday", &slot, 1)));
        assert_eq!(store.index().len(), 4);
    }

    #[test]
    fn staying_in_place_is_not_a_conflict() {
        let mut store = scheduled();
        let slot = TimeSlot::new("09:00", "10:00");
        assert!(reschedule(&mut store, 1, "Monday", &slot, Some(1)).is_ok());
    }

    #[test]
    fn unknown_target_classroom_is_rejected() {
        let mut store = scheduled();
        let err = reschedule(&mut store, 1, "Friday", &TimeSlot::new("09:00", "10:00"), Some(7))
            .unwrap_err();
        assert!(matches!(err, ScheduleError::UnknownClassroom(7)));
        assert_eq!(store.entry(1).unwrap().day, "Monday");
    }

    #[test]
    fn teacher_clash_is_not_checked() {
        let mut store = Store::new();
        store.add_classroom("Room 101", 40).unwrap();
        store.add_classroom("Room 102", 40).unwrap();
        store.add_course("Mathematics").unwrap();
        store.add_teacher("Alice", "Mathematics").unwrap();
        store.add_class("FYBSc", &[(1, 1)]).unwrap();
        store.add_class("SYBSc", &[(1, 1)]).unwrap();
        generate(&mut store, &Calendar::weekly()).unwrap();

        // SYBSc sits at Monday 09:00; moving it next to FYBSc at 08:00 in the
        // other room double-books Alice.
        let slot = TimeSlot::new("08:00", "09:00");
        let moved = reschedule(&mut store, 2, "Monday", &slot, Some(2)).unwrap();
        assert_eq!(moved.slot, slot);

        // Moving FYBSc away must keep Alice marked for SYBSc.
        reschedule(&mut store, 1, "Friday", &slot, None).unwrap();
        assert!(store.index().is_occupied(&ConflictKey::teacher("Monday", &slot, 1)));
    }
}

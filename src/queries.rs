//! Read-only lookups against the current timetable.

use itertools::iproduct;
use log::debug;

use crate::calendar::Calendar;
use crate::conflict::ConflictKey;
use crate::data::{
    ClassGrid, ClassId, Classroom, CourseId, EntryId, GridCell, GridRow, Suggestion, TimeSlot,
};
use crate::store::{EntryFilter, Store};

/// Classrooms, ascending by id, with nothing booked at `day` and `slot`.
/// Teachers are not considered.
pub fn available_rooms(store: &Store, day: &str, slot: &TimeSlot) -> Vec<Classroom> {
    store
        .classrooms()
        .filter(|room| !store.index().is_occupied(&ConflictKey::classroom(day, slot, room.id)))
        .cloned()
        .collect()
}

/// Every free placement for the unit `(class_id, course_id)` in `calendar`.
///
/// A placement is free when no other entry holds the classroom there and no
/// other entry has the unit's teacher there. `exclude` removes one entry from
/// both checks so an entry being moved does not block itself. Results keep
/// enumeration order: days, then slots, then classrooms.
pub fn suggest(
    store: &Store,
    calendar: &Calendar,
    class_id: ClassId,
    course_id: CourseId,
    exclude: Option<EntryId>,
) -> Vec<Suggestion> {
    let Some(unit) = store
        .class(class_id)
        .and_then(|class| class.assignment_for(course_id))
    else {
        debug!("Class {} does not take course {}", class_id, course_id);
        return Vec::new();
    };

    let classrooms: Vec<&Classroom> = store.classrooms().collect();
    iproduct!(&calendar.days, &calendar.slots, &classrooms)
        .filter(|&(day, slot, room)| {
            let at = EntryFilter::at(day, slot).excluding(exclude);
            store.find_entry(&at.classroom(room.id)).is_none()
                && store.find_entry(&at.teacher(unit.teacher_id)).is_none()
        })
        .map(|(day, slot, room)| Suggestion {
            day: day.clone(),
            slot: slot.clone(),
            classroom_id: room.id,
            classroom_name: room.name.clone(),
        })
        .collect()
}

/// Lays out each class's entries as slot rows by day columns.
/// Entries outside `calendar` are left out.
pub fn grid(store: &Store, calendar: &Calendar) -> Vec<ClassGrid> {
    store
        .classes()
        .map(|class| {
            let rows = calendar
                .slots
                .iter()
                .map(|slot| GridRow {
                    slot: slot.clone(),
                    cells: calendar
                        .days
                        .iter()
                        .map(|day| {
                            store
                                .find_entry(&EntryFilter::at(day, slot).class(class.id))
                                .map(|entry| GridCell {
                                    entry_id: entry.id,
                                    course: store.course_name(entry.course_id).to_string(),
                                    teacher: store.teacher_name(entry.teacher_id).to_string(),
                                    classroom: store.classroom_name(entry.classroom_id).to_string(),
                                })
                        })
                        .collect(),
                })
                .collect();
            ClassGrid {
                class_id: class.id,
                class_name: class.name.clone(),
                days: calendar.days.clone(),
                rows,
            }
        })
        .collect()
}

use itertools::iproduct;
use log::{info, trace, warn};
use std::time::Instant;

use crate::calendar::Calendar;
use crate::conflict::ConflictKey;
use crate::data::{ClassroomId, CourseAssignment, GenerationReport};
use crate::error::Result;
use crate::store::Store;

/// Builds a fresh timetable with greedy first-fit placement.
///
/// Prior entries are dropped and the conflict index reset. Units are taken
/// class by class (ascending id), course by course (ascending id). Each unit
/// goes into the first `day x slot x classroom` combination, in calendar order
/// with classrooms ascending, whose classroom and teacher are both free.
/// Earlier placements are never revisited, so a unit can fail only because
/// earlier units took what it needed; it is then listed as unscheduled.
pub fn generate(store: &mut Store, calendar: &Calendar) -> Result<GenerationReport> {
    calendar.validate()?;
    let start_time = Instant::now();

    store.clear_entries();
    let units: Vec<CourseAssignment> = store.classes().flat_map(|c| c.assignments()).collect();
    let classrooms: Vec<ClassroomId> = store.classrooms().map(|r| r.id).collect();
    info!(
        "Generating timetable for {} units over {} days, {} slots and {} classrooms...",
        units.len(),
        calendar.days.len(),
        calendar.slots.len(),
        classrooms.len()
    );

    let mut report = GenerationReport {
        entries: Vec::with_capacity(units.len()),
        summary: Vec::with_capacity(units.len()),
        unscheduled: Vec::new(),
    };

    for unit in units {
        let placement = iproduct!(&calendar.days, &calendar.slots, &classrooms).find(
            |&(day, slot, &classroom)| {
                let index = store.index();
                !index.is_occupied(&ConflictKey::classroom(day, slot, classroom))
                    && !index.is_occupied(&ConflictKey::teacher(day, slot, unit.teacher_id))
            },
        );

        match placement {
            Some((day, slot, &classroom)) => {
                let entry = store.insert_entry(unit, classroom, day, slot);
                let line = store.describe(&entry);
                trace!("Placed {}", line);
                report.summary.push(line);
                report.entries.push(entry);
            }
            None => {
                let line = format!(
                    "Could not schedule {} - {}",
                    store.class_name(unit.class_id),
                    store.course_name(unit.course_id)
                );
                warn!("{}", line);
                report.summary.push(line);
                report.unscheduled.push(unit);
            }
        }
    }

    info!(
        "Timetable generation complete in {:.2?}: {} placed, {} unscheduled",
        start_time.elapsed(),
        report.entries.len(),
        report.unscheduled.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TimeSlot;
    use crate::error::ScheduleError;

    fn one_slot() -> Calendar {
        Calendar::new(vec!["Monday".into()], vec![TimeSlot::new("09:00", "10:00")])
    }

    #[test]
    fn single_unit_is_scheduled() {
        let mut store = Store::new();
        store.add_classroom("Room 101", 40).unwrap();
        store.add_course("Mathematics").unwrap();
        store.add_teacher("Alice", "Mathematics").unwrap();
        store.add_class("FYBSc", &[(1, 1)]).unwrap();

        let report = generate(&mut store, &one_slot()).unwrap();
        assert!(report.is_complete());
        assert_eq!(
            report.summary,
            vec!["FYBSc - Mathematics in Room 101 by Alice on Monday 09:00-10:00"]
        );
    }

    #[test]
    fn shared_teacher_with_one_slot_leaves_one_unit_unscheduled() {
        let mut store = Store::new();
        store.add_classroom("Room 101", 40).unwrap();
        store.add_classroom("Room 102", 40).unwrap();
        store.add_course("Mathematics").unwrap();
        store.add_teacher("Alice", "Mathematics").unwrap();
        store.add_class("FYBSc", &[(1, 1)]).unwrap();
        store.add_class("SYBSc", &[(1, 1)]).unwrap();

        let report = generate(&mut store, &one_slot()).unwrap();
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].class_id, 1);
        assert_eq!(report.unscheduled.len(), 1);
        assert_eq!(report.summary[1], "Could not schedule SYBSc - Mathematics");
    }

    #[test]
    fn no_classrooms_means_nothing_schedules() {
        let mut store = Store::new();
        store.add_course("Mathematics").unwrap();
        store.add_teacher("Alice", "Mathematics").unwrap();
        store.add_class("FYBSc", &[(1, 1)]).unwrap();

        let report = generate(&mut store, &Calendar::weekly()).unwrap();
        assert!(report.entries.is_empty());
        assert_eq!(report.unscheduled.len(), 1);
    }

    #[test]
    fn empty_calendar_is_rejected_before_touching_entries() {
        let mut store = Store::new();
        store.load_roster(&crate::data::RosterInput::demo()).unwrap();
        generate(&mut store, &Calendar::weekly()).unwrap();

        let empty = Calendar::new(vec![], vec![]);
        assert!(matches!(
            generate(&mut store, &empty),
            Err(ScheduleError::EmptyCalendar)
        ));
        assert_eq!(store.entries().count(), 2);
    }

    #[test]
    fn classroom_fills_before_the_next_slot() {
        let mut store = Store::new();
        store.add_classroom("Room 101", 40).unwrap();
        store.add_classroom("Room 102", 40).unwrap();
        store.add_course("Mathematics").unwrap();
        store.add_course("Physics").unwrap();
        store.add_teacher("Alice", "Mathematics").unwrap();
        store.add_teacher("Bob", "Physics").unwrap();
        store.add_class("FYBSc", &[(1, 1), (2, 2)]).unwrap();
        store.add_class("SYBSc", &[(1, 1)]).unwrap();

        let report = generate(&mut store, &Calendar::weekly()).unwrap();
        let placed: Vec<(String, String, u32)> = report
            .entries
            .iter()
            .map(|e| (e.day.clone(), e.slot.start.clone(), e.classroom_id))
            .collect();
        assert_eq!(
            placed,
            vec![
                ("Monday".to_string(), "08:00".to_string(), 1),
                ("Monday".to_string(), "08:00".to_string(), 2),
                ("Monday".to_string(), "09:00".to_string(), 1),
            ]
        );
    }
}

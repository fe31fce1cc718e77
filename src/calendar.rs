use serde::{Deserialize, Serialize};

use crate::data::TimeSlot;
use crate::error::{Result, ScheduleError};

pub const WEEKDAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

/// The candidate days and slots a search runs over, in search order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Calendar {
    pub days: Vec<String>,
    pub slots: Vec<TimeSlot>,
}

impl Calendar {
    pub fn new(days: Vec<String>, slots: Vec<TimeSlot>) -> Self {
        Self { days, slots }
    }

    /// Monday to Friday, hourly from 08:00 to 18:00.
    pub fn weekly() -> Self {
        Self::new(weekdays(), hourly_slots(8, 18))
    }

    /// Monday to Friday, three morning slots from 09:00 to 12:00.
    ///
    /// Deliberately narrower than [`Calendar::weekly`].
    pub fn suggestion() -> Self {
        Self::new(weekdays(), hourly_slots(9, 12))
    }

    pub fn validate(&self) -> Result<()> {
        if self.days.is_empty() || self.slots.is_empty() {
            return Err(ScheduleError::EmptyCalendar);
        }
        Ok(())
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::weekly()
    }
}

fn weekdays() -> Vec<String> {
    WEEKDAYS.iter().map(|d| d.to_string()).collect()
}

/// One-hour slots starting at each hour in `first..last`.
pub fn hourly_slots(first: u32, last: u32) -> Vec<TimeSlot> {
    (first..last)
        .map(|h| TimeSlot::new(format!("{:02}:00", h), format!("{:02}:00", h + 1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekly_calendar_covers_business_hours() {
        let calendar = Calendar::weekly();
        assert_eq!(calendar.days.len(), 5);
        assert_eq!(calendar.slots.len(), 10);
        assert_eq!(calendar.slots[0], TimeSlot::new("08:00", "09:00"));
        assert_eq!(calendar.slots[9], TimeSlot::new("17:00", "18:00"));
    }

    #[test]
    fn suggestion_calendar_is_three_morning_slots() {
        let calendar = Calendar::suggestion();
        assert_eq!(
            calendar.slots,
            vec![
                TimeSlot::new("09:00", "10:00"),
                TimeSlot::new("10:00", "11:00"),
                TimeSlot::new("11:00", "12:00"),
            ]
        );
    }

    #[test]
    fn empty_days_or_slots_are_rejected() {
        let no_days = Calendar::new(vec![], hourly_slots(9, 10));
        assert!(matches!(no_days.validate(), Err(ScheduleError::EmptyCalendar)));
        let no_slots = Calendar::new(vec!["Monday".into()], vec![]);
        assert!(matches!(no_slots.validate(), Err(ScheduleError::EmptyCalendar)));
        assert!(Calendar::weekly().validate().is_ok());
    }
}

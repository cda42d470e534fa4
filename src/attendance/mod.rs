//! Grouping and tallying of dated attendance records for the calendar view
//! and day-level summaries.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::data::types::{AttendanceRecord, Participant};

/// Points credited per attendance record on the day-detail total.
pub const ATTENDANCE_POINTS: i64 = 10;

/// Every (participant, record) pair on the given calendar day, across all
/// participants. Duplicates from the same participant are included.
pub fn records_on_date<'a>(
    participants: &'a [Participant],
    date: NaiveDate,
) -> Vec<(&'a Participant, &'a AttendanceRecord)> {
    participants
        .iter()
        .flat_map(|participant| {
            participant
                .attendance_records()
                .iter()
                .filter(move |record| record.date == date)
                .map(move |record| (participant, record))
        })
        .collect()
}

/// Distinct dates with any attendance, for calendar highlighting.
pub fn all_attendance_dates(participants: &[Participant]) -> BTreeSet<NaiveDate> {
    participants
        .iter()
        .flat_map(|participant| participant.attendance_records())
        .map(|record| record.date)
        .collect()
}

/// Distinct dates per activity type, for calendar markers. A date with
/// several records of one type collapses to a single marker.
pub fn dates_by_activity_type(
    participants: &[Participant],
) -> BTreeMap<String, BTreeSet<NaiveDate>> {
    let mut by_type: BTreeMap<String, BTreeSet<NaiveDate>> = BTreeMap::new();
    for participant in participants {
        for record in participant.attendance_records() {
            by_type
                .entry(record.activity_type.clone())
                .or_default()
                .insert(record.date);
        }
    }
    by_type
}

/// Occurrence tallies per activity type on one day. Counts records, not
/// distinct participants.
pub fn counts_by_type_on_date(
    participants: &[Participant],
    date: NaiveDate,
) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for (_, record) in records_on_date(participants, date) {
        *counts.entry(record.activity_type.clone()).or_default() += 1;
    }
    counts
}

/// One activity-type group in the day-detail panel.
pub struct DayGroup<'a> {
    pub activity_type: &'a str,
    /// Deduplicated by participant id, first-seen order. A participant
    /// with two same-type records on one day appears once here while both
    /// records still count in `record_count`.
    pub roster: Vec<&'a Participant>,
    pub record_count: usize,
}

/// Day-detail groups sorted by activity-type name.
pub fn grouped_by_type_on_date<'a>(
    participants: &'a [Participant],
    date: NaiveDate,
) -> Vec<DayGroup<'a>> {
    let mut groups: BTreeMap<&'a str, (Vec<&'a Participant>, HashSet<u32>, usize)> =
        BTreeMap::new();

    for (participant, record) in records_on_date(participants, date) {
        let (roster, seen, count) = groups.entry(record.activity_type.as_str()).or_default();
        *count += 1;
        if seen.insert(participant.id) {
            roster.push(participant);
        }
    }

    groups
        .into_iter()
        .map(|(activity_type, (roster, _, record_count))| DayGroup {
            activity_type,
            roster,
            record_count,
        })
        .collect()
}

/// Day total shown under the detail panel: every occurrence counts.
pub fn day_total_points(participants: &[Participant], date: NaiveDate) -> i64 {
    records_on_date(participants, date).len() as i64 * ATTENDANCE_POINTS
}

/// All dates on which one participant has attendance, in record order.
pub fn participant_attendance_dates(participant: &Participant) -> Vec<NaiveDate> {
    participant
        .attendance_records()
        .iter()
        .map(|record| record.date)
        .collect()
}

/// One participant's records grouped by activity type.
pub fn attendance_by_type(participant: &Participant) -> BTreeMap<&str, Vec<&AttendanceRecord>> {
    let mut by_type: BTreeMap<&str, Vec<&AttendanceRecord>> = BTreeMap::new();
    for record in participant.attendance_records() {
        by_type
            .entry(record.activity_type.as_str())
            .or_default()
            .push(record);
    }
    by_type
}

pub fn total_attendance_count(participant: &Participant) -> usize {
    participant.attendance_records().len()
}

pub fn total_attendance_points(participant: &Participant) -> i64 {
    total_attendance_count(participant) as i64 * ATTENDANCE_POINTS
}

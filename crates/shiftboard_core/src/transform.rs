//! Pure reshaping of API collections into display trees.
//!
//! Grouping helpers keep first-seen order for groups and input order within a
//! group; nothing here sorts unless its name says so.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::model::{Job, Location, Shift, ShiftAssignment, Volunteer};

/// Jobs sharing one location, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationGroup<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub jobs: Vec<&'a Job>,
}

/// A volunteer's assignments for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobShifts {
    pub job_id: String,
    pub job_name: String,
    pub location_name: String,
    pub shifts: Vec<ShiftWindow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRegistrations {
    pub date: NaiveDate,
    pub count: usize,
}

pub fn organize_jobs_by_location(jobs: &[Job]) -> Vec<LocationGroup<'_>> {
    let mut groups: Vec<LocationGroup<'_>> = Vec::new();
    for job in jobs {
        match groups.iter_mut().find(|g| g.id == job.location_id) {
            Some(group) => group.jobs.push(job),
            None => groups.push(LocationGroup {
                id: &job.location_id,
                name: job.location_name(),
                jobs: vec![job],
            }),
        }
    }
    groups
}

/// Regroups a volunteer's flat assignment list under the job of each shift.
pub fn group_assignments_by_job(assignments: &[ShiftAssignment]) -> Vec<JobShifts> {
    let mut grouped: Vec<JobShifts> = Vec::new();
    for assignment in assignments {
        let shift = &assignment.shift;
        let window = ShiftWindow {
            start_time: shift.start_time,
            end_time: shift.end_time,
        };
        match grouped.iter_mut().find(|g| g.job_id == shift.job_id) {
            Some(group) => group.shifts.push(window),
            None => {
                let job = shift.job.as_deref();
                grouped.push(JobShifts {
                    job_id: shift.job_id.clone(),
                    job_name: job.map(|j| j.name.clone()).unwrap_or_default(),
                    location_name: job.map(|j| j.location_name().to_string()).unwrap_or_default(),
                    shifts: vec![window],
                });
            }
        }
    }
    grouped
}

/// Case-insensitive substring search over name, email and phone.
pub fn filter_volunteers<'a>(volunteers: &'a [Volunteer], query: &str) -> Vec<&'a Volunteer> {
    if query.is_empty() {
        return volunteers.iter().collect();
    }
    let needle = query.to_lowercase();
    volunteers
        .iter()
        .filter(|v| {
            [&v.name, &v.email, &v.phone]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// True when more than one volunteer carries exactly this name.
pub fn is_duplicate(name: &str, volunteers: &[Volunteer]) -> bool {
    volunteers.iter().filter(|v| v.name == name).take(2).count() > 1
}

/// Percentage of capacity filled, rounded. `None` for zero-capacity shifts.
pub fn fill_ratio(assigned: usize, capacity: u32) -> Option<u32> {
    if capacity == 0 {
        return None;
    }
    Some((assigned as f64 / f64::from(capacity) * 100.0).round() as u32)
}

/// Unique embedded locations across `jobs`, first-seen order.
pub fn distinct_locations(jobs: &[Job]) -> Vec<Location> {
    let mut locations: Vec<Location> = Vec::new();
    for location in jobs.iter().filter_map(|j| j.location.as_ref()) {
        if !locations.iter().any(|l| l.id == location.id) {
            locations.push(location.clone());
        }
    }
    locations
}

/// Proposed window for a shift appended to `shifts`: it starts where the
/// latest-ending shift ends and runs for that shift's duration.
pub fn next_shift_window(shifts: &[Shift], now: DateTime<Utc>) -> ShiftWindow {
    let Some(last) = shifts.iter().max_by_key(|s| s.end_time) else {
        return ShiftWindow {
            start_time: now,
            end_time: now,
        };
    };
    let duration: Duration = last.end_time - last.start_time;
    ShiftWindow {
        start_time: last.end_time,
        end_time: last.end_time + duration,
    }
}

/// Volunteer sign-ups counted per UTC calendar day, oldest first.
pub fn registrations_per_day(volunteers: &[Volunteer]) -> Vec<DailyRegistrations> {
    let mut per_day = std::collections::BTreeMap::<NaiveDate, usize>::new();
    for volunteer in volunteers {
        *per_day.entry(volunteer.created_at.date_naive()).or_default() += 1;
    }
    per_day
        .into_iter()
        .map(|(date, count)| DailyRegistrations { date, count })
        .collect()
}

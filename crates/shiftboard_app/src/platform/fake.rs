//! In-memory volunteer API for session tests.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Map;
use shiftboard_core::{Job, Location, Shift, ShiftAssignment, ShiftSignup, Volunteer};
use shiftboard_engine::{ApiError, FailureKind, RosterApi};

#[derive(Default)]
struct Store {
    volunteers: Vec<Volunteer>,
    jobs: Vec<Job>,
    failing_shifts: Vec<String>,
    refuse_deletes: bool,
    emailed: Vec<String>,
}

#[derive(Default)]
pub struct FakeApi {
    store: Mutex<Store>,
}

fn not_found(what: &str) -> ApiError {
    ApiError::new(FailureKind::HttpStatus(404), format!("{what} not found"))
}

fn server_error() -> ApiError {
    ApiError::new(FailureKind::HttpStatus(500), "500 Internal Server Error")
}

impl FakeApi {
    pub fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 6, hour, 0, 0).unwrap()
    }

    /// Two volunteers and two jobs at one location; Ada holds one of the
    /// two places on shift `s1`, and shift `s2` has no capacity.
    pub fn seeded() -> Self {
        let launch = Location {
            id: "l1".to_string(),
            name: "Boat launch".to_string(),
            address: "Schmidt Field".to_string(),
            slug: "launch".to_string(),
        };
        let shift = |id: &str, job_id: &str, start: u32, end: u32, capacity: u32| Shift {
            id: id.to_string(),
            start_time: Self::at(start),
            end_time: Self::at(end),
            capacity,
            job_id: job_id.to_string(),
            volunteers: Vec::new(),
            job: None,
            extra: Map::new(),
        };
        let job = |id: &str, name: &str, shifts: Vec<Shift>| Job {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            location_id: launch.id.clone(),
            location: Some(launch.clone()),
            shifts,
            extra: Map::new(),
        };
        let volunteer = |id: &str, name: &str| Volunteer {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "555-0100".to_string(),
            shirt_size: "M".to_string(),
            referral: String::new(),
            created_at: Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap(),
            shifts: Vec::new(),
            waivers: Vec::new(),
            extra: Map::new(),
        };

        let api = Self::default();
        {
            let mut store = api.lock();
            store.jobs = vec![
                job("j1", "Radio", vec![shift("s1", "j1", 8, 10, 2)]),
                job("j2", "Safety boat", vec![shift("s2", "j2", 9, 12, 0)]),
            ];
            store.volunteers = vec![volunteer("v1", "Ada"), volunteer("v2", "Grace")];
            store.assign("v1", "s1", true);
        }
        api
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap()
    }

    pub fn fail_shift(&self, shift_id: &str) {
        self.lock().failing_shifts.push(shift_id.to_string());
    }

    pub fn refuse_deletes(&self) {
        self.lock().refuse_deletes = true;
    }

    pub fn volunteer(&self, id: &str) -> Option<Volunteer> {
        self.lock().volunteers.iter().find(|v| v.id == id).cloned()
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.lock().jobs.clone()
    }

    pub fn emailed(&self) -> Vec<String> {
        self.lock().emailed.clone()
    }
}

impl Store {
    fn assign(&mut self, volunteer_id: &str, shift_id: &str, selected: bool) -> bool {
        let Some(job) = self
            .jobs
            .iter_mut()
            .find(|j| j.shifts.iter().any(|s| s.id == shift_id))
        else {
            return false;
        };
        let mut bare_job = job.clone();
        bare_job.shifts.clear();
        let Some(shift) = job.shifts.iter_mut().find(|s| s.id == shift_id) else {
            return false;
        };
        let Some(volunteer) = self.volunteers.iter_mut().find(|v| v.id == volunteer_id) else {
            return false;
        };

        shift.volunteers.retain(|s| s.volunteer_id != volunteer_id);
        volunteer.shifts.retain(|a| a.shift_id != shift_id);
        if selected {
            let id = format!("{volunteer_id}-{shift_id}");
            shift.volunteers.push(ShiftSignup {
                id: id.clone(),
                volunteer_id: volunteer_id.to_string(),
                shift_id: shift_id.to_string(),
            });
            let mut embedded = shift.clone();
            embedded.job = Some(Box::new(bare_job));
            volunteer.shifts.push(ShiftAssignment {
                id,
                volunteer_id: volunteer_id.to_string(),
                shift_id: shift_id.to_string(),
                shift: embedded,
            });
        }
        true
    }
}

#[async_trait::async_trait]
impl RosterApi for FakeApi {
    async fn list_volunteers(&self) -> Result<Vec<Volunteer>, ApiError> {
        Ok(self.lock().volunteers.clone())
    }

    async fn get_volunteer(&self, id: &str) -> Result<Volunteer, ApiError> {
        self.volunteer(id).ok_or_else(|| not_found("volunteer"))
    }

    async fn update_volunteer(
        &self,
        volunteer: &Volunteer,
        send_email: bool,
    ) -> Result<Volunteer, ApiError> {
        let mut store = self.lock();
        let stored = store
            .volunteers
            .iter_mut()
            .find(|v| v.id == volunteer.id)
            .ok_or_else(|| not_found("volunteer"))?;
        *stored = volunteer.clone();
        if send_email {
            store.emailed.push(volunteer.id.clone());
        }
        Ok(volunteer.clone())
    }

    async fn delete_volunteer(&self, id: &str) -> Result<(), ApiError> {
        let mut store = self.lock();
        if store.refuse_deletes {
            return Err(server_error());
        }
        let before = store.volunteers.len();
        store.volunteers.retain(|v| v.id != id);
        if store.volunteers.len() == before {
            return Err(not_found("volunteer"));
        }
        Ok(())
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
        Ok(self.jobs())
    }

    async fn save_job(&self, job: &Job) -> Result<Job, ApiError> {
        let mut store = self.lock();
        match store.jobs.iter_mut().find(|j| j.id == job.id) {
            Some(stored) => *stored = job.clone(),
            None => store.jobs.push(job.clone()),
        }
        Ok(job.clone())
    }

    async fn delete_job(&self, id: &str) -> Result<(), ApiError> {
        let mut store = self.lock();
        if store.refuse_deletes {
            return Err(server_error());
        }
        store.jobs.retain(|j| j.id != id);
        Ok(())
    }

    async fn set_shift_assignment(
        &self,
        volunteer_id: &str,
        shift_id: &str,
        selected: bool,
    ) -> Result<(), ApiError> {
        let mut store = self.lock();
        if store.failing_shifts.iter().any(|s| s == shift_id) {
            return Err(server_error());
        }
        if !store.assign(volunteer_id, shift_id, selected) {
            return Err(not_found("shift"));
        }
        Ok(())
    }
}

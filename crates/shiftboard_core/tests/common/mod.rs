#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Map;
use shiftboard_core::{
    update, ApiCall, ApiReply, AppState, Effect, Job, Location, Msg, RequestId, Shift,
    ShiftAssignment, ShiftSignup, Volunteer,
};

pub fn init_logging() {
    shiftboard_logging::initialize_for_tests();
}

pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 8, 6, hour, 0, 0).unwrap()
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 8, 1, 12, 0, 0).unwrap()
}

pub fn volunteer(id: &str, name: &str) -> Volunteer {
    Volunteer {
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
    }
}

pub fn location(id: &str) -> Location {
    Location {
        id: id.to_string(),
        name: format!("Venue {id}"),
        address: String::new(),
        slug: String::new(),
    }
}

pub fn shift(id: &str, job_id: &str, start: u32, end: u32, capacity: u32) -> Shift {
    Shift {
        id: id.to_string(),
        start_time: at(start),
        end_time: at(end),
        capacity,
        job_id: job_id.to_string(),
        volunteers: Vec::new(),
        job: None,
        extra: Map::new(),
    }
}

pub fn job(id: &str, location_id: &str, shifts: Vec<Shift>) -> Job {
    Job {
        id: id.to_string(),
        name: format!("Job {id}"),
        description: String::new(),
        location_id: location_id.to_string(),
        location: Some(location(location_id)),
        shifts,
        extra: Map::new(),
    }
}

pub fn signup(volunteer_id: &str, shift_id: &str) -> ShiftSignup {
    ShiftSignup {
        id: format!("{volunteer_id}-{shift_id}"),
        volunteer_id: volunteer_id.to_string(),
        shift_id: shift_id.to_string(),
    }
}

/// Assigns `volunteer` to `shift` on the volunteer side, embedding `job`.
pub fn assign(volunteer: &mut Volunteer, shift: &Shift, job: &Job) {
    let mut embedded = shift.clone();
    let mut job = job.clone();
    job.shifts.clear();
    embedded.job = Some(Box::new(job));
    volunteer.shifts.push(ShiftAssignment {
        id: format!("{}-{}", volunteer.id, shift.id),
        volunteer_id: volunteer.id.clone(),
        shift_id: shift.id.clone(),
        shift: embedded,
    });
}

/// Finds the request effect whose call satisfies `matches`.
pub fn request_where(effects: &[Effect], matches: impl Fn(&ApiCall) -> bool) -> RequestId {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Request { request, call, .. } if matches(call) => Some(*request),
            _ => None,
        })
        .expect("matching request effect")
}

pub fn request_labelled(effects: &[Effect], label: &str) -> RequestId {
    request_where(effects, |call| call.label() == label)
}

pub fn complete(state: AppState, request: RequestId, reply: ApiReply) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::ApiCompleted {
            request,
            result: Ok(reply),
        },
    )
}

/// A started dashboard with both collections loaded.
pub fn loaded(volunteers: Vec<Volunteer>, jobs: Vec<Job>) -> AppState {
    let (state, effects) = update(AppState::new().with_maintainer("Jack"), Msg::Started { now: now() });
    let volunteers_request = request_labelled(&effects, "list_volunteers");
    let jobs_request = request_labelled(&effects, "list_jobs");
    let (state, _) = complete(state, volunteers_request, ApiReply::Volunteers(volunteers));
    let (mut state, _) = complete(state, jobs_request, ApiReply::Jobs(jobs));
    state.take_notices();
    state.consume_dirty();
    state
}

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::Map;
use shiftboard_core::{ApiCall, ApiReply, Job, Volunteer, ViewScope};
use shiftboard_engine::{ApiError, EngineEvent, EngineHandle, FailureKind, RosterApi};

fn init_logging() {
    shiftboard_logging::initialize_for_tests();
}

/// Answers volunteer lookups at once and stalls on everything touching jobs.
struct FakeApi;

fn volunteer(id: &str) -> Volunteer {
    Volunteer {
        id: id.to_string(),
        name: "Ada".to_string(),
        email: String::new(),
        phone: String::new(),
        shirt_size: "M".to_string(),
        referral: String::new(),
        created_at: Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap(),
        shifts: Vec::new(),
        waivers: Vec::new(),
        extra: Map::new(),
    }
}

async fn stall() {
    tokio::time::sleep(Duration::from_secs(30)).await;
}

#[async_trait::async_trait]
impl RosterApi for FakeApi {
    async fn list_volunteers(&self) -> Result<Vec<Volunteer>, ApiError> {
        Ok(vec![volunteer("v1")])
    }

    async fn get_volunteer(&self, id: &str) -> Result<Volunteer, ApiError> {
        Ok(volunteer(id))
    }

    async fn update_volunteer(
        &self,
        _volunteer: &Volunteer,
        _send_email: bool,
    ) -> Result<Volunteer, ApiError> {
        Err(ApiError::new(FailureKind::HttpStatus(500), "500 Internal Server Error"))
    }

    async fn delete_volunteer(&self, _id: &str) -> Result<(), ApiError> {
        Ok(())
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
        stall().await;
        Ok(Vec::new())
    }

    async fn save_job(&self, job: &Job) -> Result<Job, ApiError> {
        stall().await;
        Ok(job.clone())
    }

    async fn delete_job(&self, _id: &str) -> Result<(), ApiError> {
        stall().await;
        Ok(())
    }

    async fn set_shift_assignment(
        &self,
        _volunteer_id: &str,
        _shift_id: &str,
        _selected: bool,
    ) -> Result<(), ApiError> {
        Ok(())
    }
}

fn engine() -> EngineHandle {
    EngineHandle::with_api(Arc::new(FakeApi)).expect("engine starts")
}

fn next(engine: &EngineHandle) -> (u64, Result<ApiReply, ApiError>) {
    match engine.recv_timeout(Duration::from_secs(5)) {
        Some(EngineEvent::Completed { request, result }) => (request, result),
        None => panic!("no completion within timeout"),
    }
}

#[test]
fn completions_carry_their_request_id() {
    init_logging();
    let engine = engine();
    engine.execute(7, ViewScope::Roster, ApiCall::ListVolunteers);

    let (request, result) = next(&engine);

    assert_eq!(request, 7);
    assert_eq!(result, Ok(ApiReply::Volunteers(vec![volunteer("v1")])));
}

#[test]
fn failures_are_delivered_as_events() {
    init_logging();
    let engine = engine();
    engine.execute(
        1,
        ViewScope::VolunteerEditor,
        ApiCall::UpdateVolunteer {
            volunteer: Box::new(volunteer("v1")),
            send_email: false,
        },
    );

    let (_, result) = next(&engine);

    assert_eq!(result.unwrap_err().kind, FailureKind::HttpStatus(500));
}

#[test]
fn cancelling_a_scope_resolves_its_calls_as_cancelled() {
    init_logging();
    let engine = engine();
    engine.execute(1, ViewScope::JobEditor, ApiCall::DeleteJob { id: "j1".to_string() });
    engine.cancel_scope(ViewScope::JobEditor);

    let (request, result) = next(&engine);

    assert_eq!(request, 1);
    assert_eq!(result.unwrap_err().kind, FailureKind::Cancelled);
}

#[test]
fn cancelling_one_scope_leaves_others_running() {
    init_logging();
    let engine = engine();
    engine.execute(1, ViewScope::Roster, ApiCall::ListJobs);
    engine.execute(2, ViewScope::VolunteerEditor, ApiCall::GetVolunteer { id: "v1".to_string() });
    engine.cancel_scope(ViewScope::VolunteerEditor);

    // The editor call either finished before the cancel landed or was cut off;
    // the stalled roster call must still be pending.
    let (request, _) = next(&engine);
    assert_eq!(request, 2);
    assert!(engine.recv_timeout(Duration::from_millis(200)).is_none());
}

#[test]
fn reopened_scope_gets_a_fresh_token() {
    init_logging();
    let engine = engine();
    engine.cancel_scope(ViewScope::VolunteerEditor);
    engine.execute(3, ViewScope::VolunteerEditor, ApiCall::GetVolunteer { id: "v1".to_string() });

    let (request, result) = next(&engine);

    assert_eq!(request, 3);
    assert_eq!(result, Ok(ApiReply::Volunteer(Box::new(volunteer("v1")))));
}

#[test]
fn try_recv_is_empty_when_idle() {
    init_logging();
    let engine = engine();
    assert!(engine.try_recv().is_none());
}

mod common;

use common::*;
use pretty_assertions::assert_eq;
use shiftboard_core::{
    update, ApiCall, ApiFailure, ApiReply, AppState, Effect, ListView, Msg, NoticeLevel, Topic,
    ViewScope,
};

#[test]
fn start_opens_roster_and_fetches_both_collections() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::Started { now: now() });

    assert_eq!(effects.len(), 3);
    assert_eq!(effects[0], Effect::OpenScope(ViewScope::Roster));
    assert!(matches!(
        &effects[1],
        Effect::Request { scope: ViewScope::Roster, call: ApiCall::ListVolunteers, .. }
    ));
    assert!(matches!(
        &effects[2],
        Effect::Request { scope: ViewScope::Roster, call: ApiCall::ListJobs, .. }
    ));
    let view = state.view();
    assert_eq!(view.volunteers, ListView::Loading);
    assert_eq!(view.locations, ListView::Loading);
    assert_eq!(view.pending_requests, 2);
    assert!(state.consume_dirty());

    let (_state, effects) = update(state, Msg::Started { now: now() });
    assert!(effects.is_empty());
}

#[test]
fn failed_first_load_can_be_retried() {
    init_logging();
    let (state, effects) = update(
        AppState::new().with_maintainer("Jack"),
        Msg::Started { now: now() },
    );
    let volunteers_request = request_labelled(&effects, "list_volunteers");
    let jobs_request = request_labelled(&effects, "list_jobs");

    let (state, _) = update(
        state,
        Msg::ApiCompleted {
            request: volunteers_request,
            result: Err(ApiFailure::with_status(500, "Internal Server Error")),
        },
    );
    let (mut state, _) = complete(state, jobs_request, ApiReply::Jobs(Vec::new()));

    assert!(matches!(state.view().volunteers, ListView::Failed(_)));
    assert_eq!(state.view().locations, ListView::Ready(Vec::new()));
    let notices = state.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(
        notices[0].text,
        "Something went wrong fetching volunteers. Go yell at Jack."
    );

    let (state, effects) = update(state, Msg::RetryLoadClicked);
    assert_eq!(effects.len(), 1);
    let retry = request_labelled(&effects, "list_volunteers");
    assert_eq!(state.view().volunteers, ListView::Loading);

    let (state, _) = complete(state, retry, ApiReply::Volunteers(vec![volunteer("v1", "Ada")]));
    assert_eq!(state.view().volunteer_total, 1);
}

#[test]
fn refresh_failure_keeps_previous_roster() {
    init_logging();
    let state = loaded(vec![volunteer("v1", "Ada")], Vec::new());
    let (state, effects) = update(
        state,
        Msg::Notified {
            scope: ViewScope::Roster,
            topic: Topic::VolunteerUpdated,
        },
    );
    let request = request_labelled(&effects, "list_volunteers");

    let (mut state, _) = update(
        state,
        Msg::ApiCompleted {
            request,
            result: Err(ApiFailure::new("connection reset")),
        },
    );

    assert_eq!(state.view().volunteer_total, 1);
    assert_eq!(state.take_notices().len(), 1);
}

#[test]
fn superseded_fetch_is_discarded() {
    init_logging();
    let state = loaded(vec![volunteer("v1", "Ada")], Vec::new());
    let notice = Msg::Notified {
        scope: ViewScope::Roster,
        topic: Topic::VolunteerUpdated,
    };
    let (state, effects) = update(state, notice.clone());
    let first = request_labelled(&effects, "list_volunteers");
    let (state, effects) = update(state, notice);
    let second = request_labelled(&effects, "list_volunteers");
    assert_ne!(first, second);
    assert_eq!(state.in_flight_count(), 1);

    let (state, _) = complete(state, second, ApiReply::Volunteers(vec![
        volunteer("v1", "Ada"),
        volunteer("v2", "Grace"),
    ]));
    // The older response resolves last but must not win.
    let (state, effects) = complete(state, first, ApiReply::Volunteers(Vec::new()));

    assert!(effects.is_empty());
    assert_eq!(state.view().volunteer_total, 2);
    assert!(state.is_idle());
}

#[test]
fn notifications_route_to_the_matching_refetch() {
    init_logging();
    let state = loaded(Vec::new(), Vec::new());

    let (state, effects) = update(
        state,
        Msg::Notified {
            scope: ViewScope::Roster,
            topic: Topic::ShiftUpdated,
        },
    );
    request_labelled(&effects, "list_jobs");

    let (state, effects) = update(
        state,
        Msg::Notified {
            scope: ViewScope::Roster,
            topic: Topic::JobUpdated,
        },
    );
    request_labelled(&effects, "list_jobs");

    // No volunteer editor is open, so its notifications go nowhere.
    let (_state, effects) = update(
        state,
        Msg::Notified {
            scope: ViewScope::VolunteerEditor,
            topic: Topic::VolunteerUpdated,
        },
    );
    assert!(effects.is_empty());
}

#[test]
fn query_filters_rows_but_duplicates_consider_everyone() {
    init_logging();
    let state = loaded(
        vec![
            volunteer("v1", "Sam"),
            volunteer("v2", "Ada"),
            volunteer("v3", "Sam"),
        ],
        Vec::new(),
    );

    let (mut state, _) = update(state, Msg::QueryChanged("ada".to_string()));
    assert!(state.consume_dirty());
    let view = state.view();
    assert_eq!(view.volunteer_total, 3);
    let ListView::Ready(rows) = view.volunteers else {
        panic!("roster should be loaded");
    };
    assert_eq!(rows.len(), 1);
    assert!(!rows[0].duplicate);

    let (state, _) = update(state, Msg::QueryChanged("sam".to_string()));
    let ListView::Ready(rows) = state.view().volunteers else {
        panic!("roster should be loaded");
    };
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.duplicate));
}

#[test]
fn roster_view_groups_jobs_and_reports_fill() {
    init_logging();
    let mut full = shift("s1", "j1", 8, 10, 2);
    full.volunteers = vec![signup("v1", "s1")];
    let closed = shift("s2", "j2", 8, 10, 0);
    let jobs = vec![
        job("j1", "A", vec![full]),
        job("j2", "B", vec![closed]),
        job("j3", "A", Vec::new()),
    ];
    let state = loaded(Vec::new(), jobs);

    let ListView::Ready(locations) = state.view().locations else {
        panic!("jobs should be loaded");
    };
    assert_eq!(locations.len(), 2);
    assert_eq!(locations[0].name, "Venue A");
    let job_ids: Vec<&str> = locations[0].jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(job_ids, vec!["j1", "j3"]);
    assert_eq!(locations[0].jobs[0].shifts[0].fill_percent, Some(50));
    assert_eq!(locations[1].jobs[0].shifts[0].fill_percent, None);
}

#[test]
fn registrations_summarised_from_roster() {
    init_logging();
    let state = loaded(vec![volunteer("v1", "Ada"), volunteer("v2", "Sam")], Vec::new());
    let registrations = state.view().registrations;
    assert_eq!(registrations.len(), 1);
    assert_eq!(registrations[0].count, 2);
}

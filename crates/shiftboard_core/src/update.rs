use chrono::{DateTime, Utc};
use serde_json::Map;
use shiftboard_logging::{board_debug, board_warn};

use crate::draft::Draft;
use crate::model::{Job, JobId, Shift, ShiftId, Volunteer, VolunteerId};
use crate::state::{JobEditor, Loadable, NoticeLevel, Slot, VolunteerEditor};
use crate::toggle::ShiftToggle;
use crate::transform::{distinct_locations, next_shift_window};
use crate::{
    ApiCall, ApiFailure, ApiReply, AppState, Effect, JobEdit, Msg, RequestId, Topic, ViewScope,
    VolunteerEdit,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started { now } => start(&mut state, now),
        Msg::RetryLoadClicked => retry_load(&mut state),
        Msg::Tick { now } => {
            state.now = now;
            // Only the volunteer editor shows relative times.
            if state.volunteer_editor.is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::QueryChanged(query) => {
            if state.query != query {
                state.query = query;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ApiCompleted { request, result } => complete_request(&mut state, request, result),
        Msg::Notified { scope, topic } => refetch_on_notice(&mut state, scope, topic),
        Msg::VolunteerOpened { id } => open_volunteer(&mut state, id),
        Msg::VolunteerEdited(edit) => {
            edit_volunteer(&mut state, edit);
            Vec::new()
        }
        Msg::VolunteerSaveClicked { send_email } => save_volunteer(&mut state, send_email),
        Msg::VolunteerDeleteConfirmed => delete_volunteer(&mut state),
        Msg::VolunteerEditorClosed => close_volunteer_editor(&mut state),
        Msg::ShiftToggleClicked { shift_id } => toggle_shift(&mut state, shift_id),
        Msg::JobOpened { id } => open_job(&mut state, id),
        Msg::NewJobClicked { id } => new_job(&mut state, id),
        Msg::JobEdited(edit) => {
            edit_job(&mut state, edit);
            Vec::new()
        }
        Msg::JobShiftAdded { shift_id } => {
            add_job_shift(&mut state, shift_id);
            Vec::new()
        }
        Msg::JobSaveClicked => save_job(&mut state),
        Msg::JobDeleteConfirmed => delete_job(&mut state),
        Msg::JobEditorClosed => close_job_editor(&mut state),
    };

    (state, effects)
}

fn start(state: &mut AppState, now: DateTime<Utc>) -> Vec<Effect> {
    state.now = now;
    if state.roster_open {
        return Vec::new();
    }
    state.roster_open = true;
    state.volunteers = Loadable::Loading;
    state.jobs = Loadable::Loading;
    state.mark_dirty();
    vec![
        Effect::OpenScope(ViewScope::Roster),
        state.issue(ViewScope::Roster, Slot::VolunteerList, ApiCall::ListVolunteers),
        state.issue(ViewScope::Roster, Slot::JobList, ApiCall::ListJobs),
    ]
}

fn retry_load(state: &mut AppState) -> Vec<Effect> {
    if !state.roster_open {
        return Vec::new();
    }
    let mut effects = Vec::new();
    if state.volunteers.is_failed() {
        state.volunteers = Loadable::Loading;
        effects.push(state.issue(ViewScope::Roster, Slot::VolunteerList, ApiCall::ListVolunteers));
    }
    if state.jobs.is_failed() {
        state.jobs = Loadable::Loading;
        effects.push(state.issue(ViewScope::Roster, Slot::JobList, ApiCall::ListJobs));
    }
    if !effects.is_empty() {
        state.mark_dirty();
    }
    effects
}

fn refetch_on_notice(state: &mut AppState, scope: ViewScope, topic: Topic) -> Vec<Effect> {
    if !state.is_scope_open(scope) || !scope.topics().contains(&topic) {
        board_debug!("Ignoring {topic} for closed or unsubscribed scope {scope:?}");
        return Vec::new();
    }
    match (scope, topic) {
        (ViewScope::Roster, Topic::VolunteerUpdated) => {
            vec![state.issue(ViewScope::Roster, Slot::VolunteerList, ApiCall::ListVolunteers)]
        }
        (ViewScope::Roster, Topic::ShiftUpdated | Topic::JobUpdated) => {
            vec![state.issue(ViewScope::Roster, Slot::JobList, ApiCall::ListJobs)]
        }
        (ViewScope::VolunteerEditor, _) => {
            let Some(id) = state.volunteer_editor.as_ref().map(|e| e.id.clone()) else {
                return Vec::new();
            };
            vec![state.issue(
                ViewScope::VolunteerEditor,
                Slot::EditorVolunteer,
                ApiCall::GetVolunteer { id },
            )]
        }
        (ViewScope::JobEditor, _) => Vec::new(),
    }
}

fn complete_request(
    state: &mut AppState,
    request: RequestId,
    result: Result<ApiReply, ApiFailure>,
) -> Vec<Effect> {
    let Some(slot) = state.complete(request) else {
        board_debug!("Discarding response to request {request}: superseded or view closed");
        return Vec::new();
    };
    if let Err(failure) = &result {
        board_warn!("Request {request} for {slot:?} failed: {failure}");
    }
    state.mark_dirty();

    match slot {
        Slot::VolunteerList => {
            match result.and_then(into_volunteers) {
                Ok(volunteers) => state.volunteers = Loadable::Loaded(volunteers),
                Err(failure) => {
                    if state.volunteers.loaded().is_none() {
                        state.volunteers = Loadable::Failed(failure.to_string());
                    }
                    state.notify_failure("fetching volunteers");
                }
            }
            Vec::new()
        }
        Slot::JobList => {
            match result.and_then(into_jobs) {
                Ok(jobs) => state.jobs = Loadable::Loaded(jobs),
                Err(failure) => {
                    if state.jobs.loaded().is_none() {
                        state.jobs = Loadable::Failed(failure.to_string());
                    }
                    state.notify_failure("fetching jobs");
                }
            }
            Vec::new()
        }
        Slot::EditorVolunteer => {
            match result.and_then(into_volunteer) {
                Ok(fresh) => adopt_fetched_volunteer(state, fresh),
                Err(_) => state.notify_failure("fetching the volunteer"),
            }
            Vec::new()
        }
        Slot::VolunteerSave => {
            let saved = result.and_then(into_volunteer);
            let Some(editor) = state.volunteer_editor.as_mut() else {
                return Vec::new();
            };
            editor.working = false;
            match saved {
                Ok(volunteer) => {
                    match editor.record.as_mut() {
                        Some(record) => record.commit(volunteer),
                        None => editor.record = Some(Draft::new(volunteer)),
                    }
                    editor.sync_toggles();
                    state.notify(NoticeLevel::Success, "Saved!");
                    vec![Effect::Publish(Topic::VolunteerUpdated)]
                }
                Err(_) => {
                    state.notify_failure("saving the volunteer");
                    Vec::new()
                }
            }
        }
        Slot::VolunteerDelete => match result {
            Ok(_) => {
                state.notify(NoticeLevel::Success, "Deleted!");
                let mut effects = close_volunteer_editor(state);
                effects.push(Effect::Publish(Topic::VolunteerUpdated));
                effects
            }
            Err(_) => {
                if let Some(editor) = state.volunteer_editor.as_mut() {
                    editor.working = false;
                }
                state.notify_failure("deleting the volunteer");
                Vec::new()
            }
        },
        Slot::ShiftToggle(shift_id) => {
            let Some(toggle) = state
                .volunteer_editor
                .as_mut()
                .and_then(|editor| editor.toggles.get_mut(&shift_id))
            else {
                return Vec::new();
            };
            match result {
                Ok(_) => {
                    toggle.commit();
                    state.notify(NoticeLevel::Success, "Shift updated!");
                    vec![
                        Effect::Publish(Topic::VolunteerUpdated),
                        Effect::Publish(Topic::ShiftUpdated),
                    ]
                }
                Err(_) => {
                    toggle.roll_back();
                    state.notify_failure("updating the shift");
                    Vec::new()
                }
            }
        }
        Slot::JobSave => match result {
            Ok(_) => {
                state.notify(NoticeLevel::Success, "Job saved");
                let mut effects = close_job_editor(state);
                effects.push(Effect::Publish(Topic::JobUpdated));
                effects
            }
            Err(_) => {
                if let Some(editor) = state.job_editor.as_mut() {
                    editor.working = false;
                }
                state.notify_failure("saving the job");
                Vec::new()
            }
        },
        Slot::JobDelete => match result {
            Ok(_) => {
                state.notify(NoticeLevel::Success, "Deleted!");
                let mut effects = close_job_editor(state);
                effects.push(Effect::Publish(Topic::JobUpdated));
                effects
            }
            Err(_) => {
                if let Some(editor) = state.job_editor.as_mut() {
                    editor.working = false;
                }
                state.notify_failure("deleting the job");
                Vec::new()
            }
        },
    }
}

fn adopt_fetched_volunteer(state: &mut AppState, fresh: Volunteer) {
    let Some(editor) = state.volunteer_editor.as_mut() else {
        return;
    };
    if editor.id != fresh.id {
        board_warn!("Fetched volunteer {} while editing {}", fresh.id, editor.id);
        return;
    }
    match editor.record.as_mut() {
        // Field edits survive a refetch; assignments always follow the server.
        Some(record) => record.rebase(fresh, |current, fresh| {
            current.shifts = fresh.shifts.clone();
        }),
        None => editor.record = Some(Draft::new(fresh)),
    }
    editor.sync_toggles();
}

fn open_volunteer(state: &mut AppState, id: VolunteerId) -> Vec<Effect> {
    let mut effects = Vec::new();
    let already_open = state
        .volunteer_editor
        .as_ref()
        .is_some_and(|editor| editor.id == id);
    if !already_open {
        effects.extend(close_volunteer_editor(state));
        let record = state
            .volunteers()
            .and_then(|all| all.iter().find(|v| v.id == id))
            .cloned()
            .map(Draft::new);
        state.volunteer_editor = Some(VolunteerEditor {
            id: id.clone(),
            record,
            toggles: Default::default(),
            working: false,
        });
        effects.push(Effect::OpenScope(ViewScope::VolunteerEditor));
    }
    effects.push(state.issue(
        ViewScope::VolunteerEditor,
        Slot::EditorVolunteer,
        ApiCall::GetVolunteer { id },
    ));
    state.mark_dirty();
    effects
}

fn edit_volunteer(state: &mut AppState, edit: VolunteerEdit) {
    let Some(record) = state
        .volunteer_editor
        .as_mut()
        .and_then(|editor| editor.record.as_mut())
    else {
        board_warn!("Volunteer edit without a loaded volunteer: {edit:?}");
        return;
    };
    let volunteer = record.current_mut();
    match edit {
        VolunteerEdit::Name(value) => volunteer.name = value,
        VolunteerEdit::Email(value) => volunteer.email = value,
        VolunteerEdit::Phone(value) => volunteer.phone = value,
        VolunteerEdit::ShirtSize(value) => volunteer.shirt_size = value,
        VolunteerEdit::Referral(value) => volunteer.referral = value,
        VolunteerEdit::EmergencyContactName(value) => {
            volunteer.waiver_mut().emergency_contact_name = Some(value)
        }
        VolunteerEdit::EmergencyContactPhone(value) => {
            volunteer.waiver_mut().emergency_contact_phone = Some(value)
        }
        VolunteerEdit::EmergencyContactEmail(value) => {
            volunteer.waiver_mut().emergency_contact_email = Some(value)
        }
    }
    state.mark_dirty();
}

fn save_volunteer(state: &mut AppState, send_email: bool) -> Vec<Effect> {
    let Some(editor) = state.volunteer_editor.as_mut() else {
        return Vec::new();
    };
    if editor.working {
        return Vec::new();
    }
    let Some(record) = editor.record.as_ref() else {
        return Vec::new();
    };
    let volunteer = Box::new(record.current().clone());
    editor.working = true;
    state.mark_dirty();
    vec![state.issue(
        ViewScope::VolunteerEditor,
        Slot::VolunteerSave,
        ApiCall::UpdateVolunteer {
            volunteer,
            send_email,
        },
    )]
}

fn delete_volunteer(state: &mut AppState) -> Vec<Effect> {
    let Some(editor) = state.volunteer_editor.as_mut() else {
        return Vec::new();
    };
    if editor.working {
        return Vec::new();
    }
    editor.working = true;
    let id = editor.id.clone();
    state.mark_dirty();
    vec![state.issue(
        ViewScope::VolunteerEditor,
        Slot::VolunteerDelete,
        ApiCall::DeleteVolunteer { id },
    )]
}

fn close_volunteer_editor(state: &mut AppState) -> Vec<Effect> {
    if state.volunteer_editor.take().is_none() {
        return Vec::new();
    }
    state.forget_scope(ViewScope::VolunteerEditor);
    state.mark_dirty();
    vec![Effect::CloseScope(ViewScope::VolunteerEditor)]
}

fn toggle_shift(state: &mut AppState, shift_id: ShiftId) -> Vec<Effect> {
    let known_shift = state
        .jobs()
        .is_some_and(|jobs| jobs.iter().flat_map(|j| &j.shifts).any(|s| s.id == shift_id));
    if !known_shift {
        board_warn!("Toggle for unknown shift {shift_id}");
        return Vec::new();
    }
    let Some(editor) = state.volunteer_editor.as_mut() else {
        return Vec::new();
    };
    let Some(record) = editor.record.as_ref() else {
        return Vec::new();
    };
    let assigned = record.saved().is_assigned_to(&shift_id);
    let toggle = editor
        .toggles
        .entry(shift_id.clone())
        .or_insert_with(|| ShiftToggle::new(assigned));
    let Some(selected) = toggle.begin() else {
        return Vec::new();
    };
    let volunteer_id = editor.id.clone();
    state.notify(NoticeLevel::Info, "Updating shift...");
    vec![state.issue(
        ViewScope::VolunteerEditor,
        Slot::ShiftToggle(shift_id.clone()),
        ApiCall::SetShiftAssignment {
            volunteer_id,
            shift_id,
            selected,
        },
    )]
}

fn open_job(state: &mut AppState, id: JobId) -> Vec<Effect> {
    let Some(mut job) = state
        .jobs()
        .and_then(|jobs| jobs.iter().find(|j| j.id == id))
        .cloned()
    else {
        state.notify_failure("opening the job");
        return Vec::new();
    };
    job.shifts.sort_by_key(|s| s.start_time);
    open_job_editor(state, job, false)
}

fn new_job(state: &mut AppState, id: JobId) -> Vec<Effect> {
    let job = Job {
        id,
        name: String::new(),
        description: String::new(),
        location_id: String::new(),
        location: None,
        shifts: Vec::new(),
        extra: Map::new(),
    };
    open_job_editor(state, job, true)
}

fn open_job_editor(state: &mut AppState, job: Job, is_new: bool) -> Vec<Effect> {
    let mut effects = close_job_editor(state);
    state.job_editor = Some(JobEditor {
        draft: Draft::new(job),
        is_new,
        working: false,
    });
    state.mark_dirty();
    effects.push(Effect::OpenScope(ViewScope::JobEditor));
    effects
}

fn edit_job(state: &mut AppState, edit: JobEdit) {
    let locations = state.jobs().map(distinct_locations).unwrap_or_default();
    let Some(editor) = state.job_editor.as_mut() else {
        board_warn!("Job edit without an open job: {edit:?}");
        return;
    };
    let job = editor.draft.current_mut();
    match edit {
        JobEdit::Name(value) => job.name = value,
        JobEdit::Description(value) => job.description = value,
        JobEdit::Location(location_id) => {
            let Some(location) = locations.into_iter().find(|l| l.id == location_id) else {
                board_warn!("Unknown location {location_id}");
                return;
            };
            job.location_id = location.id.clone();
            job.location = Some(location);
        }
        JobEdit::ShiftStart { shift_id, time } => {
            if let Some(shift) = job.shifts.iter_mut().find(|s| s.id == shift_id) {
                shift.start_time = time;
            }
        }
        JobEdit::ShiftEnd { shift_id, time } => {
            if let Some(shift) = job.shifts.iter_mut().find(|s| s.id == shift_id) {
                shift.end_time = time;
            }
        }
        JobEdit::ShiftCapacity { shift_id, capacity } => {
            if let Some(shift) = job.shifts.iter_mut().find(|s| s.id == shift_id) {
                shift.capacity = capacity;
            }
        }
        JobEdit::ShiftRemoved { shift_id } => job.shifts.retain(|s| s.id != shift_id),
    }
    state.mark_dirty();
}

fn add_job_shift(state: &mut AppState, shift_id: ShiftId) {
    let now = state.now;
    let Some(editor) = state.job_editor.as_mut() else {
        return;
    };
    let job = editor.draft.current_mut();
    let window = next_shift_window(&job.shifts, now);
    job.shifts.push(Shift {
        id: shift_id,
        start_time: window.start_time,
        end_time: window.end_time,
        capacity: 1,
        job_id: job.id.clone(),
        volunteers: Vec::new(),
        job: None,
        extra: Map::new(),
    });
    state.mark_dirty();
}

fn save_job(state: &mut AppState) -> Vec<Effect> {
    let Some(editor) = state.job_editor.as_mut() else {
        return Vec::new();
    };
    if editor.working {
        return Vec::new();
    }
    let job = editor.draft.current();
    let problem = if job.name.trim().is_empty() {
        Some("A job needs a name")
    } else if job.location_id.is_empty() {
        Some("Select a location")
    } else if job.shifts.iter().any(|s| s.end_time < s.start_time) {
        Some("A shift ends before it starts")
    } else {
        None
    };
    if let Some(problem) = problem {
        state.notify(NoticeLevel::Error, problem);
        return Vec::new();
    }
    let job = Box::new(job.clone());
    editor.working = true;
    state.mark_dirty();
    vec![state.issue(ViewScope::JobEditor, Slot::JobSave, ApiCall::SaveJob { job })]
}

fn delete_job(state: &mut AppState) -> Vec<Effect> {
    let Some(editor) = state.job_editor.as_mut() else {
        return Vec::new();
    };
    if editor.is_new {
        // Never saved, nothing to delete server-side.
        return close_job_editor(state);
    }
    if editor.working {
        return Vec::new();
    }
    editor.working = true;
    let id = editor.draft.saved().id.clone();
    state.mark_dirty();
    vec![state.issue(ViewScope::JobEditor, Slot::JobDelete, ApiCall::DeleteJob { id })]
}

fn close_job_editor(state: &mut AppState) -> Vec<Effect> {
    if state.job_editor.take().is_none() {
        return Vec::new();
    }
    state.forget_scope(ViewScope::JobEditor);
    state.mark_dirty();
    vec![Effect::CloseScope(ViewScope::JobEditor)]
}

fn into_volunteers(reply: ApiReply) -> Result<Vec<Volunteer>, ApiFailure> {
    match reply {
        ApiReply::Volunteers(volunteers) => Ok(volunteers),
        other => Err(unexpected(&other)),
    }
}

fn into_volunteer(reply: ApiReply) -> Result<Volunteer, ApiFailure> {
    match reply {
        ApiReply::Volunteer(volunteer) => Ok(*volunteer),
        other => Err(unexpected(&other)),
    }
}

fn into_jobs(reply: ApiReply) -> Result<Vec<Job>, ApiFailure> {
    match reply {
        ApiReply::Jobs(jobs) => Ok(jobs),
        other => Err(unexpected(&other)),
    }
}

fn unexpected(reply: &ApiReply) -> ApiFailure {
    let kind = match reply {
        ApiReply::Volunteers(_) => "volunteer list",
        ApiReply::Volunteer(_) => "volunteer",
        ApiReply::Jobs(_) => "job list",
        ApiReply::Job(_) => "job",
        ApiReply::Done => "empty",
    };
    ApiFailure::new(format!("unexpected {kind} reply"))
}

use chrono::{DateTime, Utc};

use crate::model::{Job, Location, Volunteer, WaiverType};
use crate::relative_time::from_now;
use crate::state::{JobEditor, Loadable, VolunteerEditor};
use crate::toggle::TogglePhase;
use crate::transform::{
    distinct_locations, fill_ratio, filter_volunteers, group_assignments_by_job, is_duplicate,
    organize_jobs_by_location, registrations_per_day, DailyRegistrations, JobShifts,
};
use crate::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListView<T> {
    #[default]
    Loading,
    Ready(Vec<T>),
    /// Load failed; the renderer should offer a retry.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub volunteers: ListView<VolunteerRowView>,
    /// Size of the full roster, regardless of the search query.
    pub volunteer_total: usize,
    pub query: String,
    pub locations: ListView<LocationView>,
    pub registrations: Vec<DailyRegistrations>,
    pub volunteer_editor: Option<VolunteerEditorView>,
    pub job_editor: Option<JobEditorView>,
    pub pending_requests: usize,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerRowView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub shirt_size: String,
    pub waiver_signed: bool,
    /// Another volunteer carries exactly the same name.
    pub duplicate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationView {
    pub id: String,
    pub name: String,
    pub jobs: Vec<JobRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub shifts: Vec<ShiftRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftRowView {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub capacity: u32,
    pub assigned: usize,
    /// `None` for zero-capacity shifts, shown as "N/A".
    pub fill_percent: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerEditorView {
    pub id: String,
    /// `None` while the volunteer is still being fetched.
    pub record: Option<VolunteerDraftView>,
    pub picker: Vec<PickerLocationView>,
    pub working: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerDraftView {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub shirt_size: String,
    pub referral: String,
    pub created_at: DateTime<Utc>,
    pub registered: String,
    pub waiver_signed: bool,
    pub waiver_type: Option<WaiverType>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_email: Option<String>,
    pub assignments: Vec<JobShifts>,
    pub modified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerLocationView {
    pub id: String,
    pub name: String,
    pub jobs: Vec<PickerJobView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerJobView {
    pub id: String,
    pub name: String,
    pub shifts: Vec<PickerShiftView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerShiftView {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub selected: bool,
    pub pending: bool,
    pub rolled_back: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobEditorView {
    pub id: String,
    pub is_new: bool,
    pub name: String,
    pub description: String,
    pub location_id: String,
    pub location_name: String,
    /// Venues offered by the picker.
    pub locations: Vec<Location>,
    pub shifts: Vec<JobShiftView>,
    pub working: bool,
    pub modified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobShiftView {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub hours: i64,
    pub capacity: u32,
}

pub(crate) fn build(state: &AppState, dirty: bool) -> AppViewModel {
    let jobs = state.jobs().unwrap_or_default();
    AppViewModel {
        volunteers: list_view(&state.volunteers, |all| volunteer_rows(all, &state.query)),
        volunteer_total: state.volunteers().map_or(0, <[Volunteer]>::len),
        query: state.query.clone(),
        locations: list_view(&state.jobs, location_views),
        registrations: state
            .volunteers()
            .map(registrations_per_day)
            .unwrap_or_default(),
        volunteer_editor: state
            .volunteer_editor
            .as_ref()
            .map(|editor| volunteer_editor_view(editor, jobs, state.now)),
        job_editor: state
            .job_editor
            .as_ref()
            .map(|editor| job_editor_view(editor, jobs)),
        pending_requests: state.in_flight_count(),
        dirty,
    }
}

fn list_view<S, T>(source: &Loadable<Vec<S>>, rows: impl FnOnce(&[S]) -> Vec<T>) -> ListView<T> {
    match source {
        Loadable::Loading => ListView::Loading,
        Loadable::Loaded(items) => ListView::Ready(rows(items)),
        Loadable::Failed(message) => ListView::Failed(message.clone()),
    }
}

fn volunteer_rows(all: &[Volunteer], query: &str) -> Vec<VolunteerRowView> {
    filter_volunteers(all, query)
        .into_iter()
        .map(|v| VolunteerRowView {
            id: v.id.clone(),
            name: v.name.clone(),
            email: v.email.clone(),
            phone: v.phone.clone(),
            shirt_size: v.shirt_size.clone(),
            waiver_signed: v.waiver().is_some_and(|w| w.signed),
            duplicate: is_duplicate(&v.name, all),
        })
        .collect()
}

fn location_views(jobs: &[Job]) -> Vec<LocationView> {
    organize_jobs_by_location(jobs)
        .into_iter()
        .map(|group| LocationView {
            id: group.id.to_string(),
            name: group.name.to_string(),
            jobs: group
                .jobs
                .into_iter()
                .map(|job| JobRowView {
                    id: job.id.clone(),
                    name: job.name.clone(),
                    description: job.description.clone(),
                    shifts: job
                        .shifts
                        .iter()
                        .map(|shift| ShiftRowView {
                            id: shift.id.clone(),
                            start_time: shift.start_time,
                            end_time: shift.end_time,
                            capacity: shift.capacity,
                            assigned: shift.assigned_count(),
                            fill_percent: fill_ratio(shift.assigned_count(), shift.capacity),
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect()
}

fn volunteer_editor_view(
    editor: &VolunteerEditor,
    jobs: &[Job],
    now: DateTime<Utc>,
) -> VolunteerEditorView {
    let record = editor.record.as_ref().map(|record| {
        let v = record.current();
        let waiver = v.waiver();
        VolunteerDraftView {
            name: v.name.clone(),
            email: v.email.clone(),
            phone: v.phone.clone(),
            shirt_size: v.shirt_size.clone(),
            referral: v.referral.clone(),
            created_at: v.created_at,
            registered: from_now(v.created_at, now),
            waiver_signed: waiver.is_some_and(|w| w.signed),
            waiver_type: waiver.and_then(|w| w.waiver_type),
            emergency_contact_name: waiver.and_then(|w| w.emergency_contact_name.clone()),
            emergency_contact_phone: waiver.and_then(|w| w.emergency_contact_phone.clone()),
            emergency_contact_email: waiver.and_then(|w| w.emergency_contact_email.clone()),
            assignments: group_assignments_by_job(&v.shifts),
            modified: record.is_modified(),
        }
    });

    let picker = if editor.record.is_some() {
        organize_jobs_by_location(jobs)
            .into_iter()
            .map(|group| PickerLocationView {
                id: group.id.to_string(),
                name: group.name.to_string(),
                jobs: group
                    .jobs
                    .into_iter()
                    .map(|job| PickerJobView {
                        id: job.id.clone(),
                        name: job.name.clone(),
                        shifts: job
                            .shifts
                            .iter()
                            .map(|shift| {
                                let phase = editor.toggles.get(&shift.id).map(|t| t.phase());
                                PickerShiftView {
                                    id: shift.id.clone(),
                                    start_time: shift.start_time,
                                    end_time: shift.end_time,
                                    selected: editor.is_selected(&shift.id),
                                    pending: matches!(phase, Some(TogglePhase::Pending { .. })),
                                    rolled_back: phase == Some(TogglePhase::RolledBack),
                                }
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect()
    } else {
        Vec::new()
    };

    VolunteerEditorView {
        id: editor.id.clone(),
        record,
        picker,
        working: editor.working,
    }
}

fn job_editor_view(editor: &JobEditor, jobs: &[Job]) -> JobEditorView {
    let job = editor.draft.current();
    JobEditorView {
        id: job.id.clone(),
        is_new: editor.is_new,
        name: job.name.clone(),
        description: job.description.clone(),
        location_id: job.location_id.clone(),
        location_name: job.location_name().to_string(),
        locations: distinct_locations(jobs),
        shifts: job
            .shifts
            .iter()
            .map(|shift| JobShiftView {
                id: shift.id.clone(),
                start_time: shift.start_time,
                end_time: shift.end_time,
                hours: shift.duration_hours(),
                capacity: shift.capacity,
            })
            .collect(),
        working: editor.working,
        modified: editor.draft.is_modified(),
    }
}

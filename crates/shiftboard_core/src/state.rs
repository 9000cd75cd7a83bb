use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::draft::Draft;
use crate::model::{Job, ShiftId, Volunteer, VolunteerId};
use crate::toggle::ShiftToggle;
use crate::view_model::{self, AppViewModel};
use crate::{ApiCall, Effect, RequestId, ViewScope};

const DEFAULT_MAINTAINER: &str = "the maintainer";

/// A collection fetched from the API.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Loadable<T> {
    #[default]
    Loading,
    Loaded(T),
    /// The first load failed; nothing to show until a retry succeeds.
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Loadable::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Loadable::Failed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A transient user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// What a pending request will update when it completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Slot {
    VolunteerList,
    JobList,
    EditorVolunteer,
    VolunteerSave,
    VolunteerDelete,
    ShiftToggle(ShiftId),
    JobSave,
    JobDelete,
}

impl Slot {
    /// Fetch slots hold at most one request; a newer one supersedes.
    fn is_refetch(&self) -> bool {
        matches!(self, Slot::VolunteerList | Slot::JobList | Slot::EditorVolunteer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InFlight {
    pub(crate) scope: ViewScope,
    pub(crate) slot: Slot,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct VolunteerEditor {
    pub(crate) id: VolunteerId,
    /// `None` until the volunteer has been fetched.
    pub(crate) record: Option<Draft<Volunteer>>,
    pub(crate) toggles: BTreeMap<ShiftId, ShiftToggle>,
    pub(crate) working: bool,
}

impl VolunteerEditor {
    /// Visible selection for `shift_id`, falling back to the server copy.
    pub(crate) fn is_selected(&self, shift_id: &str) -> bool {
        match self.toggles.get(shift_id) {
            Some(toggle) => toggle.selected(),
            None => self
                .record
                .as_ref()
                .is_some_and(|r| r.saved().is_assigned_to(shift_id)),
        }
    }

    pub(crate) fn sync_toggles(&mut self) {
        let Some(record) = &self.record else {
            return;
        };
        for (shift_id, toggle) in self.toggles.iter_mut() {
            toggle.sync(record.saved().is_assigned_to(shift_id));
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct JobEditor {
    pub(crate) draft: Draft<Job>,
    pub(crate) is_new: bool,
    pub(crate) working: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub(crate) maintainer: String,
    pub(crate) now: DateTime<Utc>,
    pub(crate) next_request: RequestId,
    pub(crate) in_flight: BTreeMap<RequestId, InFlight>,
    pub(crate) roster_open: bool,
    pub(crate) volunteers: Loadable<Vec<Volunteer>>,
    pub(crate) jobs: Loadable<Vec<Job>>,
    pub(crate) query: String,
    pub(crate) volunteer_editor: Option<VolunteerEditor>,
    pub(crate) job_editor: Option<JobEditor>,
    pub(crate) notices: Vec<Notice>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default().with_maintainer(DEFAULT_MAINTAINER)
    }

    /// Name shown in error notices ("Go yell at ...").
    pub fn with_maintainer(mut self, maintainer: impl Into<String>) -> Self {
        self.maintainer = maintainer.into();
        self
    }

    pub fn view(&self) -> AppViewModel {
        view_model::build(self, self.dirty)
    }

    /// Returns whether the view changed since the last call, and resets it.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Drains queued notices for display.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// True when no request is awaiting completion.
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    pub fn volunteers(&self) -> Option<&[Volunteer]> {
        self.volunteers.loaded().map(Vec::as_slice)
    }

    pub fn jobs(&self) -> Option<&[Job]> {
        self.jobs.loaded().map(Vec::as_slice)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_scope_open(&self, scope: ViewScope) -> bool {
        match scope {
            ViewScope::Roster => self.roster_open,
            ViewScope::VolunteerEditor => self.volunteer_editor.is_some(),
            ViewScope::JobEditor => self.job_editor.is_some(),
        }
    }

    /// Registers a request and returns the effect that issues it. A refetch
    /// supersedes any earlier request for the same slot.
    pub(crate) fn issue(&mut self, scope: ViewScope, slot: Slot, call: ApiCall) -> Effect {
        if slot.is_refetch() {
            self.in_flight.retain(|_, pending| pending.slot != slot);
        }
        self.next_request += 1;
        let request = self.next_request;
        self.in_flight.insert(request, InFlight { scope, slot });
        Effect::Request {
            request,
            scope,
            call,
        }
    }

    /// Claims a completed request. `None` means it was superseded or its view
    /// is gone, and the response must be ignored.
    pub(crate) fn complete(&mut self, request: RequestId) -> Option<Slot> {
        self.in_flight.remove(&request).map(|pending| pending.slot)
    }

    pub(crate) fn forget_scope(&mut self, scope: ViewScope) {
        self.in_flight.retain(|_, pending| pending.scope != scope);
    }

    pub(crate) fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notices.push(Notice {
            level,
            text: text.into(),
        });
        self.dirty = true;
    }

    /// Queues the standard failure notice, e.g. "Something went wrong saving
    /// the job. Go yell at Jack."
    pub(crate) fn notify_failure(&mut self, context: &str) {
        let text = format!(
            "Something went wrong {context}. Go yell at {}.",
            self.maintainer
        );
        self.notify(NoticeLevel::Error, text);
    }
}

use std::fmt;

use crate::model::{Job, JobId, ShiftId, Volunteer, VolunteerId};

/// Identifies one issued request so its completion can be matched, or
/// discarded once superseded.
pub type RequestId = u64;

/// One call against the volunteer API.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    ListVolunteers,
    GetVolunteer {
        id: VolunteerId,
    },
    UpdateVolunteer {
        volunteer: Box<Volunteer>,
        send_email: bool,
    },
    DeleteVolunteer {
        id: VolunteerId,
    },
    ListJobs,
    /// Creates the job, or replaces it when the id already exists.
    SaveJob {
        job: Box<Job>,
    },
    DeleteJob {
        id: JobId,
    },
    SetShiftAssignment {
        volunteer_id: VolunteerId,
        shift_id: ShiftId,
        selected: bool,
    },
}

impl ApiCall {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            ApiCall::ListVolunteers => "list_volunteers",
            ApiCall::GetVolunteer { .. } => "get_volunteer",
            ApiCall::UpdateVolunteer { .. } => "update_volunteer",
            ApiCall::DeleteVolunteer { .. } => "delete_volunteer",
            ApiCall::ListJobs => "list_jobs",
            ApiCall::SaveJob { .. } => "save_job",
            ApiCall::DeleteJob { .. } => "delete_job",
            ApiCall::SetShiftAssignment { .. } => "set_shift_assignment",
        }
    }
}

/// Successful response payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiReply {
    Volunteers(Vec<Volunteer>),
    Volunteer(Box<Volunteer>),
    Jobs(Vec<Job>),
    Job(Box<Job>),
    /// Status-only responses (deletes, shift toggles).
    Done,
}

/// A failed call as the state machine sees it: a message for the log and the
/// HTTP status when there was one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub status: Option<u16>,
    pub message: String,
}

impl ApiFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status {status})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

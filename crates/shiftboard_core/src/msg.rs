use chrono::{DateTime, Utc};

use crate::{ApiFailure, ApiReply, JobId, LocationId, RequestId, ShiftId, Topic, ViewScope, VolunteerId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The dashboard mounted; load the roster.
    Started { now: DateTime<Utc> },
    /// User asked to retry a failed initial load.
    RetryLoadClicked,
    /// Clock tick for relative-time labels.
    Tick { now: DateTime<Utc> },
    /// User edited the volunteer search box.
    QueryChanged(String),
    /// The engine finished a request.
    ApiCompleted {
        request: RequestId,
        result: Result<ApiReply, ApiFailure>,
    },
    /// A bus topic fired for a view that subscribed to it.
    Notified { scope: ViewScope, topic: Topic },

    VolunteerOpened { id: VolunteerId },
    VolunteerEdited(VolunteerEdit),
    VolunteerSaveClicked { send_email: bool },
    /// Deletion is destructive; the caller confirms before sending this.
    VolunteerDeleteConfirmed,
    VolunteerEditorClosed,
    /// User clicked a shift in the volunteer's shift picker.
    ShiftToggleClicked { shift_id: ShiftId },

    JobOpened { id: JobId },
    /// Start a blank job; the caller supplies a fresh id.
    NewJobClicked { id: JobId },
    JobEdited(JobEdit),
    /// Append a shift after the job's latest one; the caller supplies the id.
    JobShiftAdded { shift_id: ShiftId },
    JobSaveClicked,
    JobDeleteConfirmed,
    JobEditorClosed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolunteerEdit {
    Name(String),
    Email(String),
    Phone(String),
    ShirtSize(String),
    Referral(String),
    EmergencyContactName(String),
    EmergencyContactPhone(String),
    EmergencyContactEmail(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEdit {
    Name(String),
    Description(String),
    Location(LocationId),
    ShiftStart { shift_id: ShiftId, time: DateTime<Utc> },
    ShiftEnd { shift_id: ShiftId, time: DateTime<Utc> },
    ShiftCapacity { shift_id: ShiftId, capacity: u32 },
    ShiftRemoved { shift_id: ShiftId },
}

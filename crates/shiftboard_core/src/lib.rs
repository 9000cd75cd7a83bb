//! Shiftboard core: entities, view-model transforms and the pure state
//! machine behind the volunteer dashboard.
mod api;
mod bus;
mod draft;
mod effect;
mod model;
mod msg;
mod relative_time;
mod state;
mod toggle;
mod transform;
mod update;
mod view_model;

pub use api::{ApiCall, ApiFailure, ApiReply, RequestId};
pub use bus::{EventBus, Notifier, Subscription, Topic};
pub use draft::Draft;
pub use effect::{Effect, ViewScope};
pub use model::{
    Job, JobId, Location, LocationId, Shift, ShiftAssignment, ShiftId, ShiftSignup, Volunteer,
    VolunteerId, Waiver, WaiverType, SHIRT_SIZES,
};
pub use msg::{JobEdit, Msg, VolunteerEdit};
pub use relative_time::from_now;
pub use state::{AppState, Loadable, Notice, NoticeLevel};
pub use toggle::{ShiftToggle, TogglePhase};
pub use transform::{
    distinct_locations, fill_ratio, filter_volunteers, group_assignments_by_job, is_duplicate,
    next_shift_window, organize_jobs_by_location, registrations_per_day, DailyRegistrations,
    JobShifts, LocationGroup, ShiftWindow,
};
pub use update::update;
pub use view_model::{
    AppViewModel, JobEditorView, JobRowView, JobShiftView, ListView, LocationView,
    PickerJobView, PickerLocationView, PickerShiftView, ShiftRowView, VolunteerDraftView,
    VolunteerEditorView, VolunteerRowView,
};

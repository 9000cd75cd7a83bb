//! Entities as served by the volunteer API.
//!
//! Every record keeps the fields it does not model in `extra`, so a draft
//! edited locally can be submitted back as a full document without losing
//! server-side fields such as `updatedAt` or the minor waiver columns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub type VolunteerId = String;
pub type JobId = String;
pub type ShiftId = String;
pub type LocationId = String;

/// Nullable text columns arrive as `null`; they are edited as plain text.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Shirt sizes offered by the volunteer editor.
pub const SHIRT_SIZES: &[&str] = &["XS", "S", "M", "L", "XL", "XXL", "XXXL"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    pub id: VolunteerId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub shirt_size: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub referral: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub shifts: Vec<ShiftAssignment>,
    #[serde(rename = "Waiver", default)]
    pub waivers: Vec<Waiver>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Volunteer {
    /// The volunteer's waiver, if one was signed.
    pub fn waiver(&self) -> Option<&Waiver> {
        self.waivers.first()
    }

    /// Mutable access to the waiver, creating an empty one on first edit.
    pub fn waiver_mut(&mut self) -> &mut Waiver {
        if self.waivers.is_empty() {
            self.waivers.push(Waiver::default());
        }
        &mut self.waivers[0]
    }

    pub fn is_assigned_to(&self, shift_id: &str) -> bool {
        self.shifts.iter().any(|a| a.shift_id == shift_id)
    }
}

/// A volunteer's sign-up for one shift, as seen from the volunteer side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftAssignment {
    pub id: String,
    pub volunteer_id: VolunteerId,
    pub shift_id: ShiftId,
    pub shift: Shift,
}

/// A sign-up as listed under a shift; carries only the ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftSignup {
    pub id: String,
    pub volunteer_id: VolunteerId,
    pub shift_id: ShiftId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub location_id: LocationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default)]
    pub shifts: Vec<Shift>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Job {
    pub fn location_name(&self) -> &str {
        self.location.as_ref().map(|l| l.name.as_str()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: ShiftId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub capacity: u32,
    #[serde(default)]
    pub job_id: JobId,
    #[serde(default)]
    pub volunteers: Vec<ShiftSignup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<Box<Job>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Shift {
    pub fn assigned_count(&self) -> usize {
        self.volunteers.len()
    }

    /// Whole hours between start and end, truncated.
    pub fn duration_hours(&self) -> i64 {
        (self.end_time - self.start_time).num_hours()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub slug: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WaiverType {
    Adult,
    Minor,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waiver {
    #[serde(default)]
    pub signed: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub waiver_type: Option<WaiverType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact_email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

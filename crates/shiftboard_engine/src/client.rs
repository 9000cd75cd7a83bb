use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use shiftboard_core::{ApiCall, ApiReply, Job, Volunteer};
use shiftboard_logging::{board_debug, board_trace};
use url::Url;

use crate::{ApiError, FailureKind};

pub const DEFAULT_BASE_URL: &str = "https://volunteer.jackcrane.rocks";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The volunteer API, one method per endpoint.
#[async_trait::async_trait]
pub trait RosterApi: Send + Sync {
    async fn list_volunteers(&self) -> Result<Vec<Volunteer>, ApiError>;

    async fn get_volunteer(&self, id: &str) -> Result<Volunteer, ApiError>;

    async fn update_volunteer(
        &self,
        volunteer: &Volunteer,
        send_email: bool,
    ) -> Result<Volunteer, ApiError>;

    async fn delete_volunteer(&self, id: &str) -> Result<(), ApiError>;

    async fn list_jobs(&self) -> Result<Vec<Job>, ApiError>;

    /// Creates the job, or replaces it when its id already exists.
    async fn save_job(&self, job: &Job) -> Result<Job, ApiError>;

    async fn delete_job(&self, id: &str) -> Result<(), ApiError>;

    async fn set_shift_assignment(
        &self,
        volunteer_id: &str,
        shift_id: &str,
        selected: bool,
    ) -> Result<(), ApiError>;

    /// Dispatches a state-machine call to the matching endpoint.
    async fn call(&self, call: &ApiCall) -> Result<ApiReply, ApiError> {
        match call {
            ApiCall::ListVolunteers => self.list_volunteers().await.map(ApiReply::Volunteers),
            ApiCall::GetVolunteer { id } => self
                .get_volunteer(id)
                .await
                .map(|v| ApiReply::Volunteer(Box::new(v))),
            ApiCall::UpdateVolunteer {
                volunteer,
                send_email,
            } => self
                .update_volunteer(volunteer, *send_email)
                .await
                .map(|v| ApiReply::Volunteer(Box::new(v))),
            ApiCall::DeleteVolunteer { id } => {
                self.delete_volunteer(id).await.map(|()| ApiReply::Done)
            }
            ApiCall::ListJobs => self.list_jobs().await.map(ApiReply::Jobs),
            ApiCall::SaveJob { job } => self
                .save_job(job)
                .await
                .map(|j| ApiReply::Job(Box::new(j))),
            ApiCall::DeleteJob { id } => self.delete_job(id).await.map(|()| ApiReply::Done),
            ApiCall::SetShiftAssignment {
                volunteer_id,
                shift_id,
                selected,
            } => self
                .set_shift_assignment(volunteer_id, shift_id, *selected)
                .await
                .map(|()| ApiReply::Done),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| {
                ApiError::new(
                    FailureKind::InvalidUrl,
                    format!("{} cannot be a base url", self.settings.base_url),
                )
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<reqwest::Response, ApiError> {
        board_debug!("{method} {url}");
        let mut request = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }
        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self.send(Method::GET, url, None).await?;
        read_json(response).await
    }

    async fn send_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(method, url, Some(encode(body)?)).await?;
        read_json(response).await
    }
}

#[async_trait::async_trait]
impl RosterApi for ReqwestApi {
    async fn list_volunteers(&self) -> Result<Vec<Volunteer>, ApiError> {
        self.get_json(self.endpoint(&["admin", "volunteers"])?).await
    }

    async fn get_volunteer(&self, id: &str) -> Result<Volunteer, ApiError> {
        self.get_json(self.endpoint(&["admin", "volunteers", id])?)
            .await
    }

    async fn update_volunteer(
        &self,
        volunteer: &Volunteer,
        send_email: bool,
    ) -> Result<Volunteer, ApiError> {
        let mut url = self.endpoint(&["admin", "volunteers", volunteer.id.as_str()])?;
        url.query_pairs_mut()
            .append_pair("sendEmail", if send_email { "true" } else { "false" });
        self.send_json(Method::PUT, url, volunteer).await
    }

    async fn delete_volunteer(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["admin", "volunteers", id])?;
        self.send(Method::DELETE, url, None).await.map(drop)
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
        self.get_json(self.endpoint(&["admin", "jobs"])?).await
    }

    async fn save_job(&self, job: &Job) -> Result<Job, ApiError> {
        let url = self.endpoint(&["admin", "jobs"])?;
        self.send_json(Method::POST, url, job).await
    }

    async fn delete_job(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["admin", "jobs", id])?;
        self.send(Method::DELETE, url, None).await.map(drop)
    }

    async fn set_shift_assignment(
        &self,
        volunteer_id: &str,
        shift_id: &str,
        selected: bool,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["admin", "volunteer", volunteer_id, "shift", shift_id])?;
        let body = encode(&json!({ "selected": selected }))?;
        self.send(Method::PUT, url, Some(body)).await.map(drop)
    }
}

fn encode<B: Serialize>(body: &B) -> Result<Vec<u8>, ApiError> {
    serde_json::to_vec(body).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    board_trace!("Response body: {} bytes", bytes.len());
    serde_json::from_slice(&bytes).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}

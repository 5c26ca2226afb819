use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, trace};

use crate::core::resource::{Analysis, Project, Sample, SequencingObject, Submission};
use crate::core::types::{ProjectId, SampleId};
use crate::irida::{GatewayError, ResourceGateway};

/// Default timeout for a single request to IRIDA
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Everything needed to open an authenticated session with IRIDA
#[derive(Clone)]
pub struct ConnectionSettings {
    /// Base URL of the IRIDA instance, without the `/api` suffix
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Every IRIDA response wraps its payload in `{"resource": ...}`
#[derive(Deserialize)]
struct Envelope<T> {
    resource: T,
}

/// List endpoints carry their items in `resource.resources`
#[derive(Deserialize)]
struct ResourceList<T> {
    #[serde(default = "Vec::new")]
    resources: Vec<T>,
}

/// Blocking client for the IRIDA REST API
pub struct IridaClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl IridaClient {
    /// Authenticate against IRIDA and return a ready client
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Http` if IRIDA cannot be reached and
    /// `GatewayError::Auth` if the credentials are rejected.
    pub fn connect(settings: &ConnectionSettings) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        let base_url = settings.base_url.trim_end_matches('/').to_string();
        let token_url = format!("{base_url}/api/oauth/token");

        info!("Connecting to IRIDA at {base_url} as user={}", settings.username);

        let response = client
            .post(&token_url)
            .form(&[
                ("grant_type", "password"),
                ("client_id", settings.client_id.as_str()),
                ("client_secret", settings.client_secret.as_str()),
                ("username", settings.username.as_str()),
                ("password", settings.password.as_str()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Auth(format!(
                "token request to {token_url} returned status {status}"
            )));
        }

        let token: TokenResponse = response.json()?;

        Ok(Self {
            client,
            base_url,
            access_token: token.access_token,
        })
    }

    /// Resolve a path against the base URL; links from IRIDA are already absolute
    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    fn get_text(&self, path: &str, accept: &str) -> Result<(String, String), GatewayError> {
        let url = self.url(path);
        debug!("Getting path={url}");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .header(ACCEPT, accept)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        trace!("Response from {url}: {body}");
        Ok((url, body))
    }

    fn get_resource<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let (url, body) = self.get_text(path, "application/json")?;
        let envelope: Envelope<T> =
            serde_json::from_str(&body).map_err(|source| GatewayError::Decode { url, source })?;
        Ok(envelope.resource)
    }

    fn get_resources<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, GatewayError> {
        Ok(self.get_resource::<ResourceList<T>>(path)?.resources)
    }
}

impl ResourceGateway for IridaClient {
    fn list_projects(&self) -> Result<Vec<Project>, GatewayError> {
        self.get_resources("/api/projects")
    }

    fn get_project(&self, id: &ProjectId) -> Result<Project, GatewayError> {
        self.get_resource(&format!("/api/projects/{id}"))
    }

    fn list_samples(&self, project: &ProjectId) -> Result<Vec<Sample>, GatewayError> {
        self.get_resources(&format!("/api/projects/{project}/samples"))
    }

    fn list_sequencing_pairs(
        &self,
        sample: &SampleId,
    ) -> Result<Vec<SequencingObject>, GatewayError> {
        self.get_resources(&format!("/api/samples/{sample}/pairs"))
    }

    fn get_submission(&self, href: &str) -> Result<Submission, GatewayError> {
        self.get_resource(href)
    }

    fn list_sequencing_objects(&self, href: &str) -> Result<Vec<SequencingObject>, GatewayError> {
        self.get_resources(href)
    }

    fn get_analysis(&self, href: &str) -> Result<Analysis, GatewayError> {
        self.get_resource(href)
    }

    fn get_prediction_file(&self, href: &str) -> Result<String, GatewayError> {
        self.get_text(href, "text/plain").map(|(_, body)| body)
    }

    fn get_sample(&self, href: &str) -> Result<Sample, GatewayError> {
        self.get_resource(href)
    }

    fn list_submissions_for_user(&self) -> Result<Vec<Submission>, GatewayError> {
        self.get_resources("/api/analysisSubmissions/analysisType/sistr")
    }

    fn list_submissions_shared_to_project(
        &self,
        project: &ProjectId,
    ) -> Result<Vec<Submission>, GatewayError> {
        self.get_resources(&format!("/api/projects/{project}/analyses/sistr"))
    }
}

//! Zitadel management API client
//!
//! One method per API operation. Each method sends exactly one request
//! (except `create_service_user`, which also assigns roles) and returns the
//! decoded JSON body. Nothing is retried and nothing is rolled back.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    required_str, ApiApplication, Credentials, MachineUser, OidcApplication, Project,
    RoleAssignment,
};
use crate::infrastructure::traits::{HttpRequest, HttpTransport};

/// Client for the management API of a single Zitadel instance.
pub struct ManagementService {
    transport: Arc<dyn HttpTransport>,
    credentials: Arc<Credentials>,
}

impl ManagementService {
    /// Create a new management service.
    pub fn new(transport: Arc<dyn HttpTransport>, credentials: Arc<Credentials>) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    /// Create an application in the project of the calling token.
    ///
    /// The response is expected to carry `clientId`.
    #[instrument(skip(self))]
    pub fn create_application(&self, name: &str, app_type: &str) -> ApplicationResult<Value> {
        let payload = ApiApplication::new(name, app_type);
        let body = self.post("/management/v1/projects/me/apps", Some(&payload))?;
        info!("created application {}", name);
        Ok(body)
    }

    /// Create a machine user and assign `roles` to it, in order.
    ///
    /// Returns the user-creation body. The first failing role assignment
    /// aborts the remaining ones; roles already assigned are kept.
    #[instrument(skip(self))]
    pub fn create_service_user(&self, username: &str, roles: &[String]) -> ApplicationResult<Value> {
        let payload = MachineUser::for_username(username);
        let user = self.post("/management/v1/users/machine", Some(&payload))?;

        let user_id = required_str(&user, "userId")?;
        info!("created service user {} ({})", username, user_id);

        for role in roles {
            self.assign_role(&RoleAssignment::new(user_id.as_str(), role.as_str()))?;
        }

        Ok(user)
    }

    /// Issue a token for a service user and return the `token` field.
    #[instrument(skip(self))]
    pub fn get_service_user_token(&self, user_id: &str) -> ApplicationResult<String> {
        let path = format!("/management/v1/users/{user_id}/token");
        let body = self.post::<()>(&path, None)?;
        Ok(required_str(&body, "token")?)
    }

    /// Create a project that asserts and checks roles.
    ///
    /// The response is expected to carry `id`.
    #[instrument(skip(self))]
    pub fn create_project(&self, name: &str) -> ApplicationResult<Value> {
        let payload = Project::with_role_checks(name);
        let body = self.post("/management/v1/projects", Some(&payload))?;
        info!("created project {}", name);
        Ok(body)
    }

    /// Create a public OIDC web application (authorization code + PKCE) in a project.
    ///
    /// The response is expected to carry `clientId`.
    #[instrument(skip(self))]
    pub fn create_web_application(&self, project_id: &str, name: &str) -> ApplicationResult<Value> {
        let path = format!("/management/v1/projects/{project_id}/apps/oidc");
        let payload = OidcApplication::web_pkce(name);
        let body = self.post(&path, Some(&payload))?;
        info!("created web application {} in project {}", name, project_id);
        Ok(body)
    }

    fn assign_role(&self, assignment: &RoleAssignment) -> ApplicationResult<()> {
        debug!("assigning role {} to {}", assignment.role, assignment.user_id);
        self.send(&assignment.path(), Some(&assignment.payload()))?;
        Ok(())
    }

    /// POST and decode the JSON body of a successful response.
    fn post<B: Serialize>(&self, path: &str, payload: Option<&B>) -> ApplicationResult<Value> {
        let (url, text) = self.send(path, payload)?;
        serde_json::from_str(&text).map_err(|source| ApplicationError::Decode { url, source })
    }

    /// POST and return the URL and raw body of a successful response.
    fn send<B: Serialize>(
        &self,
        path: &str,
        payload: Option<&B>,
    ) -> ApplicationResult<(String, String)> {
        let url = self.credentials.endpoint(path);
        let mut request = HttpRequest::post(url.as_str())
            .header("Authorization", self.credentials.bearer())
            .header("Content-Type", "application/json");
        if let Some(payload) = payload {
            let body = serde_json::to_value(payload).map_err(ApplicationError::Encode)?;
            request = request.json(body);
        }

        debug!("{} {}", request.method, url);
        let response = self
            .transport
            .send(&request)
            .map_err(|source| ApplicationError::Transport {
                url: url.clone(),
                source,
            })?;
        debug!("{} {} -> {}", request.method, url, response.status);

        if !response.is_success() {
            return Err(ApplicationError::Status {
                status: response.status,
                url,
                body: response.body,
            });
        }
        Ok((url, response.body))
    }
}

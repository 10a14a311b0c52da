//! Domain entities: credentials and management API payloads

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::domain::DomainError;

/// Application type used when `create-app` is called without `--app-type`.
pub const DEFAULT_APP_TYPE: &str = "APPLICATION_TYPE_API";

/// Organization marker meaning "the organization of the calling token".
pub const CURRENT_ORG: &str = "me";

/// Redirect target after a successful login of the generated web application.
pub const WEB_REDIRECT_URI: &str = "http://localhost:8000/users/auth";

/// Redirect target after logout of the generated web application.
pub const WEB_POST_LOGOUT_REDIRECT_URI: &str = "http://localhost:8000/dashboard";

/// Base URL and bearer token for the management API.
///
/// Immutable once constructed; the token is never shown by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    base_url: String,
    admin_token: String,
}

impl Credentials {
    /// Trailing slashes of `base_url` are stripped.
    pub fn new(base_url: impl AsRef<str>, admin_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            admin_token: admin_token.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn admin_token(&self) -> &str {
        &self.admin_token
    }

    /// Absolute URL for an API path such as `/management/v1/projects`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Value of the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.admin_token)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("admin_token", &"***")
            .finish()
    }
}

/// Payload for `POST /management/v1/projects/me/apps`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiApplication {
    pub name: String,
    pub app_type: String,
    pub auth_method_type: &'static str,
    pub access_token_type: &'static str,
}

impl ApiApplication {
    pub fn new(name: impl Into<String>, app_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            app_type: app_type.into(),
            auth_method_type: "AUTH_METHOD_TYPE_API",
            access_token_type: "ACCESS_TOKEN_TYPE_BEARER",
        }
    }
}

/// Payload for `POST /management/v1/users/machine`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineUser {
    pub user_name: String,
    pub name: String,
    pub description: String,
}

impl MachineUser {
    /// Login name and display name are both the username.
    pub fn for_username(username: &str) -> Self {
        Self {
            user_name: username.to_string(),
            name: username.to_string(),
            description: format!("Service user for {username}"),
        }
    }
}

/// A role granted to a user; sent once and not retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    pub user_id: String,
    pub role: String,
}

impl RoleAssignment {
    pub fn new(user_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: role.into(),
        }
    }

    /// Path of the user's roles endpoint.
    pub fn path(&self) -> String {
        format!("/management/v1/users/{}/roles", self.user_id)
    }

    pub fn payload(&self) -> RoleGrant {
        RoleGrant {
            role_key: self.role.clone(),
            org_id: CURRENT_ORG,
        }
    }
}

/// Payload for `POST /management/v1/users/{id}/roles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleGrant {
    pub role_key: String,
    pub org_id: &'static str,
}

/// Payload for `POST /management/v1/projects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub project_role_assertion: bool,
    pub project_role_check: bool,
}

impl Project {
    /// Roles are asserted in tokens and checked on authentication.
    pub fn with_role_checks(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            project_role_assertion: true,
            project_role_check: true,
        }
    }
}

/// Payload for `POST /management/v1/projects/{id}/apps/oidc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OidcApplication {
    pub name: String,
    pub response_types: Vec<&'static str>,
    pub grant_types: Vec<&'static str>,
    pub app_type: &'static str,
    pub auth_method_type: &'static str,
    pub redirect_uris: Vec<&'static str>,
    pub post_logout_redirect_uris: Vec<&'static str>,
    pub version: &'static str,
    pub dev_mode: bool,
    pub access_token_type: &'static str,
    pub id_token_role_assertion: bool,
    pub id_token_userinfo_assertion: bool,
}

impl OidcApplication {
    /// Public web client using the authorization code flow with PKCE.
    ///
    /// No client secret is issued (`OIDC_AUTH_METHOD_TYPE_NONE`); redirect
    /// URIs point at a local development server.
    pub fn web_pkce(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            response_types: vec!["OIDC_RESPONSE_TYPE_CODE"],
            grant_types: vec!["OIDC_GRANT_TYPE_AUTHORIZATION_CODE"],
            app_type: "OIDC_APP_TYPE_WEB",
            auth_method_type: "OIDC_AUTH_METHOD_TYPE_NONE",
            redirect_uris: vec![WEB_REDIRECT_URI],
            post_logout_redirect_uris: vec![WEB_POST_LOGOUT_REDIRECT_URI],
            version: "OIDC_VERSION_1_0",
            dev_mode: true,
            access_token_type: "OIDC_TOKEN_TYPE_BEARER",
            id_token_role_assertion: true,
            id_token_userinfo_assertion: true,
        }
    }
}

/// Split a comma-separated role list.
///
/// Whitespace around each role is trimmed; order and duplicates are kept,
/// empty entries are not dropped.
pub fn parse_roles(roles: &str) -> Vec<String> {
    roles.split(',').map(|r| r.trim().to_string()).collect()
}

/// Read a string field from a response body.
pub fn required_str(body: &Value, field: &str) -> Result<String, DomainError> {
    match body.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(DomainError::NotAString {
            field: field.to_string(),
        }),
        None => Err(DomainError::MissingField {
            field: field.to_string(),
        }),
    }
}

//! Login credentials, org types and sessions.
//!
//! All credential types implement custom Debug to redact sensitive data.

use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};
use crate::{PRODUCTION_LOGIN_URL, SANDBOX_LOGIN_URL};

/// Trait for an authenticated Salesforce connection.
pub trait Credentials: Send + Sync {
    /// Get the Salesforce instance URL.
    fn instance_url(&self) -> &str;

    /// Get the access token (session id).
    fn access_token(&self) -> &str;

    /// Get the API version (e.g., "62.0").
    fn api_version(&self) -> &str;

    /// Returns true if the credentials appear to be valid (non-empty).
    fn is_valid(&self) -> bool {
        !self.instance_url().is_empty() && !self.access_token().is_empty()
    }
}

/// The kind of org to log in to, which selects the login host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrgType {
    /// Production or developer edition org.
    #[default]
    Production,
    /// Sandbox org.
    Sandbox,
}

impl OrgType {
    /// Map a numeric org code: 0 and 1 are production, anything else is sandbox.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 | 1 => OrgType::Production,
            _ => OrgType::Sandbox,
        }
    }

    /// Login host for this org type.
    pub fn login_url(&self) -> &'static str {
        match self {
            OrgType::Production => PRODUCTION_LOGIN_URL,
            OrgType::Sandbox => SANDBOX_LOGIN_URL,
        }
    }
}

impl std::fmt::Display for OrgType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrgType::Production => write!(f, "production"),
            OrgType::Sandbox => write!(f, "sandbox"),
        }
    }
}

impl FromStr for OrgType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" | "developer" => Ok(OrgType::Production),
            "sandbox" | "test" => Ok(OrgType::Sandbox),
            other => other.parse::<i64>().map(OrgType::from_code).map_err(|_| {
                Error::new(ErrorKind::InvalidCredentials(format!(
                    "unknown org type: {other}"
                )))
            }),
        }
    }
}

/// Username/password credentials for a SOAP login.
///
/// Never persisted. The password and security token are redacted in Debug output.
#[derive(Clone)]
pub struct LoginCredentials {
    username: String,
    password: String,
    security_token: String,
    org_type: OrgType,
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("security_token", &"[REDACTED]")
            .field("org_type", &self.org_type)
            .finish()
    }
}

impl LoginCredentials {
    /// Create new login credentials.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        security_token: impl Into<String>,
        org_type: OrgType,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            security_token: security_token.into(),
            org_type,
        }
    }

    /// Load credentials from environment variables.
    ///
    /// Required environment variables:
    /// - `SF_USERNAME`
    /// - `SF_PASSWORD`
    ///
    /// Optional:
    /// - `SF_SECURITY_TOKEN` (default: empty, for trusted IP ranges)
    /// - `SF_ORG_TYPE` (`production`, `sandbox` or a numeric code; default: production)
    pub fn from_env() -> Result<Self> {
        let username = std::env::var("SF_USERNAME")
            .map_err(|_| Error::new(ErrorKind::EnvVar("SF_USERNAME".to_string())))?;
        let password = std::env::var("SF_PASSWORD")
            .map_err(|_| Error::new(ErrorKind::EnvVar("SF_PASSWORD".to_string())))?;
        let security_token = std::env::var("SF_SECURITY_TOKEN").unwrap_or_default();
        let org_type = match std::env::var("SF_ORG_TYPE") {
            Ok(value) => value.parse()?,
            Err(_) => OrgType::default(),
        };

        Ok(Self::new(username, password, security_token, org_type))
    }

    /// The login username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The org type, which selects the login host.
    pub fn org_type(&self) -> OrgType {
        self.org_type
    }

    /// Password with the security token appended, as the SOAP login expects.
    pub(crate) fn password_with_token(&self) -> String {
        format!("{}{}", self.password, self.security_token)
    }

    /// Basic shape validation before any remote call.
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(Error::new(ErrorKind::InvalidCredentials(
                "username is empty".to_string(),
            )));
        }
        if self.password.is_empty() {
            return Err(Error::new(ErrorKind::InvalidCredentials(
                "password is empty".to_string(),
            )));
        }
        Ok(())
    }
}

/// An authenticated session bound to an instance endpoint.
///
/// Owned by a single operation; the session id is redacted in Debug output.
#[derive(Clone)]
pub struct Session {
    session_id: String,
    instance_url: String,
    api_version: String,
    organization_id: Option<String>,
    user_id: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("session_id", &"[REDACTED]")
            .field("instance_url", &self.instance_url)
            .field("api_version", &self.api_version)
            .field("organization_id", &self.organization_id)
            .field("user_id", &self.user_id)
            .finish()
    }
}

impl Session {
    /// Create a new session.
    pub fn new(
        session_id: impl Into<String>,
        instance_url: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            instance_url: instance_url.into().trim_end_matches('/').to_string(),
            api_version: api_version.into(),
            organization_id: None,
            user_id: None,
        }
    }

    /// Attach the organization id reported by the login.
    pub fn with_organization_id(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    /// Attach the user id reported by the login.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Organization id of the logged-in org, if known.
    pub fn organization_id(&self) -> Option<&str> {
        self.organization_id.as_deref()
    }

    /// User id of the logged-in user, if known.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

impl Credentials for Session {
    fn instance_url(&self) -> &str {
        &self.instance_url
    }

    fn access_token(&self) -> &str {
        &self.session_id
    }

    fn api_version(&self) -> &str {
        &self.api_version
    }
}

//! # sf-auth
//!
//! Salesforce session establishment for metadata retrieval.
//!
//! ## Security
//!
//! - Passwords, security tokens and session ids are redacted in Debug output
//! - Tracing skips credential parameters
//! - Login faults are reported without echoing the submitted credentials
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sf_auth::{LoginCredentials, OrgType, SessionProvider, SoapLogin};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), busbar_sf_auth::Error> {
//!     let creds = LoginCredentials::new("admin@example.com", "hunter2", "TOKEN", OrgType::Sandbox);
//!     let session = SoapLogin::new()?.authenticate(&creds).await?;
//!     println!("logged in to {}", session.instance_url());
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;
mod login;

pub use credentials::{Credentials, LoginCredentials, OrgType, Session};
pub use error::{Error, ErrorKind, Result};
pub use login::{SessionProvider, SoapLogin};

/// Default Salesforce login URL for production.
pub const PRODUCTION_LOGIN_URL: &str = "https://login.salesforce.com";

/// Default Salesforce login URL for sandbox.
pub const SANDBOX_LOGIN_URL: &str = "https://test.salesforce.com";

//! # sf-client
//!
//! SOAP transport shared by the Salesforce login and Metadata API clients.
//!
//! This crate provides:
//! - [`SoapClient`] - posts SOAP envelopes and turns SOAP faults into errors
//! - [`ClientConfig`] - timeouts, user agent and tracing toggles
//! - [`xml`] - lightweight element extraction for SOAP responses
//! - [`security`] - XML escaping for every caller-supplied value
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │  (sf-auth login, sf-metadata retrieve/list/describe)        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SoapClient                             │
//! │  - SOAPAction header + text/xml body                        │
//! │  - SOAP fault detection                                     │
//! │  - Request tracing                                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sf_client::{ClientConfig, SoapClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), busbar_sf_client::Error> {
//!     let client = SoapClient::new(ClientConfig::default())?;
//!     let body = client
//!         .call("https://na1.salesforce.com/services/Soap/m/62.0", "describeMetadata", envelope)
//!         .await?;
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
pub mod security;
pub mod xml;

pub use client::{SoapClient, SoapFault};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, ErrorKind, Result};

/// Default Salesforce API version
pub const DEFAULT_API_VERSION: &str = "62.0";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("busbar-sf-backup/", env!("CARGO_PKG_VERSION"));

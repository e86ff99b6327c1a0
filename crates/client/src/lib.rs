//! # Freispace Client
//!
//! Thin HTTP client for the Freispace workforce/booking analytics API.
//!
//! The backend host is selected by deployment stage (`STAGE` environment
//! variable) and requests are authenticated with an `x-api-key` header when a
//! key is available.
//!
//! ```rust,no_run
//! use freispace_client::{ClientConfig, FreispaceClient};
//!
//! # async fn example() -> freispace_client::ClientResult<()> {
//! let client = FreispaceClient::new(ClientConfig::from_env()?)?;
//! let response = client.get("/tools/analytics/get-staffs").await?;
//! println!("status: {}", response.status);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;

pub use client::{FreispaceClient, HttpResponse};
pub use config::{ClientConfig, Stage};
pub use error::{ClientError, ClientResult};

//! # gcloud-spanner-admin
//!
//! Google Cloud Platform Spanner database admin client library.
//!
//! ## Quickstart
//!
//! ```
//! use gcloud_spanner_admin::client::{AdminClientConfig, Client};
//! use time::{Duration, OffsetDateTime};
//!
//! async fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     // SPANNER_EMULATOR_HOST is used when set, otherwise Google Cloud with default credentials.
//!     let config = AdminClientConfig::default().with_auth().await?;
//!     let client = Client::new(config).await?;
//!
//!     let database = "projects/local-project/instances/test-instance/databases/local-database";
//!     let expire_time = OffsetDateTime::now_utc() + Duration::hours(7);
//!     let mut operation = client
//!         .database()
//!         .create_new_backup("backup1", database, expire_time, None)
//!         .await?;
//!     let backup = operation.wait(None).await?;
//!     println!("{:?}", backup.map(|b| b.name));
//!     Ok(())
//! }
//! ```
//!
//! Database names are validated before any request is sent:
//!
//! ```
//! use gcloud_spanner_admin::path::DatabasePath;
//!
//! let path = DatabasePath::parse("projects/p/instances/i/databases/d").unwrap();
//! assert_eq!(path.instance_path(), "projects/p/instances/i");
//! assert!(DatabasePath::parse("project/instances/databases/d").is_err());
//! ```
use std::time::Duration;

use google_cloud_gax::grpc::Code;
use google_cloud_gax::retry::RetrySetting;

pub mod client;
pub mod database;
pub mod path;
pub mod timestamp;

pub const AUDIENCE: &str = "https://spanner.googleapis.com/";
pub const SPANNER: &str = "spanner.googleapis.com";

pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/cloud-platform",
    "https://www.googleapis.com/auth/spanner.admin",
];

pub fn default_retry_setting() -> RetrySetting {
    RetrySetting {
        from_millis: 50,
        max_delay: Some(Duration::from_secs(10)),
        factor: 1u64,
        take: 20,
        codes: vec![Code::Unavailable, Code::Unknown, Code::DeadlineExceeded],
    }
}

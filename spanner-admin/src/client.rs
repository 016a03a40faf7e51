use std::env::var;

use google_cloud_gax::conn::{Channel, ConnectionManager, ConnectionOptions, Environment, Error};
use google_cloud_googleapis::spanner::admin::database::v1::database_admin_client::DatabaseAdminClient as InternalDatabaseAdminClient;
use google_cloud_longrunning::autogen::operations_client::OperationsClient;
use token_source::NoopTokenSourceProvider;

use crate::database::database_admin_client::DatabaseAdminClient;
use crate::{AUDIENCE, SPANNER};

#[derive(Debug)]
pub struct AdminClientConfig {
    /// Runtime project
    pub environment: Environment,
    /// Overriding service endpoint
    pub endpoint: String,
    /// gRPC connection option
    pub connection_option: ConnectionOptions,
}

impl Default for AdminClientConfig {
    fn default() -> Self {
        AdminClientConfig {
            environment: match var("SPANNER_EMULATOR_HOST").ok() {
                Some(v) => Environment::Emulator(v),
                None => Environment::GoogleCloud(Box::new(NoopTokenSourceProvider {})),
            },
            endpoint: SPANNER.to_string(),
            connection_option: ConnectionOptions::default(),
        }
    }
}

#[cfg(feature = "auth")]
pub use google_cloud_auth;

#[cfg(feature = "auth")]
impl AdminClientConfig {
    pub async fn with_auth(mut self) -> Result<Self, google_cloud_auth::error::Error> {
        if let Environment::GoogleCloud(_) = self.environment {
            let ts = google_cloud_auth::token::DefaultTokenSourceProvider::new(Self::auth_config()).await?;
            self.environment = Environment::GoogleCloud(Box::new(ts))
        }
        Ok(self)
    }

    pub async fn with_credentials(
        mut self,
        credentials: google_cloud_auth::credentials::CredentialsFile,
    ) -> Result<Self, google_cloud_auth::error::Error> {
        if let Environment::GoogleCloud(_) = self.environment {
            let ts = google_cloud_auth::token::DefaultTokenSourceProvider::new_with_credentials(
                Self::auth_config(),
                Box::new(credentials),
            )
            .await?;
            self.environment = Environment::GoogleCloud(Box::new(ts))
        }
        Ok(self)
    }

    fn auth_config() -> google_cloud_auth::project::Config<'static> {
        google_cloud_auth::project::Config::default()
            .with_audience(AUDIENCE)
            .with_scopes(&crate::SCOPES)
    }
}

/// Client is the entry point to the Cloud Spanner admin APIs.
///
/// Clients should be reused rather than being created as needed.
/// A Client may be shared by multiple tasks.
#[derive(Clone)]
pub struct Client {
    database: DatabaseAdminClient,
}

impl Client {
    pub async fn new(config: AdminClientConfig) -> Result<Self, Error> {
        let (conn, lro_client) = internal_client(&config).await?;
        let database = DatabaseAdminClient::new(InternalDatabaseAdminClient::new(conn), lro_client);
        Ok(Self { database })
    }

    pub fn database(&self) -> &DatabaseAdminClient {
        &self.database
    }
}

async fn internal_client(config: &AdminClientConfig) -> Result<(Channel, OperationsClient), Error> {
    let conn_pool = ConnectionManager::new(
        1,
        config.endpoint.as_str(),
        AUDIENCE,
        &config.environment,
        &config.connection_option,
    )
    .await?;
    tracing::debug!(endpoint = config.endpoint.as_str(), "admin connection established");
    let lro_client = OperationsClient::new(conn_pool.conn()).await?;
    Ok((conn_pool.conn(), lro_client))
}

#[cfg(test)]
mod tests {
    use google_cloud_gax::conn::Environment;
    use serial_test::serial;

    use crate::client::AdminClientConfig;
    use crate::SPANNER;

    #[test]
    #[serial]
    fn test_default_config_uses_emulator_host() {
        std::env::set_var("SPANNER_EMULATOR_HOST", "localhost:9010");
        let config = AdminClientConfig::default();
        match config.environment {
            Environment::Emulator(host) => assert_eq!(host, "localhost:9010"),
            Environment::GoogleCloud(_) => panic!("emulator expected"),
        }
        assert_eq!(config.endpoint, SPANNER);
        assert!(config.connection_option.timeout.is_none());
    }

    #[test]
    #[serial]
    fn test_default_config_without_emulator() {
        std::env::remove_var("SPANNER_EMULATOR_HOST");
        let config = AdminClientConfig::default();
        assert!(matches!(config.environment, Environment::GoogleCloud(_)));
    }
}

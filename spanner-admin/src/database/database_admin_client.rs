use google_cloud_gax::conn::Channel;
use google_cloud_gax::create_request;
use google_cloud_gax::grpc::{Code, Response, Status};
use google_cloud_gax::retry::{invoke, MapErr, RetrySetting};
use google_cloud_googleapis::iam::v1::{
    GetIamPolicyRequest, Policy, SetIamPolicyRequest, TestIamPermissionsRequest, TestIamPermissionsResponse,
};
use google_cloud_googleapis::longrunning::Operation as InternalOperation;
use google_cloud_googleapis::spanner::admin::database::v1::database_admin_client::DatabaseAdminClient as InternalDatabaseAdminClient;
use google_cloud_googleapis::spanner::admin::database::v1::{
    Backup, CreateBackupRequest, CreateDatabaseRequest, Database, DeleteBackupRequest, DropDatabaseRequest,
    GetBackupRequest, GetDatabaseDdlRequest, GetDatabaseDdlResponse, GetDatabaseRequest, ListBackupOperationsRequest,
    ListBackupsRequest, ListDatabaseOperationsRequest, ListDatabasesRequest, RestoreDatabaseRequest,
    UpdateBackupRequest, UpdateDatabaseDdlRequest,
};
use google_cloud_longrunning::autogen::operations_client::OperationsClient;
use google_cloud_longrunning::longrunning::Operation;
use time::OffsetDateTime;

use crate::default_retry_setting;
use crate::path::DatabasePath;
use crate::timestamp::expire_timestamp;

/// backup_request builds the CreateBackupRequest for a backup of `database_path`
/// stored in the database's own instance.
pub fn backup_request(
    backup_id: &str,
    database_path: &str,
    expire_time: OffsetDateTime,
) -> Result<CreateBackupRequest, Status> {
    let path = DatabasePath::parse(database_path).map_err(|e| {
        tracing::debug!("rejected backup source: {e}");
        Status::from(e)
    })?;
    Ok(CreateBackupRequest {
        parent: path.instance_path(),
        backup_id: backup_id.to_string(),
        backup: Some(Backup {
            database: path.into(),
            expire_time: Some(expire_timestamp(expire_time)),
            ..Default::default()
        }),
        ..Default::default()
    })
}

#[derive(Clone)]
pub struct DatabaseAdminClient {
    inner: InternalDatabaseAdminClient<Channel>,
    lro_client: OperationsClient,
}

impl DatabaseAdminClient {
    pub fn new(inner: InternalDatabaseAdminClient<Channel>, lro_client: OperationsClient) -> Self {
        Self { inner, lro_client }
    }

    /// list_databases lists Cloud Spanner databases.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn list_databases(
        &self,
        mut req: ListDatabasesRequest,
        retry: Option<RetrySetting>,
    ) -> Result<Vec<Database>, Status> {
        let retry = Some(retry.unwrap_or_else(default_retry_setting));
        let parent = &req.parent;
        let mut all = vec![];
        //eager loading
        loop {
            let action = || async {
                let request = create_request(format!("parent={parent}"), req.clone());
                self.inner.clone().list_databases(request).await.map(|d| d.into_inner()).map_transient_err()
            };
            let response = invoke(retry.clone(), action).await?;
            all.extend(response.databases.into_iter());
            if response.next_page_token.is_empty() {
                return Ok(all);
            }
            req.page_token = response.next_page_token;
        }
    }

    /// create_database creates a new database. The returned operation resolves to the Database.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn create_database(
        &self,
        req: CreateDatabaseRequest,
        retry: Option<RetrySetting>,
    ) -> Result<Operation<Database>, Status> {
        let retry = Some(retry.unwrap_or_else(default_retry_setting));
        let parent = &req.parent;
        let action = || async {
            let request = create_request(format!("parent={parent}"), req.clone());
            self.inner.clone().create_database(request).await.map_transient_err()
        };
        invoke(retry, action)
            .await
            .map(|d| Operation::new(self.lro_client.clone(), d.into_inner()))
    }

    /// get_database gets the state of a Cloud Spanner database.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn get_database(
        &self,
        req: GetDatabaseRequest,
        retry: Option<RetrySetting>,
    ) -> Result<Response<Database>, Status> {
        let retry = Some(retry.unwrap_or_else(default_retry_setting));
        let name = &req.name;
        let action = || async {
            let request = create_request(format!("name={name}"), req.clone());
            self.inner.clone().get_database(request).await.map_transient_err()
        };
        invoke(retry, action).await
    }

    /// update_database_ddl applies schema changes to a database. The operation has no response.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn update_database_ddl(
        &self,
        req: UpdateDatabaseDdlRequest,
        retry: Option<RetrySetting>,
    ) -> Result<Operation<()>, Status> {
        let retry = Some(retry.unwrap_or_else(default_retry_setting));
        let database = &req.database;
        let action = || async {
            let request = create_request(format!("database={database}"), req.clone());
            self.inner.clone().update_database_ddl(request).await.map_transient_err()
        };
        invoke(retry, action)
            .await
            .map(|d| Operation::new(self.lro_client.clone(), d.into_inner()))
    }

    /// drop_database drops a database. Completed backups are retained until their expire_time.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn drop_database(
        &self,
        req: DropDatabaseRequest,
        retry: Option<RetrySetting>,
    ) -> Result<Response<()>, Status> {
        let retry = Some(retry.unwrap_or_else(default_retry_setting));
        let database = &req.database;
        let action = || async {
            let request = create_request(format!("database={database}"), req.clone());
            self.inner.clone().drop_database(request).await.map_transient_err()
        };
        invoke(retry, action).await
    }

    /// get_database_ddl returns the schema of a database as DDL statements, excluding pending changes.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn get_database_ddl(
        &self,
        req: GetDatabaseDdlRequest,
        retry: Option<RetrySetting>,
    ) -> Result<Response<GetDatabaseDdlResponse>, Status> {
        let retry = Some(retry.unwrap_or_else(default_retry_setting));
        let database = &req.database;
        let action = || async {
            let request = create_request(format!("database={database}"), req.clone());
            self.inner.clone().get_database_ddl(request).await.map_transient_err()
        };
        invoke(retry, action).await
    }

    /// set_iam_policy replaces the access control policy on a database or backup.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn set_iam_policy(
        &self,
        req: SetIamPolicyRequest,
        retry: Option<RetrySetting>,
    ) -> Result<Response<Policy>, Status> {
        let retry = Some(retry.unwrap_or_else(default_retry_setting));
        let resource = &req.resource;
        let action = || async {
            let request = create_request(format!("resource={resource}"), req.clone());
            self.inner.clone().set_iam_policy(request).await.map_transient_err()
        };
        invoke(retry, action).await
    }

    /// get_iam_policy gets the access control policy of a database or backup.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn get_iam_policy(
        &self,
        req: GetIamPolicyRequest,
        retry: Option<RetrySetting>,
    ) -> Result<Response<Policy>, Status> {
        let retry = Some(retry.unwrap_or_else(default_retry_setting));
        let resource = &req.resource;
        let action = || async {
            let request = create_request(format!("resource={resource}"), req.clone());
            self.inner.clone().get_iam_policy(request).await.map_transient_err()
        };
        invoke(retry, action).await
    }

    /// test_iam_permissions returns the permissions the caller has on a database or backup.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn test_iam_permissions(
        &self,
        req: TestIamPermissionsRequest,
        retry: Option<RetrySetting>,
    ) -> Result<Response<TestIamPermissionsResponse>, Status> {
        let retry = Some(retry.unwrap_or_else(default_retry_setting));
        let resource = &req.resource;
        let action = || async {
            let request = create_request(format!("resource={resource}"), req.clone());
            self.inner.clone().test_iam_permissions(request).await.map_transient_err()
        };
        invoke(retry, action).await
    }

    /// create_backup starts creating a backup. Only one backup per database may be pending at a time.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn create_backup(
        &self,
        req: CreateBackupRequest,
        retry: Option<RetrySetting>,
    ) -> Result<Operation<Backup>, Status> {
        let retry = Some(retry.unwrap_or_else(default_retry_setting));
        let parent = &req.parent;
        let action = || async {
            let request = create_request(format!("parent={parent}"), req.clone());
            self.inner.clone().create_backup(request).await.map_transient_err()
        };
        invoke(retry, action)
            .await
            .map(|d| Operation::new(self.lro_client.clone(), d.into_inner()))
    }

    /// create_new_backup creates a backup called backup_id of the database at database_path,
    /// eligible for deletion after expire_time.
    ///
    /// database_path must be of the form projects/<project>/instances/<instance>/databases/<database>.
    /// A malformed path fails with Code::InvalidArgument before any request is sent.
    /// The backup is stored in the instance containing the database.
    /// expire_time must be at least 6 hours and at most 366 days from the time the
    /// request is processed.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn create_new_backup(
        &self,
        backup_id: &str,
        database_path: &str,
        expire_time: OffsetDateTime,
        retry: Option<RetrySetting>,
    ) -> Result<Operation<Backup>, Status> {
        let req = backup_request(backup_id, database_path, expire_time)?;
        tracing::debug!(parent = req.parent.as_str(), backup_id, "creating backup");
        self.create_backup(req, retry).await
    }

    /// get_backup gets metadata on a pending or completed Backup.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn get_backup(
        &self,
        req: GetBackupRequest,
        retry: Option<RetrySetting>,
    ) -> Result<Response<Backup>, Status> {
        let retry = Some(retry.unwrap_or_else(default_retry_setting));
        let name = &req.name;
        let action = || async {
            let request = create_request(format!("name={name}"), req.clone());
            self.inner.clone().get_backup(request).await.map_transient_err()
        };
        invoke(retry, action).await
    }

    /// update_backup updates a pending or completed Backup.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn update_backup(
        &self,
        req: UpdateBackupRequest,
        retry: Option<RetrySetting>,
    ) -> Result<Response<Backup>, Status> {
        let retry = Some(retry.unwrap_or_else(default_retry_setting));
        let name = match &req.backup {
            Some(backup) => &backup.name,
            None => return Err(Status::new(Code::InvalidArgument, "backup is required")),
        };
        let action = || async {
            let request = create_request(format!("backup.name={name}"), req.clone());
            self.inner.clone().update_backup(request).await.map_transient_err()
        };
        invoke(retry, action).await
    }

    /// delete_backup deletes a pending or completed Backup.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn delete_backup(
        &self,
        req: DeleteBackupRequest,
        retry: Option<RetrySetting>,
    ) -> Result<Response<()>, Status> {
        let retry = Some(retry.unwrap_or_else(default_retry_setting));
        let name = &req.name;
        let action = || async {
            let request = create_request(format!("name={name}"), req.clone());
            self.inner.clone().delete_backup(request).await.map_transient_err()
        };
        invoke(retry, action).await
    }

    /// list_backups lists completed and pending backups, most recent first.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn list_backups(
        &self,
        mut req: ListBackupsRequest,
        retry: Option<RetrySetting>,
    ) -> Result<Vec<Backup>, Status> {
        let retry = Some(retry.unwrap_or_else(default_retry_setting));
        let parent = &req.parent;
        let mut all = vec![];
        //eager loading
        loop {
            let action = || async {
                let request = create_request(format!("parent={parent}"), req.clone());
                self.inner.clone().list_backups(request).await.map(|d| d.into_inner()).map_transient_err()
            };
            let response = invoke(retry.clone(), action).await?;
            all.extend(response.backups.into_iter());
            if response.next_page_token.is_empty() {
                return Ok(all);
            }
            req.page_token = response.next_page_token;
        }
    }

    /// restore_database creates a new database from a completed backup in the same project.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn restore_database(
        &self,
        req: RestoreDatabaseRequest,
        retry: Option<RetrySetting>,
    ) -> Result<Operation<Database>, Status> {
        let retry = Some(retry.unwrap_or_else(default_retry_setting));
        let parent = &req.parent;
        let action = || async {
            let request = create_request(format!("parent={parent}"), req.clone());
            self.inner.clone().restore_database(request).await.map_transient_err()
        };
        invoke(retry, action)
            .await
            .map(|d| Operation::new(self.lro_client.clone(), d.into_inner()))
    }

    /// list_backup_operations lists backup operations of an instance from the last 7 days.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn list_backup_operations(
        &self,
        mut req: ListBackupOperationsRequest,
        retry: Option<RetrySetting>,
    ) -> Result<Vec<InternalOperation>, Status> {
        let retry = Some(retry.unwrap_or_else(default_retry_setting));
        let parent = &req.parent;
        let mut all = vec![];
        //eager loading
        loop {
            let action = || async {
                let request = create_request(format!("parent={parent}"), req.clone());
                self.inner
                    .clone()
                    .list_backup_operations(request)
                    .await
                    .map(|d| d.into_inner())
                    .map_transient_err()
            };
            let response = invoke(retry.clone(), action).await?;
            all.extend(response.operations.into_iter());
            if response.next_page_token.is_empty() {
                return Ok(all);
            }
            req.page_token = response.next_page_token;
        }
    }

    /// list_database_operations lists database operations of an instance from the last 7 days.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn list_database_operations(
        &self,
        mut req: ListDatabaseOperationsRequest,
        retry: Option<RetrySetting>,
    ) -> Result<Vec<InternalOperation>, Status> {
        let retry = Some(retry.unwrap_or_else(default_retry_setting));
        let parent = &req.parent;
        let mut all = vec![];
        //eager loading
        loop {
            let action = || async {
                let request = create_request(format!("parent={parent}"), req.clone());
                self.inner
                    .clone()
                    .list_database_operations(request)
                    .await
                    .map(|d| d.into_inner())
                    .map_transient_err()
            };
            let response = invoke(retry.clone(), action).await?;
            all.extend(response.operations.into_iter());
            if response.next_page_token.is_empty() {
                return Ok(all);
            }
            req.page_token = response.next_page_token;
        }
    }

    /// create_backup_operation returns a handle to a previously started create_backup
    /// operation, possibly started by a different process.
    pub fn create_backup_operation(&self, name: impl Into<String>) -> Operation<Backup> {
        self.operation(name)
    }

    /// create_database_operation returns a handle to a previously started create_database operation.
    pub fn create_database_operation(&self, name: impl Into<String>) -> Operation<Database> {
        self.operation(name)
    }

    /// restore_database_operation returns a handle to a previously started restore_database operation.
    pub fn restore_database_operation(&self, name: impl Into<String>) -> Operation<Database> {
        self.operation(name)
    }

    /// update_database_ddl_operation returns a handle to a previously started update_database_ddl operation.
    pub fn update_database_ddl_operation(&self, name: impl Into<String>) -> Operation<()> {
        self.operation(name)
    }

    fn operation<T: prost::Message + Default>(&self, name: impl Into<String>) -> Operation<T> {
        let inner = InternalOperation {
            name: name.into(),
            ..Default::default()
        };
        Operation::new(self.lro_client.clone(), inner)
    }
}

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use google_cloud_gax::grpc::{Code, Status};
use once_cell::sync::Lazy;
use regex::Regex;

pub const DATABASE_NAME_PATTERN: &str = "^projects/[^/]+/instances/[^/]+/databases/[^/]+$";

// DATABASE_NAME_PATTERN with the ids captured
static DATABASE_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new("^projects/([^/]+)/instances/([^/]+)/databases/([^/]+)$").unwrap());

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("database name {name:?} should conform to pattern {pattern:?}")]
    InvalidArgument { name: String, pattern: &'static str },
}

impl From<Error> for Status {
    fn from(e: Error) -> Self {
        Status::new(Code::InvalidArgument, e.to_string())
    }
}

/// A validated database resource name
/// `projects/<project>/instances/<instance>/databases/<database>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatabasePath {
    name: String,
    project: String,
    instance: String,
    database: String,
}

impl DatabasePath {
    /// parse validates that the name conforms to [`DATABASE_NAME_PATTERN`]
    /// and extracts the project, instance and database ids.
    pub fn parse(name: &str) -> Result<Self, Error> {
        let captures = DATABASE_NAME_REGEX
            .captures(name)
            .ok_or_else(|| Error::InvalidArgument {
                name: name.to_string(),
                pattern: DATABASE_NAME_PATTERN,
            })?;
        Ok(Self {
            name: name.to_string(),
            project: captures[1].to_string(),
            instance: captures[2].to_string(),
            database: captures[3].to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// instance_path returns the parent instance name `projects/<project>/instances/<instance>`.
    pub fn instance_path(&self) -> String {
        format!("projects/{}/instances/{}", self.project, self.instance)
    }

    /// backup_path returns the name a backup with the given id receives in the database's instance.
    pub fn backup_path(&self, backup_id: &str) -> String {
        format!("{}/backups/{backup_id}", self.instance_path())
    }
}

impl FromStr for DatabasePath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for DatabasePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<DatabasePath> for String {
    fn from(path: DatabasePath) -> Self {
        path.name
    }
}

#[cfg(test)]
mod tests {
    use google_cloud_gax::grpc::{Code, Status};

    use crate::path::{DatabasePath, Error, DATABASE_NAME_PATTERN};

    #[test]
    fn test_parse_valid_database_name() {
        let path = DatabasePath::parse("projects/spanner-cloud-test/instances/fooinstance/databases/foodb").unwrap();
        assert_eq!(path.project(), "spanner-cloud-test");
        assert_eq!(path.instance(), "fooinstance");
        assert_eq!(path.database(), "foodb");
        assert_eq!(
            path.name(),
            "projects/spanner-cloud-test/instances/fooinstance/databases/foodb"
        );
    }

    #[test]
    fn test_parse_invalid_database_name() {
        let err = DatabasePath::parse("project/instances/databases/foodb").unwrap_err();
        assert_eq!(
            err,
            Error::InvalidArgument {
                name: "project/instances/databases/foodb".to_string(),
                pattern: DATABASE_NAME_PATTERN,
            }
        );
        let message = err.to_string();
        assert!(message.contains("\"project/instances/databases/foodb\""), "{message}");
        assert!(message.contains(DATABASE_NAME_PATTERN), "{message}");
    }

    #[test]
    fn test_parse_rejects_malformed_names() {
        let names = [
            "",
            "projects/p/instances/i",
            "projects/p/instances/i/databases/",
            "projects//instances/i/databases/d",
            "projects/p/instances//databases/d",
            "/projects/p/instances/i/databases/d",
            "projects/p/instances/i/databases/d/",
            "projects/p/instances/i/databases/d/operations/o",
            "project/p/instances/i/databases/d",
            "projects/p/instance/i/databases/d",
            "projects/p/instances/i/database/d",
            "projects/p/instances/i/backups/d",
        ];
        for name in names {
            assert!(DatabasePath::parse(name).is_err(), "{name} should be rejected");
        }
    }

    #[test]
    fn test_error_message_shows_plain_pattern() {
        let err = DatabasePath::parse("projects/p").unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"database name "projects/p" should conform to pattern "^projects/[^/]+/instances/[^/]+/databases/[^/]+$""#
        );
        assert!(!DATABASE_NAME_PATTERN.contains('('));
    }

    #[test]
    fn test_parse_agrees_with_pattern() {
        let pattern = regex::Regex::new(DATABASE_NAME_PATTERN).unwrap();
        let names = [
            "projects/p/instances/i/databases/d",
            "projects/p/instances/i/databases/d/",
            "projects/p/instances//databases/d",
            "projects/a b/instances/i-1/databases/d_2",
        ];
        for name in names {
            assert_eq!(DatabasePath::parse(name).is_ok(), pattern.is_match(name), "{name}");
        }
    }

    #[test]
    fn test_instance_path() {
        let path: DatabasePath = "projects/[PROJECT]/instances/[INSTANCE]/databases/db1".parse().unwrap();
        assert_eq!(path.instance_path(), "projects/[PROJECT]/instances/[INSTANCE]");
        assert_eq!(
            path.backup_path("backup1"),
            "projects/[PROJECT]/instances/[INSTANCE]/backups/backup1"
        );
        assert_eq!(path.to_string(), "projects/[PROJECT]/instances/[INSTANCE]/databases/db1");
    }

    #[test]
    fn test_error_into_status() {
        let err = DatabasePath::parse("projects/p").unwrap_err();
        let status: Status = err.clone().into();
        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), err.to_string());
    }
}

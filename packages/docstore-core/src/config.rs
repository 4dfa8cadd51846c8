//! Connection configuration parsed from `docstore://` URIs.

use std::fmt;

use crate::error::DbError;

/// Port implied when a URI omits one.
pub const DEFAULT_PORT: u16 = 7878;

const URI_SCHEME: &str = "docstore://";

/// Where to reach a store and which database to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    pub host: String,
    pub port: u16,
    pub database: String,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        ConnectOptions {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            database: "test".to_string(),
        }
    }
}

impl ConnectOptions {
    /// Parses a `docstore://host[:port]/database` URI.
    pub fn parse(uri: &str) -> Result<Self, DbError> {
        let invalid = |reason: &str| DbError::InvalidUri {
            uri: uri.to_string(),
            reason: reason.to_string(),
        };

        let rest = uri
            .strip_prefix(URI_SCHEME)
            .ok_or_else(|| invalid("expected scheme 'docstore://'"))?;
        let (authority, database) = rest
            .split_once('/')
            .ok_or_else(|| invalid("missing database name"))?;
        if database.is_empty() {
            return Err(invalid("missing database name"));
        }
        if database.contains('/') {
            return Err(invalid("database name must not contain '/'"));
        }

        let (host, port) = match authority.split_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| invalid("port must be a number between 0 and 65535"))?;
                (host, port)
            }
            None => (authority, DEFAULT_PORT),
        };
        if host.is_empty() {
            return Err(invalid("missing host"));
        }

        Ok(ConnectOptions {
            host: host.to_string(),
            port,
            database: database.to_string(),
        })
    }
}

impl fmt::Display for ConnectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{URI_SCHEME}{}:{}/{}",
            self.host, self.port, self.database
        )
    }
}

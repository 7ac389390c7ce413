//! MongoDB connection configuration

use serde::{Deserialize, Serialize};
use url::Url;

/// Atlas cluster host used when only credentials are supplied
pub const DEFAULT_CLUSTER_HOST: &str = "cluster0.obgikox.mongodb.net";

/// Database holding the users, products and bids collections
pub const DEFAULT_DATABASE: &str = "smart_db";

/// Configuration for a MongoDB-backed store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MongoConfig {
    /// Full connection string
    pub uri: String,
    /// Database name
    #[serde(default = "default_database")]
    pub database: String,
    /// Create the unique index on `users.email` after connecting
    #[serde(default = "default_true")]
    pub ensure_indexes: bool,
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_true() -> bool {
    true
}

impl MongoConfig {
    /// Config for an explicit connection string
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: default_database(),
            ensure_indexes: true,
        }
    }

    /// Config for the default Atlas cluster with the given credentials
    pub fn atlas(user: &str, password: &str) -> Self {
        Self::new(atlas_uri(user, password, DEFAULT_CLUSTER_HOST))
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_ensure_indexes(mut self, ensure_indexes: bool) -> Self {
        self.ensure_indexes = ensure_indexes;
        self
    }

    /// Connection string with the password masked, for logs
    ///
    /// Strings the URL parser rejects (e.g. seed lists with ports) are
    /// hidden entirely.
    pub fn redacted_uri(&self) -> String {
        let Ok(mut url) = Url::parse(&self.uri) else {
            return "[unparsed connection string]".to_string();
        };
        if url.password().is_none() {
            return self.uri.clone();
        }
        match url.set_password(Some("****")) {
            Ok(()) => url.to_string(),
            Err(()) => "[unparsed connection string]".to_string(),
        }
    }
}

/// Build an SRV connection string for an Atlas cluster
pub fn atlas_uri(user: &str, password: &str, host: &str) -> String {
    format!(
        "mongodb+srv://{}:{}@{}/?appName=Cluster0",
        urlencoding::encode(user),
        urlencoding::encode(password),
        host
    )
}

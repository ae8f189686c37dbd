//! Account-level client
//!
//! [`CloudantClient`] owns the transport and manages databases. Per-database
//! operations live on [`Database`].

use crate::config::ClientConfig;
use crate::database::{validate_db_name, Database};
use crate::error::{CloudantError, Result};
use crate::transport::{
    Credentials, HttpRequest, ReqwestTransport, Transport, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_REQUEST_TIMEOUT,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Client for one Cloudant or CouchDB account.
///
/// # Examples
///
/// ```rust,no_run
/// use cloudant_link::CloudantClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = CloudantClient::builder()
///     .url("http://localhost:5984")
///     .credentials("admin", "pass")
///     .build()?;
///
/// client.create_partitioned_db("orders").await?;
/// let db = client.database("orders", false).await?;
/// assert!(db.info().await?.is_partitioned());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CloudantClient {
    transport: Arc<dyn Transport>,
}

impl CloudantClient {
    pub fn builder() -> CloudantClientBuilder {
        CloudantClientBuilder::new()
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate().map_err(CloudantError::ConfigError)?;

        let mut builder = Self::builder()
            .url(config.url.clone())
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .request_timeout(Duration::from_secs(config.request_timeout_secs));
        if let Some(username) = &config.username {
            builder = builder.credentials_opt(username.clone(), config.password.clone());
        }
        builder.build()
    }

    /// Client over a caller-supplied transport.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn create_db(&self, name: &str) -> Result<()> {
        self.put_db(name, false).await
    }

    /// Create a database whose documents are grouped by partition key.
    pub async fn create_partitioned_db(&self, name: &str) -> Result<()> {
        self.put_db(name, true).await
    }

    async fn put_db(&self, name: &str, partitioned: bool) -> Result<()> {
        validate_db_name(name)?;
        let mut request = HttpRequest::put([name]);
        if partitioned {
            request = request.query("partitioned", "true");
        }
        self.transport.execute(request).await?.error_for_status()?;
        info!(db = name, partitioned, "Created database");
        Ok(())
    }

    pub async fn delete_db(&self, name: &str) -> Result<()> {
        validate_db_name(name)?;
        self.transport
            .execute(HttpRequest::delete([name]))
            .await?
            .error_for_status()?;
        info!(db = name, "Deleted database");
        Ok(())
    }

    pub async fn all_dbs(&self) -> Result<Vec<String>> {
        self.transport
            .execute(HttpRequest::get(["_all_dbs"]))
            .await?
            .into_json()
    }

    /// Handle for database `name`, creating it first when `create` is set.
    ///
    /// Creation tolerates an existing database.
    pub async fn database(&self, name: &str, create: bool) -> Result<Database> {
        validate_db_name(name)?;
        if create {
            match self.create_db(name).await {
                Ok(()) => {}
                Err(CloudantError::PreconditionFailed(_)) => {
                    debug!(db = name, "Database already exists");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(Database::new(Arc::clone(&self.transport), name))
    }
}

/// Builder for [`CloudantClient`]
#[derive(Debug, Clone)]
pub struct CloudantClientBuilder {
    url: String,
    credentials: Option<Credentials>,
    connect_timeout: Duration,
    request_timeout: Duration,
}

impl Default for CloudantClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CloudantClientBuilder {
    pub fn new() -> Self {
        Self {
            url: crate::config::DEFAULT_URL.to_string(),
            credentials: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password: Some(password.into()),
        });
        self
    }

    fn credentials_opt(mut self, username: String, password: Option<String>) -> Self {
        self.credentials = Some(Credentials { username, password });
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<CloudantClient> {
        let transport = ReqwestTransport::new(
            &self.url,
            self.credentials,
            self.connect_timeout,
            self.request_timeout,
        )?;
        debug!(url = %transport.base_url(), "Built client");
        Ok(CloudantClient::with_transport(Arc::new(transport)))
    }
}

//! AWS SDK client setup (Imperative Shell).

use aws_sdk_dynamodb::config::Credentials;
use aws_sdk_dynamodb::Client;

/// Endpoint DynamoDB Local listens on by default.
pub const DEFAULT_LOCAL_ENDPOINT: &str = "http://localhost:8000";

/// AWS client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsConfig {
    /// Custom endpoint URL (for local DynamoDB).
    pub endpoint_url: Option<String>,
    /// AWS region.
    pub region: String,
    /// Use fixed dummy credentials instead of the default provider chain.
    pub static_credentials: bool,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            endpoint_url: std::env::var("AWS_ENDPOINT_URL").ok(),
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            static_credentials: false,
        }
    }
}

impl AwsConfig {
    /// Configuration for a DynamoDB Local instance at `endpoint`.
    pub fn local(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint_url: Some(endpoint.into()),
            region: "us-east-1".to_string(),
            static_credentials: true,
        }
    }

    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Local DynamoDB ({})", url),
            None => format!("AWS DynamoDB (region: {})", self.region),
        }
    }
}

/// Creates a DynamoDB client with the given configuration.
pub async fn create_client(config: &AwsConfig) -> Client {
    let mut sdk_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()));

    if let Some(endpoint) = &config.endpoint_url {
        sdk_config_loader = sdk_config_loader.endpoint_url(endpoint);
    }

    if config.static_credentials {
        sdk_config_loader = sdk_config_loader.credentials_provider(Credentials::new(
            "local", "local", None, None, "tablekit",
        ));
    }

    let sdk_config = sdk_config_loader.load().await;
    Client::new(&sdk_config)
}

/// Shared handle to the database endpoint.
///
/// Every lifecycle and read operation is issued through this handle. Cloning
/// is cheap: the underlying SDK client is reference counted.
#[derive(Debug, Clone)]
pub struct Database {
    pub(crate) client: Client,
}

impl Database {
    /// Wraps an already configured client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connects using the given configuration.
    pub async fn connect(config: &AwsConfig) -> Self {
        tracing::debug!(target_env = %config.target_display(), "Creating DynamoDB client");
        Self::new(create_client(config).await)
    }

    /// Connects using `AWS_ENDPOINT_URL` / `AWS_REGION` and the default
    /// credential chain.
    pub async fn from_env() -> Self {
        Self::connect(&AwsConfig::default()).await
    }

    /// Get the underlying SDK client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_config() {
        let config = AwsConfig::local(DEFAULT_LOCAL_ENDPOINT);

        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.region, "us-east-1");
        assert!(config.static_credentials);
    }

    #[test]
    fn test_target_display() {
        let local = AwsConfig::local("http://localhost:8001");
        assert_eq!(local.target_display(), "Local DynamoDB (http://localhost:8001)");

        let remote = AwsConfig {
            endpoint_url: None,
            region: "eu-west-1".to_string(),
            static_credentials: false,
        };
        assert_eq!(remote.target_display(), "AWS DynamoDB (region: eu-west-1)");
    }
}

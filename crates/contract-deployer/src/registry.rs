use serde::Deserialize;
use tracing::debug;

/// Public registry with the addresses of the World ID contracts.
pub const DEFAULT_REGISTRY_URL: &str = "https://developer.worldcoin.org/api/v1/contracts";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RegistryEntry {
    pub key: String,
    pub value: String,
}

#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("No contract is registered under `{0}`")]
    KeyNotFound(String),
}

/// Source of contract addresses, keyed by network-specific names.
#[allow(async_fn_in_trait)]
pub trait AddressRegistry {
    async fn lookup(&self, key: &str) -> Result<String, RegistryError>;
}

/// Reads the registry over HTTP. Every lookup performs a single GET, without retries.
#[derive(Clone, Debug)]
pub struct RegistryClient {
    url: String,
    http: reqwest::Client,
}

impl RegistryClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: reqwest::Client::new(),
        }
    }

    pub async fn fetch_entries(&self) -> Result<Vec<RegistryEntry>, RegistryError> {
        Ok(self
            .http
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<RegistryEntry>>()
            .await?)
    }
}

impl AddressRegistry for RegistryClient {
    async fn lookup(&self, key: &str) -> Result<String, RegistryError> {
        let entries = self.fetch_entries().await?;
        debug!(url = %self.url, entries = entries.len(), "Fetched contract registry");
        find_value(&entries, key)
    }
}

/// Value of the first entry registered under `key`.
pub fn find_value(entries: &[RegistryEntry], key: &str) -> Result<String, RegistryError> {
    entries
        .iter()
        .find(|entry| entry.key == key)
        .map(|entry| entry.value.clone())
        .ok_or_else(|| RegistryError::KeyNotFound(key.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    async fn registry_serving(body: serde_json::Value) -> (MockServer, RegistryClient) {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/contracts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&mock_server)
            .await;
        let client = RegistryClient::new(format!("{}/api/v1/contracts", mock_server.uri()));
        (mock_server, client)
    }

    #[tokio::test]
    async fn value_is_selected_by_key() {
        let (_server, client) = registry_serving(json!([
            { "key": "polygon.id.worldcoin.eth", "value": "0xDEF" },
            { "key": "id.worldcoin.eth", "value": "0xABC" },
        ]))
        .await;

        assert_eq!(client.lookup("id.worldcoin.eth").await.unwrap(), "0xABC");
    }

    #[tokio::test]
    async fn missing_key_is_an_error() {
        let (_server, client) =
            registry_serving(json!([{ "key": "goerli.id.worldcoin.eth", "value": "0xABC" }])).await;

        assert!(matches!(
            client.lookup("id.worldcoin.eth").await,
            Err(RegistryError::KeyNotFound(key)) if key == "id.worldcoin.eth"
        ));
    }

    #[tokio::test]
    async fn malformed_response_is_an_error() {
        let (_server, client) = registry_serving(json!({ "contracts": [] })).await;

        assert!(matches!(
            client.lookup("id.worldcoin.eth").await,
            Err(RegistryError::Reqwest(_))
        ));
    }

    #[tokio::test]
    async fn server_error_is_an_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;
        let client = RegistryClient::new(mock_server.uri());

        assert!(client.lookup("id.worldcoin.eth").await.is_err());
    }

    #[test]
    fn first_matching_entry_wins() {
        let entries = vec![
            RegistryEntry {
                key: "id.worldcoin.eth".to_string(),
                value: "0x1".to_string(),
            },
            RegistryEntry {
                key: "id.worldcoin.eth".to_string(),
                value: "0x2".to_string(),
            },
        ];

        assert_eq!(find_value(&entries, "id.worldcoin.eth").unwrap(), "0x1");
    }
}

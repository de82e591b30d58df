//! Actions secret provisioning
//!
//! Secret values reach the API only as sealed-box ciphertext; the
//! plaintext never leaves the caller. The public key is fetched fresh
//! per run because the platform can rotate it.

use reqwest::StatusCode;
use seed_core::{Error, RepoPublicKey, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::GitHubClient;

#[derive(Debug, Deserialize)]
pub(crate) struct PublicKeyResponse {
    pub key_id: String,
    pub key: String,
}

impl GitHubClient {
    /// Fetch the repository's secrets public key
    pub async fn fetch_secrets_public_key(&self) -> Result<RepoPublicKey> {
        let response = self
            .http()
            .get(self.repo_url("/actions/secrets/public-key"))
            .send()
            .await
            .map_err(|e| Error::KeyFetch(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(Error::KeyFetch(Self::response_detail(response).await));
        }

        let key: PublicKeyResponse = response
            .json()
            .await
            .map_err(|e| Error::KeyFetch(format!("Unexpected response body: {}", e)))?;

        Ok(RepoPublicKey {
            key: key.key,
            key_id: key.key_id,
        })
    }

    /// Store one sealed secret under `name`
    ///
    /// The API answers 201 for a new secret and 204 for an update; both
    /// are success.
    pub async fn put_secret(&self, name: &str, sealed_value: &str, key_id: &str) -> Result<()> {
        let body = json!({
            "encrypted_value": sealed_value,
            "key_id": key_id,
        });

        let response = self
            .http()
            .put(self.repo_url(&format!("/actions/secrets/{}", name)))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::SecretUpload {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        match response.status() {
            StatusCode::CREATED | StatusCode::NO_CONTENT => {
                info!(secret = %name, "Secret stored");
                Ok(())
            }
            _ => Err(Error::SecretUpload {
                name: name.to_string(),
                reason: Self::response_detail(response).await,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_public_key_response() {
        let body = r#"{
            "key_id": "568250167242549743",
            "key": "2Sg8iYjAxxmI2LvUXpJjkYrMxURPc8r+dB7TJyvvcCU="
        }"#;
        let key: PublicKeyResponse = serde_json::from_str(body).unwrap();
        assert_eq!(key.key_id, "568250167242549743");
        assert!(key.key.ends_with('='));
    }
}

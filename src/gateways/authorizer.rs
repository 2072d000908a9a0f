use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::GatewayError;
use super::http_client::HttpTransport;

const GATEWAY: &str = "authorizer";

#[derive(Debug, Serialize)]
struct AuthorizeRequest<'a> {
    cpf: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerResponse {
    pub is_authorized: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user: AuthorizedUser,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AuthorizedUser {
    #[serde(default)]
    pub cpf: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Any answer other than an explicit 2xx approval is `GatewayError::Unauthorized`.
    async fn authorize_user(&self, cpf: &str) -> Result<AuthorizerResponse, GatewayError>;
}

pub struct HttpAuthorizer {
    transport: Arc<dyn HttpTransport>,
    url: String,
}

impl HttpAuthorizer {
    pub fn new(transport: Arc<dyn HttpTransport>, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Authorizer for HttpAuthorizer {
    async fn authorize_user(&self, cpf: &str) -> Result<AuthorizerResponse, GatewayError> {
        let body = serde_json::to_vec(&AuthorizeRequest { cpf })
            .map_err(|source| GatewayError::Encode { gateway: GATEWAY, source })?;

        let response = self
            .transport
            .post_json(&self.url, body)
            .await
            .map_err(|source| GatewayError::Transport { gateway: GATEWAY, source })?;

        if !response.is_success() {
            tracing::warn!(status = response.status, "Authorizer rejected customer");
            return Err(GatewayError::Unauthorized);
        }

        let decoded: AuthorizerResponse = serde_json::from_slice(&response.body)
            .map_err(|source| GatewayError::Decode { gateway: GATEWAY, source })?;

        if !decoded.is_authorized {
            tracing::warn!(message = %decoded.message, "Authorizer denied customer");
            return Err(GatewayError::Unauthorized);
        }

        Ok(decoded)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Authorizer answered outside 2xx or explicitly denied the customer
    #[error("customer unauthorized")]
    Unauthorized,

    #[error("failed to pay order, payment gateway answered {status}")]
    PaymentFailed { status: u16 },

    #[error("failed to encode {gateway} request, error: {source}")]
    Encode {
        gateway: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to call {gateway}, error: {source}")]
    Transport {
        gateway: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode {gateway} response, error: {source}")]
    Decode {
        gateway: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

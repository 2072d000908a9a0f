// ============================================================================
// External Gateways - synchronous HTTP collaborators
// ============================================================================
//
// Each client marshals a small JSON body, POSTs it through the shared
// transport and maps any status outside 200..=299 to a domain failure.
// No retries or backoff are applied.
//
// ============================================================================

pub mod authorizer;
mod error;
pub mod http_client;
pub mod payment;

pub use authorizer::{Authorizer, HttpAuthorizer};
pub use error::GatewayError;
pub use http_client::ReqwestTransport;
pub use payment::{HttpPaymentClient, PaymentGateway, PaymentRequest};

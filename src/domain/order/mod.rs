// ============================================================================
// Order Domain - Business Logic for Orders
// ============================================================================
//
// This module contains ALL Order-specific code:
// - Value objects (Order, OrderItem, OrderStatus, CPF check)
// - Events (inbound status changes, production notification)
// - Commands (OrderSubmission, OrderStatusChange)
// - Errors (OrderError enum)
// - Use case (OrderService orchestration)
//
// ============================================================================

pub mod value_objects;
pub mod events;
pub mod commands;
pub mod errors;
pub mod use_case;

// Re-export for convenience
pub use value_objects::*;
pub use events::*;
pub use commands::*;
pub use errors::*;
pub use use_case::*;

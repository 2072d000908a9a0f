// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Each area has its own subdirectory with:
// - Value objects
// - Commands / drafts
// - Errors
// - Service or use case
//
// Persistence, gateways and messaging are reached only through traits.
//
// ============================================================================

pub mod order;
pub mod pagination;
pub mod product;

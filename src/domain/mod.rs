// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// One subdirectory per entity. Each holds its value objects, records,
// errors and the service that the HTTP layer calls.
//
// ============================================================================

pub mod customer;
pub mod delivery;
pub mod order;

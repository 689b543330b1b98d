// ============================================================================
// Customer Domain - Registration and record lifecycle
// ============================================================================
//
// - Value objects (TaxId, Email, Address)
// - Records and request bodies (Customer, CustomerRegistration, CustomerPatch)
// - Errors (CustomerError)
// - Service (CustomerService)
//
// ============================================================================

pub mod value_objects;
pub mod errors;
pub mod model;
pub mod service;

pub use value_objects::*;
pub use errors::*;
pub use model::*;
pub use service::*;

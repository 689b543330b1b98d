// ============================================================================
// Delivery Domain - Fulfillment records for priced orders
// ============================================================================
//
// - Value objects (Charges, DeliveryStatus)
// - Records and request bodies (Delivery, CreateDeliveryRequest, DeliveryPatch)
// - Errors (DeliveryError)
// - Service (direct CRUD that bypasses the order workflow)
//
// ============================================================================

pub mod value_objects;
pub mod model;
pub mod errors;
pub mod service;

pub use value_objects::*;
pub use model::*;
pub use errors::*;
pub use service::*;

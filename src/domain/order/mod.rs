// ============================================================================
// Order Domain - Pricing and the fulfillment workflow
// ============================================================================
//
// - Value objects (DeliveryType)
// - Pricing (PricingInput, PriceBreakdown, price)
// - Records and request bodies (Order, CreateOrderRequest, OrderReceipt)
// - Errors (OrderError)
// - Workflow (OrderWorkflow)
//
// ============================================================================

pub mod value_objects;
pub mod errors;
pub mod pricing;
pub mod model;
pub mod workflow;

// Re-export for convenience
pub use value_objects::*;
pub use errors::*;
pub use pricing::{price, PriceBreakdown, PricingInput};
pub use model::*;
pub use workflow::*;

//! External collaborators: where deliveries, lab readings and supplier
//! profiles come from, and where settlements are written.

mod memory;
mod traits;

pub use memory::{Dataset, InMemorySettlementStore, InMemorySources};
pub use traits::{DeliverySource, QualitySource, SettlementStore, SupplierDirectory};

pub mod resolver;
pub mod types;

pub use resolver::EntitlementResolver;
pub use types::{Entitlement, LedgerSelector};

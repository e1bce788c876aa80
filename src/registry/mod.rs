pub mod error;
pub mod registry;
pub mod types;

pub use error::{RegistryError, RegistryErrorKind};
pub use registry::{AssetRegistry, terms_hash};
pub use types::{
    AgentLink, AssetRecord, LicenseKind, LicenseRecord, LicenseStatus, ListingParams,
};

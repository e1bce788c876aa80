pub mod account;
pub mod error;
pub mod memory;
pub mod object;
pub mod ports;
pub mod rpc;

pub use account::AccountLedgerRpc;
pub use error::{ChainError, ChainErrorKind};
pub use memory::{InMemoryAccountLedger, InMemoryObjectLedger};
pub use object::ObjectLedgerRpc;
pub use ports::{AccountLedgerPort, ObjectLedgerPort};

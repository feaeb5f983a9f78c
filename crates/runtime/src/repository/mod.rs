//! Persistence adapters for balance profiles.
//!
//! [`FileBalanceRepository`] keeps one JSON document per opponent and is used
//! by the simulation binary; [`InMemoryBalanceRepository`] backs tests.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileBalanceRepository;
pub use memory::InMemoryBalanceRepository;
pub use traits::BalanceRepository;

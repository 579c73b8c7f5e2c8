//! Client directory: customer sites, their service history and when the
//! next inspection falls due.

pub mod directory;
pub mod error;
pub mod store;

pub use directory::{ClientDirectory, ClientDraft, ClientFilter, ClientPatch, ClientStats, ServiceDraft};
pub use error::{ClientError, ClientResult};
pub use store::{ClientRepository, InMemoryClientStore};

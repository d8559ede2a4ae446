//! Browser-side support: the serialized rule contract, a live document model,
//! and the incremental applier that keeps inserted content in sync.

pub mod applier;
pub mod dom;
pub mod payload;

pub use applier::ClientSideApplier;
pub use dom::{LiveDocument, MutationRecord};
pub use payload::{ClientPayload, ClientRule};

pub mod api;
pub mod envelope;
pub mod identifier;
pub mod record;
pub mod tagged;

pub use envelope::{ProxyEnvelope, ProxyOutcome};
pub use identifier::{normalize_query, BillType, Identifier, IdentifierError};
pub use record::{DisplayRecord, NOT_AVAILABLE};
pub use tagged::Section;

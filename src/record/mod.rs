mod audit;
mod edit;
mod record;

pub use audit::{AuditTrail, Verification};
pub use edit::EditRecord;
pub use record::{short_address, Principal, Record, RecordId, RecordSummary};

//! Classification audit log implementations

mod in_memory;
mod jsonl;

pub use in_memory::InMemoryAuditLog;
pub use jsonl::JsonlAuditLog;

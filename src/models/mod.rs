mod audit_log;
mod order;
mod prefix;

pub use audit_log::{AuditAction, AuditLog, AuditStatus};
pub use order::{Order, OrderStatus};
pub use prefix::{NewPrefix, Prefix, PrefixChanges};

pub mod audit_logs;
pub mod ratings;
pub mod stores;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use ratings::Entity as Ratings;
pub use stores::Entity as Stores;
pub use users::Entity as Users;

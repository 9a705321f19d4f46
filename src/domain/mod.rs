mod log_entry;
mod page;
mod user;

pub use log_entry::LogEntry;
pub use page::Page;
pub use user::User;

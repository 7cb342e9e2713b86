pub mod add;
pub mod list;
pub mod migrate;
pub mod rollback;

pub use add::cmd_add;
pub use list::cmd_list;
pub use migrate::cmd_migrate;
pub use rollback::cmd_rollback;

pub mod outcome;
pub mod reconcile;
pub mod report;
pub mod scaffold;

pub use outcome::Outcome;
pub use reconcile::Reconciler;
pub use report::{Status, status};
pub use scaffold::{add_migration, add_migration_at};

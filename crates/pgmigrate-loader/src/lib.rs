pub mod discover;
pub mod loader;
pub mod script;

pub use discover::discover;
pub use loader::{FileLoader, MigrationLoader, StaticRegistry};
pub use script::{MigrationScript, ScriptUnit, Statements, render_template};

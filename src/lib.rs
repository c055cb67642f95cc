pub mod command;
pub mod config;
pub mod engine;
pub mod files;
pub mod sequence;
pub mod source;
pub mod utils;

// Re-export commonly used types
pub use command::{
    confirm, create_migration, num_down_migrations_from_args, CommandError, CreateOptions,
    CreatedMigration, Dispatcher, Outcome, VersionReport, Zone,
};
pub use config::MigrateConfig;
pub use engine::{EngineError, EngineState, FileEngine, MigrationEngine};
pub use files::{create_file, generate_migration_files};
pub use sequence::{list_matches, next_sequence};
pub use source::{Direction, Source, SourceError};
pub use utils::{clean_dir, clean_path};

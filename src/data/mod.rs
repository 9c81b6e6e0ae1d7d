//! Declarative game content

pub mod loader;
pub mod skills;

pub use loader::DataManager;
pub use skills::default_skill_defs;

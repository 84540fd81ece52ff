pub mod language;
pub mod project;

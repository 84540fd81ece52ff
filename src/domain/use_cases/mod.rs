pub mod language;
pub mod projects;

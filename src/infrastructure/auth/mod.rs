pub mod digest;
pub mod session;

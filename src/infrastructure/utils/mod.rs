pub mod clock;
pub mod markdown;

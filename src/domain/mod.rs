pub mod entities;
pub mod seed;
pub mod use_cases;

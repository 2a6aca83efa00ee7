pub mod cors;
pub mod errors;

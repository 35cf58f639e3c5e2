pub mod date;
pub mod serde_helpers;

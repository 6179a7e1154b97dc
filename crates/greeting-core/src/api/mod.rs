pub mod present;
pub mod types;

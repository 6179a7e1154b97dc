pub mod choice;
pub mod modal;
pub mod session;

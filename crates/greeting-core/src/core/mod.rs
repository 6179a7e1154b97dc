pub mod state;
pub mod time;

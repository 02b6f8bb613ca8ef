// App module for the marketing dashboard
// Holds interactive state and turns key presses into store actions

pub mod actions;
pub mod input;
pub mod state;

pub use input::handle_input;
pub use state::{App, AppScreen, InputMode};

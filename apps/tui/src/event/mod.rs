pub mod headless;
pub mod load;
pub mod loop_handler;

pub use headless::run_headless;
pub use loop_handler::run;

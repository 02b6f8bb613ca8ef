pub mod dashboard;
pub mod error;
pub mod filters;
pub mod grouped;
pub mod help;
pub mod loading;

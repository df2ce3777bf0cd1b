/// Event date parsing and formatting
pub mod datetime;
/// Structured log lines shared by the engine and the stores
pub mod logging;
/// Free-text input validation for dialogue steps
pub mod validation;

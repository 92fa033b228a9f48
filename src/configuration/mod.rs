pub mod command_line;
pub mod constants;
pub mod deserialize;
pub mod settings;
pub mod step;
pub mod suite;

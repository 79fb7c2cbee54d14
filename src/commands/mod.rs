pub mod config;
pub mod generate;
pub mod list;
pub mod run;
pub mod status;
pub mod submit;

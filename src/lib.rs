pub mod defaults;
pub mod generator;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod source;
pub mod templating;
pub mod validation;
pub mod verify;

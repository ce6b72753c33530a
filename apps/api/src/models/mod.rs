pub mod resume;
pub mod settings;
pub mod vacancy;

pub mod completion;
pub mod configs;
pub mod health;
pub mod sessions;

pub mod profile;
pub mod stream;
pub mod template;

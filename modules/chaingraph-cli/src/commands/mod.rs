mod delete;
mod dev;
mod fetch;
mod import;

pub use delete::delete;
pub use dev::dev;
pub use fetch::fetch;
pub use import::import;

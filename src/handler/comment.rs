pub mod create;
pub use create as Create;

pub mod get;
pub use get as Get;

pub mod list;
pub use list as List;

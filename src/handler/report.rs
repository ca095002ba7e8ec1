pub mod create;
pub use create as Create;

pub mod list;
pub use list as List;

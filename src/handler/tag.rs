pub mod create;
pub use create as Create;

pub mod search;
pub use search as Search;

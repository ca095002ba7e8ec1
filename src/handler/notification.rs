pub mod list;
pub use list as List;

pub mod delete;
pub use delete as Delete;

pub mod delete_all;
pub use delete_all as DeleteAll;

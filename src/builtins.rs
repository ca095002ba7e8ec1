pub mod mongo;
pub use mongo as Mongo;

pub mod jwt;
pub use jwt as Jwt;

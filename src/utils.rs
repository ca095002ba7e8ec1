pub mod response;
pub mod mongo;
pub mod geo;

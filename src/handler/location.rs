pub mod autocomplete;
pub use autocomplete as Autocomplete;

pub mod resolve;
pub use resolve as Resolve;

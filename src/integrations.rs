pub mod mailer;
pub use mailer as Mailer;

pub mod places;
pub use places as Places;

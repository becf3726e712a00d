mod helpers;
mod secret;

pub use helpers::parse_comma_list;
pub use secret::Secret;

pub mod dispatch;
pub mod errors;
pub mod models;

pub use dispatch::{route_for, Route};
pub use errors::*;
pub use models::*;

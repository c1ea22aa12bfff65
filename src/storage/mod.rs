pub mod models;
pub mod store;

pub use models::{Entry, LinkData};
pub use store::LinkStore;

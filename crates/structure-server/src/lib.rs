pub mod store;

pub use store::{Share, ShareStore};

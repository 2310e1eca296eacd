pub mod store;

pub use store::MockStore;

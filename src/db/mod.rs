pub mod businesses;
pub mod competitors;
pub mod pool;
pub mod reports;
pub mod trends;

pub use pool::create_pool;

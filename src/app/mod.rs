pub mod aggregator;
pub mod lookup;
pub mod ports;
pub mod sort;

pub use aggregator::Aggregator;

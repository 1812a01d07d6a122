pub mod counter;
mod expand;

pub use expand::Expand;

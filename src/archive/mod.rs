pub mod retention;

pub use retention::{copy_into, sweep};

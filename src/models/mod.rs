pub mod item;
pub mod observation;
pub mod run_result;

// Re-exports for convenience
pub use item::*;
pub use observation::*;
pub use run_result::*;

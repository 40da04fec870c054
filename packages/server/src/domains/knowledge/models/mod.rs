pub mod entry;
pub mod guideline;
pub mod training_memory;

pub use entry::*;
pub use guideline::*;
pub use training_memory::*;

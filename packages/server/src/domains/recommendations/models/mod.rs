pub mod candidates;
pub mod recommendation;

pub use candidates::*;
pub use recommendation::*;

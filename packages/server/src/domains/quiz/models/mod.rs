pub mod concern;
pub mod profile;

pub use concern::*;
pub use profile::*;

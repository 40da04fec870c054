pub mod bundle;

pub use bundle::*;

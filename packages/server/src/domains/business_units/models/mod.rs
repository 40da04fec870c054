pub mod business_unit;

pub use business_unit::*;

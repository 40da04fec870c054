pub mod addon_match;
pub mod attribute;
pub mod category;
pub mod product;
pub mod product_type;

pub use addon_match::*;
pub use attribute::*;
pub use category::*;
pub use product::*;
pub use product_type::*;

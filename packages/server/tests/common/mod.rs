// Common test utilities
#![allow(dead_code)]

pub mod fixtures;
pub mod harness;

pub use fixtures::*;
pub use harness::*;

/// Macro for creating GraphQL variables
#[macro_export]
macro_rules! vars {
    ($($key:expr => $value:expr),* $(,)?) => {{
        let mut vars = serde_json::Map::new();
        $(
            vars.insert($key.to_string(), serde_json::json!($value));
        )*
        serde_json::Value::Object(vars)
    }};
}

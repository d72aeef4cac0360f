//! # Error Types
//!
//! Errors raised while converting raw native values into shared types.

use thiserror::Error;

/// A raw integer did not match any variant of a native enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Unknown {enum_name} value: {value}")]
pub struct UnknownEnumValue {
    /// Name of the enum being decoded.
    pub enum_name: &'static str,
    /// The raw value received from the native side.
    pub value: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_enum_value_display() {
        let err = UnknownEnumValue {
            enum_name: "ESteamInputType",
            value: 99,
        };
        assert_eq!(err.to_string(), "Unknown ESteamInputType value: 99");
    }
}

/*
    Decal - product customization layout engine
    Copyright (C) 2025 meetzli

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.
*/

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Malformed customization document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Non-finite value in field {field}")]
    NonFinite { field: &'static str },

    #[error("Value {value} out of range for field {field}")]
    OutOfRange { field: &'static str, value: f64 },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Malformed engine configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        let err = CodecError::OutOfRange {
            field: "relativeX",
            value: 140.0,
        };
        assert_eq!(err.to_string(), "Value 140 out of range for field relativeX");

        let err = ConfigError::invalid("min_item_size", "must be positive");
        assert!(err.to_string().contains("min_item_size"));
    }
}

//! Canonical JSON helpers shared by the game codecs.
//!
//! Every game decodes through private serde "repr" structs and then runs its
//! own semantic validation. Structural failures (missing keys, wrong types,
//! negative sizes) surface here as `GameError::Validation`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::error::{GameError, Result};

/// Deserialize `value` into `T`, tagging failures with `what`.
pub(crate) fn decode<T: DeserializeOwned>(value: &Value, what: &str) -> Result<T> {
    T::deserialize(value).map_err(|err| GameError::validation(format!("{what}: {err}")))
}

/// Check that `rows` is a `height x width` rectangle.
pub(crate) fn check_grid_shape<T>(rows: &[Vec<T>], height: usize, width: usize) -> Result<()> {
    if rows.len() != height {
        return Err(GameError::validation(format!(
            "grid has {} rows, expected {}",
            rows.len(),
            height
        )));
    }
    for (y, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(GameError::validation(format!(
                "grid row {} has {} cells, expected {}",
                y,
                row.len(),
                width
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_reports_context() {
        let err = decode::<Vec<i64>>(&json!({"a": 1}), "grid").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("grid"));
    }

    #[test]
    fn test_decode_does_not_coerce() {
        assert!(decode::<i64>(&json!("3"), "player").is_err());
        assert!(decode::<u32>(&json!(-1), "column").is_err());
        assert!(decode::<i64>(&json!(2.5), "player").is_err());
    }

    #[test]
    fn test_grid_shape() {
        let rows = vec![vec![0, 0], vec![0, 0], vec![0, 0]];
        assert!(check_grid_shape(&rows, 3, 2).is_ok());
        assert!(check_grid_shape(&rows, 2, 2).is_err());
        assert!(check_grid_shape(&rows, 3, 3).is_err());

        let ragged = vec![vec![0, 0], vec![0]];
        assert!(check_grid_shape(&ragged, 2, 2).is_err());
    }
}

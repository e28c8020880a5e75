//! High-score persistence.
//!
//! The only persisted value is the best score, kept under a single key as
//! plain numeric text (`"150"`). A missing, unreadable or non-numeric value
//! is treated as "no high score yet" and never surfaces as an error.

use thiserror::Error;

use super::config::{round_to, SCORE_DECIMALS};

/// localStorage key for the best score.
#[cfg(target_arch = "wasm32")]
pub const STORAGE_KEY: &str = "dollyDashHighScore";

#[derive(Debug, Error)]
pub enum StoreError {
    #[cfg(target_arch = "wasm32")]
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage rejected the write: {0}")]
    Rejected(String),
}

/// A single persisted scalar, stored as text.
pub trait ScoreStore {
    fn get(&self) -> Option<String>;
    fn set(&mut self, value: &str) -> Result<(), StoreError>;
}

/// Parse the stored text. Anything that is not a finite, non-negative
/// number counts as no score.
pub fn parse_high_score(raw: Option<&str>) -> f64 {
    raw.and_then(|s| serde_json::from_str::<f64>(s.trim()).ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| round_to(v, SCORE_DECIMALS))
        .unwrap_or(0.0)
}

pub fn load_high_score(store: &impl ScoreStore) -> f64 {
    parse_high_score(store.get().as_deref())
}

/// Text written to the store for `score`, at score precision.
pub fn format_high_score(score: f64) -> String {
    let score = round_to(score, SCORE_DECIMALS);
    if SCORE_DECIMALS <= 0 {
        format!("{}", score as i64)
    } else {
        format!("{:.*}", SCORE_DECIMALS as usize, score)
    }
}

pub fn persist_high_score(store: &mut impl ScoreStore, score: f64) -> Result<(), StoreError> {
    store.set(&format_high_score(score))
}

/// In-process store, used natively and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub value: Option<String>,
    /// When set, every write fails.
    pub fail_writes: bool,
}

impl MemoryStore {
    #[cfg(test)]
    pub fn with_value(value: &str) -> Self {
        Self {
            value: Some(value.to_string()),
            fail_writes: false,
        }
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self) -> Option<String> {
        self.value.clone()
    }

    fn set(&mut self, value: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Rejected("write disabled".into()));
        }
        self.value = Some(value.to_string());
        Ok(())
    }
}

/// Browser localStorage under [`STORAGE_KEY`].
#[cfg(target_arch = "wasm32")]
pub struct LocalStore;

#[cfg(target_arch = "wasm32")]
fn get_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStore {
    fn get(&self) -> Option<String> {
        match get_storage()?.get_item(STORAGE_KEY) {
            Ok(v) => v,
            Err(e) => {
                web_sys::console::warn_1(
                    &format!("Dolly Dash: ハイスコアの読み込みに失敗: {e:?}").into(),
                );
                None
            }
        }
    }

    fn set(&mut self, value: &str) -> Result<(), StoreError> {
        let storage = get_storage().ok_or(StoreError::Unavailable)?;
        storage
            .set_item(STORAGE_KEY, value)
            .map_err(|e| StoreError::Rejected(format!("{e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_zero() {
        let store = MemoryStore::default();
        assert_eq!(load_high_score(&store), 0.0);
    }

    #[test]
    fn numeric_text_loads() {
        let store = MemoryStore::with_value("150");
        assert_eq!(load_high_score(&store), 150.0);
    }

    #[test]
    fn corrupt_value_is_zero() {
        for raw in ["", "abc", "12abc", "NaN", "-5", "{\"score\":3}"] {
            assert_eq!(parse_high_score(Some(raw)), 0.0, "raw={raw:?}");
        }
    }

    #[test]
    fn whitespace_is_tolerated() {
        assert_eq!(parse_high_score(Some(" 42\n")), 42.0);
    }

    #[test]
    fn persist_writes_whole_points() {
        let mut store = MemoryStore::default();
        persist_high_score(&mut store, 149.6).unwrap();
        assert_eq!(store.value.as_deref(), Some("150"));
        assert_eq!(load_high_score(&store), 150.0);
    }

    #[test]
    fn failing_store_reports_error() {
        let mut store = MemoryStore {
            value: None,
            fail_writes: true,
        };
        assert!(persist_high_score(&mut store, 10.0).is_err());
        assert!(store.value.is_none());
    }
}

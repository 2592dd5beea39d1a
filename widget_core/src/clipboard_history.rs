//! Clipboard history list persisted as a JSON array in `localStorage`.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::error::{WidgetError, WidgetResult};
use crate::storage;

pub const STORAGE_KEY: &str = "clipboardHistory";
pub const MAX_ITEMS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipItem {
    pub id: String,
    pub text: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: f64,
}

/// Newest first, texts unique, at most [`MAX_ITEMS`] entries.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ClipboardHistoryState {
    items: Vec<ClipItem>,
}

impl ClipboardHistoryState {
    /// Rebuilds the history from a stored blob. Anything unreadable yields an
    /// empty history rather than an error.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Vec<ClipItem>>(raw) {
            Ok(items) => {
                let mut state = Self::default();
                // Oldest first so duplicates resolve to their newest position.
                for item in items.into_iter().rev() {
                    if item.text.is_empty() {
                        continue;
                    }
                    state.items.retain(|existing| existing.text != item.text);
                    state.items.insert(0, item);
                }
                state.items.truncate(MAX_ITEMS);
                state
            }
            Err(err) => {
                log::warn!("discarding corrupt clipboard history: {err}");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> WidgetResult<String> {
        Ok(serde_json::to_string(&self.items)?)
    }

    pub fn items(&self) -> &[ClipItem] {
        &self.items
    }

    /// Records `text` at the front. Returns `false` for empty text.
    pub fn add(&mut self, text: &str, now_ms: f64) -> bool {
        if text.is_empty() {
            return false;
        }
        self.items.retain(|item| item.text != text);
        let id = self.unique_id(now_ms);
        self.items.insert(
            0,
            ClipItem {
                id,
                text: text.to_string(),
                timestamp: now_ms,
            },
        );
        self.items.truncate(MAX_ITEMS);
        true
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn unique_id(&self, now_ms: f64) -> String {
        let base = format!("{}", now_ms.max(0.0).trunc() as u64);
        let taken = |candidate: &str| self.items.iter().any(|item| item.id == candidate);
        let mut candidate = base.clone();
        let mut suffix = 1;
        while taken(&candidate) {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }
        candidate
    }
}

#[wasm_bindgen]
pub struct ClipboardHistory {
    state: ClipboardHistoryState,
}

#[wasm_bindgen]
impl ClipboardHistory {
    /// Loads whatever history the browser has stored.
    #[wasm_bindgen(constructor)]
    pub fn new() -> ClipboardHistory {
        let state = storage::load_raw(STORAGE_KEY)
            .map(|raw| ClipboardHistoryState::from_json(&raw))
            .unwrap_or_default();
        ClipboardHistory { state }
    }

    pub fn add(&mut self, text: &str) -> Result<JsValue, JsValue> {
        if self.state.add(text, js_sys::Date::now()) {
            storage::save_json(STORAGE_KEY, &self.state.items)?;
        }
        self.items()
    }

    pub fn delete(&mut self, id: &str) -> Result<JsValue, JsValue> {
        if self.state.delete(id) {
            storage::save_json(STORAGE_KEY, &self.state.items)?;
        }
        self.items()
    }

    pub fn clear(&mut self) {
        self.state.clear();
        storage::remove(STORAGE_KEY);
    }

    pub fn items(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.state.items())
            .map_err(|err| WidgetError::from(err).into())
    }
}

impl Default for ClipboardHistory {
    fn default() -> Self {
        Self::new()
    }
}

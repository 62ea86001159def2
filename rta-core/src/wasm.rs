//! WebAssembly bindings for JavaScript
//!
//! This module exposes the translator to browsers and Node.js using
//! wasm-bindgen. Enable with the "wasm" feature flag.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::parser::Limits;
#[cfg(feature = "wasm")]
use crate::translator::{Translation, translate_or_diagnose};

/// JavaScript-facing translation result
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct JsTranslation {
    inner: Translation,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl JsTranslation {
    /// Translate a pattern
    ///
    /// Never throws: malformed patterns produce a diagnostic table and the
    /// placeholder diagram.
    #[wasm_bindgen(constructor)]
    pub fn new(pattern: &str) -> JsTranslation {
        JsTranslation {
            inner: translate_or_diagnose(pattern, Limits::default()),
        }
    }

    /// Translate a pattern with custom limits
    #[wasm_bindgen(js_name = withLimits)]
    pub fn with_limits(pattern: &str, max_len: usize, max_depth: usize) -> JsTranslation {
        JsTranslation {
            inner: translate_or_diagnose(pattern, Limits::new(max_len, max_depth)),
        }
    }

    /// The transition table, or the diagnostic message
    #[wasm_bindgen(getter)]
    pub fn table(&self) -> String {
        self.inner.table.clone()
    }

    /// The Mermaid diagram
    #[wasm_bindgen(getter)]
    pub fn diagram(&self) -> String {
        self.inner.diagram.clone()
    }

    /// Whether the table holds a diagnostic message
    #[wasm_bindgen(getter, js_name = isDiagnostic)]
    pub fn is_diagnostic(&self) -> bool {
        self.inner.is_diagnostic
    }
}

/// Initialize panic hook for better error messages in WASM
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

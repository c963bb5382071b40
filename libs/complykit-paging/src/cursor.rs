//! Opaque pagination cursors.

use thiserror::Error;

/// Sort direction for an order key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SortDir {
    #[serde(rename = "asc")]
    Asc,
    #[serde(rename = "desc")]
    Desc,
}

impl SortDir {
    /// Reverse the sort direction (Asc <-> Desc).
    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

/// Cursor decoding/validation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("invalid cursor: invalid base64url encoding")]
    CursorInvalidBase64,

    #[error("invalid cursor: malformed JSON")]
    CursorInvalidJson,

    #[error("invalid cursor: unsupported version")]
    CursorInvalidVersion,

    #[error("invalid cursor: empty or invalid keys")]
    CursorInvalidKeys,

    #[error("invalid cursor: invalid sort direction")]
    CursorInvalidDirection,

    #[error("cursor sort order does not match the query order")]
    OrderMismatch,
}

/// Pagination cursor, version 1.
///
/// `k` holds the sort-key values of the last row already seen, in the
/// order of `s`, the signed order tokens the result set is sorted by
/// (e.g. `-created_at,-id`). A cursor is only valid against a query with
/// the exact same order tokens; the tiebreaker key makes resumption
/// unambiguous when primary sort values collide.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cursor {
    pub k: Vec<String>,
    pub o: SortDir,
    pub s: String,
}

impl Cursor {
    #[must_use]
    pub fn new(keys: Vec<String>, dir: SortDir, order_tokens: impl Into<String>) -> Self {
        Self {
            k: keys,
            o: dir,
            s: order_tokens.into(),
        }
    }

    /// Encode to an opaque base64url (no padding) token.
    ///
    /// # Errors
    /// Returns a JSON serialization error if encoding fails.
    pub fn encode(&self) -> serde_json::Result<String> {
        #[derive(serde::Serialize)]
        struct Wire<'a> {
            v: u8,
            k: &'a [String],
            o: &'a str,
            s: &'a str,
        }
        let o = match self.o {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        };
        let w = Wire {
            v: 1,
            k: &self.k,
            o,
            s: &self.s,
        };
        serde_json::to_vec(&w).map(|bytes| base64_url::encode(&bytes))
    }

    /// Decode from a token handed back by a caller.
    ///
    /// # Errors
    /// Returns the specific [`PageError`] variant for bad base64, bad
    /// JSON, an unsupported version, empty keys, or a bad direction.
    pub fn decode(token: &str) -> Result<Self, PageError> {
        #[derive(serde::Deserialize)]
        struct Wire {
            v: u8,
            k: Vec<String>,
            o: String,
            s: String,
        }

        let bytes = base64_url::decode(token).map_err(|_| PageError::CursorInvalidBase64)?;
        let w: Wire = serde_json::from_slice(&bytes).map_err(|_| PageError::CursorInvalidJson)?;
        if w.v != 1 {
            return Err(PageError::CursorInvalidVersion);
        }
        let o = match w.o.as_str() {
            "asc" => SortDir::Asc,
            "desc" => SortDir::Desc,
            _ => return Err(PageError::CursorInvalidDirection),
        };
        if w.k.is_empty() || w.k.iter().any(|key| key.trim().is_empty()) {
            return Err(PageError::CursorInvalidKeys);
        }
        if w.s.trim().is_empty() {
            return Err(PageError::CursorInvalidKeys);
        }
        Ok(Cursor { k: w.k, o, s: w.s })
    }

    /// Reject a cursor minted for a different ordering.
    ///
    /// # Errors
    /// Returns [`PageError::OrderMismatch`] when the cursor's order tokens
    /// differ from the query's effective order.
    pub fn validate_order(&self, order_tokens: &str) -> Result<(), PageError> {
        if self.s != order_tokens {
            return Err(PageError::OrderMismatch);
        }
        Ok(())
    }
}

// base64url helpers (no padding)
mod base64_url {
    use base64::Engine;

    pub fn encode(bytes: &[u8]) -> String {
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
    }

    pub fn decode(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::URL_SAFE_NO_PAD.decode(s)
    }
}

use crate::value::Value;
use derive_more::Display;
use std::borrow::Cow;

///
/// TextMode
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TextMode {
    Cs, // case-sensitive
    Ci, // case-insensitive
}

impl TextMode {
    #[must_use]
    pub const fn from_case_insensitive(case_insensitive: bool) -> Self {
        if case_insensitive { Self::Ci } else { Self::Cs }
    }
}

///
/// NormalizedValue
///
/// Canonical string form of one indexed value.
/// Only [`normalize`] constructs it, so every instance is already folded.
///

#[derive(Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NormalizedValue(String);

impl NormalizedValue {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for NormalizedValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize one value for index writes and lookups.
///
/// Returns `None` for `Value::Null`, which is never indexed.
/// Numbers and booleans render in their canonical decimal/literal form, so an
/// integer and its decimal text normalize identically.
#[must_use]
pub fn normalize(value: &Value, case_insensitive: bool) -> Option<NormalizedValue> {
    let mode = TextMode::from_case_insensitive(case_insensitive);

    let out = match value {
        Value::Null => return None,
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Uint(u) => u.to_string(),
        Value::Text(s) => text_with_mode(s, mode).into_owned(),
    };

    Some(NormalizedValue(out))
}

/// Locale-independent, context-free lower-casing; idempotent.
///
/// Folds one character at a time, so a character's result never depends on
/// its neighbours. Final sigma folds to the medial form.
#[must_use]
pub fn fold_case(s: &str) -> Cow<'_, str> {
    if s.is_ascii() {
        if s.bytes().any(|b| b.is_ascii_uppercase()) {
            return Cow::Owned(s.to_ascii_lowercase());
        }
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.chars()
            .flat_map(char::to_lowercase)
            .map(|c| if c == 'ς' { 'σ' } else { c })
            .collect(),
    )
}

fn text_with_mode(s: &str, mode: TextMode) -> Cow<'_, str> {
    match mode {
        TextMode::Cs => Cow::Borrowed(s),
        TextMode::Ci => fold_case(s),
    }
}

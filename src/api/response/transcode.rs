//! Post-serialization key renaming.
//!
//! Works on the serialized text rather than on typed values, so nested maps,
//! vectors and `serde_json::Value` payloads are all handled the same way.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

use super::naming::{NamingConvention, TranscodeError};

static KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(\w+)":"#).expect("valid key pattern"));

static WORD_BARRIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z_0-9])([A-Z])").expect("valid word barrier pattern"));

/// Keys this short are left as-is.
const MAX_UNTOUCHED_KEY_LEN: usize = 2;

/// `OrderNo` -> `order_no`
pub fn to_snake_key(key: &str) -> String {
    WORD_BARRIER.replace_all(key, "${1}_${2}").to_lowercase()
}

/// `OrderNo` -> `orderNo`. The first character is never uppercased.
pub fn to_camel_key(key: &str) -> String {
    let snake = to_snake_key(key);
    let mut out = String::with_capacity(snake.len());
    let mut upper_next = false;

    for (i, c) in snake.chars().enumerate() {
        if i == 0 {
            out.push(c);
        } else if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Rewrites every object key in `json` to `convention`.
pub fn transcode(json: &str, convention: NamingConvention) -> Cow<'_, str> {
    let convert: fn(&str) -> String = match convention {
        NamingConvention::PascalCase => return Cow::Borrowed(json),
        NamingConvention::SnakeCase => to_snake_key,
        NamingConvention::CamelCase => to_camel_key,
    };

    KEY_PATTERN.replace_all(json, |caps: &Captures| {
        let key = &caps[1];
        if key.chars().count() <= MAX_UNTOUCHED_KEY_LEN {
            caps[0].to_string()
        } else {
            format!("\"{}\":", convert(key))
        }
    })
}

/// Serializes `value` and transcodes its keys.
pub fn to_json<T: Serialize + ?Sized>(
    value: &T,
    convention: NamingConvention,
) -> Result<String, TranscodeError> {
    let raw = serde_json::to_string(value)?;
    Ok(transcode(&raw, convention).into_owned())
}

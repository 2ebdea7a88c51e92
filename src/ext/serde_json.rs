// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Nested and fallback-chain field access on exported table rows, plus lenient numeric coercion
// role: extension/serde_json
// outputs: JsonFetch trait, JsonFetched wrapper, truthiness and lenient-number helpers
// invariants: No panics; missing paths yield None; a fallback chain stops at the first truthy value
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

static LEADING_NUMBER_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^\s*[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("leading number pattern"));

/// Wrapper around a JSON location to allow typed extraction via a clear second step.
pub struct JsonFetched<'a> {
  inner: Option<&'a Value>,
}

impl<'a> JsonFetched<'a> {
  pub fn to<T>(&self) -> Option<T>
  where
    T: DeserializeOwned,
  {
    self.inner.and_then(|v| serde_json::from_value::<T>(v.clone()).ok())
  }

  pub fn to_or_default<T>(&self) -> T
  where
    T: DeserializeOwned + Default,
  {
    self.to::<T>().unwrap_or_default()
  }

  /// Present and not JSON null.
  pub fn is_present(&self) -> bool {
    self.inner.is_some_and(|v| !v.is_null())
  }

  pub fn is_truthy(&self) -> bool {
    self.inner.is_some_and(is_truthy)
  }

  pub fn value(&self) -> Option<&'a Value> {
    self.inner
  }

  /// Lenient number: see [`to_f64_lenient`].
  pub fn to_f64(&self) -> Option<f64> {
    self.inner.and_then(to_f64_lenient)
  }

  /// Trimmed, non-empty string content.
  pub fn to_text(&self) -> Option<String> {
    match self.inner? {
      Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
      Value::Number(n) => Some(n.to_string()),
      _ => None,
    }
  }
}

/// Extension to fetch nested values via dotted paths like "fields.Employee Name".
pub trait JsonFetch {
  fn fetch(&self, path: &str) -> JsonFetched<'_>;

  /// First truthy value among `keys`, in order; null, false, 0 and blank strings fall through.
  fn fetch_first(&self, keys: &[&str]) -> JsonFetched<'_>;
}

impl JsonFetch for Value {
  fn fetch(&self, path: &str) -> JsonFetched<'_> {
    if path.is_empty() {
      return JsonFetched { inner: Some(self) };
    }

    let mut cur = self;

    for key in path.split('.') {
      match cur.get(key) {
        Some(next) => cur = next,
        None => return JsonFetched { inner: None },
      }
    }

    JsonFetched { inner: Some(cur) }
  }

  fn fetch_first(&self, keys: &[&str]) -> JsonFetched<'_> {
    let inner = keys.iter().filter_map(|k| self.get(*k)).find(|v| is_truthy(v));
    JsonFetched { inner }
  }
}

pub fn is_truthy(v: &Value) -> bool {
  match v {
    Value::Null => false,
    Value::Bool(b) => *b,
    Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
    Value::String(s) => !s.trim().is_empty(),
    Value::Array(_) | Value::Object(_) => true,
  }
}

/// JSON numbers as-is; strings by their leading numeric prefix (`"12.5h"` is 12.5).
/// Anything else, or a non-finite result, is None.
pub fn to_f64_lenient(v: &Value) -> Option<f64> {
  let f = match v {
    Value::Number(n) => n.as_f64()?,
    Value::String(s) => LEADING_NUMBER_RE.find(s)?.as_str().trim().parse::<f64>().ok()?,
    _ => return None,
  };
  f.is_finite().then_some(f)
}

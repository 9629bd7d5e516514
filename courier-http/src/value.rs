//! Parameter and upload values.
//!
//! Parameters are a closed set of scalar and list shapes. Every encoding
//! turns them into strings the same way, so a value serializes identically
//! whether it ends up in a form body, a query string or a multipart field.

use bytes::Bytes;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::RequestError;

/// A request parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// A single string.
    String(String),
    /// A single integer.
    Int(i64),
    /// A single float.
    Float(f64),
    /// A list of strings, one entry per element.
    StringList(Vec<String>),
    /// A list of integers, one entry per element.
    IntList(Vec<i64>),
    /// A list of floats, one entry per element.
    FloatList(Vec<f64>),
}

impl ParamValue {
    /// Whether this value expands to several entries.
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            Self::StringList(_) | Self::IntList(_) | Self::FloatList(_)
        )
    }

    /// The wire form of a scalar value, `None` for lists.
    pub fn scalar(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(format_float(*f)),
            _ => None,
        }
    }

    /// The wire form of every entry, in input order. Scalars yield one entry.
    pub fn to_strings(&self) -> Vec<String> {
        match self {
            Self::String(s) => vec![s.clone()],
            Self::Int(i) => vec![i.to_string()],
            Self::Float(f) => vec![format_float(*f)],
            Self::StringList(list) => list.clone(),
            Self::IntList(list) => list.iter().map(i64::to_string).collect(),
            Self::FloatList(list) => list.iter().copied().map(format_float).collect(),
        }
    }
}

/// Format a float as the shortest string that parses back to the same value.
///
/// Plain decimal is used while the decimal exponent is in `-4..6`; outside
/// that range the result switches to exponent form with a signed, two-digit
/// minimum exponent (`1e+06`, `2.5e-07`).
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }

    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return value.to_string();
    };

    if (-4..6).contains(&exponent) {
        value.to_string()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        Self::StringList(value)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(value: Vec<&str>) -> Self {
        Self::StringList(value.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<i64>> for ParamValue {
    fn from(value: Vec<i64>) -> Self {
        Self::IntList(value)
    }
}

impl From<Vec<i32>> for ParamValue {
    fn from(value: Vec<i32>) -> Self {
        Self::IntList(value.into_iter().map(i64::from).collect())
    }
}

impl From<Vec<f64>> for ParamValue {
    fn from(value: Vec<f64>) -> Self {
        Self::FloatList(value)
    }
}

impl TryFrom<Value> for ParamValue {
    type Error = RequestError;

    /// Convert untyped JSON data. Booleans, nulls, objects and arrays that
    /// mix strings with numbers are rejected with [`RequestError::BadParams`].
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(Self::String(s)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Self::Int(i)),
                None => n.as_f64().map(Self::Float).ok_or(RequestError::BadParams),
            },
            Value::Array(items) => list_from_json(items),
            Value::Bool(_) | Value::Null | Value::Object(_) => Err(RequestError::BadParams),
        }
    }
}

fn list_from_json(items: Vec<Value>) -> Result<ParamValue, RequestError> {
    if items.iter().all(Value::is_string) {
        let strings = items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect();
        return Ok(ParamValue::StringList(strings));
    }

    if items.iter().all(Value::is_i64) {
        return Ok(ParamValue::IntList(
            items.iter().filter_map(Value::as_i64).collect(),
        ));
    }

    if items.iter().all(Value::is_number) {
        return Ok(ParamValue::FloatList(
            items.iter().filter_map(Value::as_f64).collect(),
        ));
    }

    Err(RequestError::BadParams)
}

/// An upload source for a multipart request.
#[derive(Debug, Clone, PartialEq)]
pub enum FileSource {
    /// A file on disk, uploaded under its base name.
    Path(PathBuf),
    /// Several files on disk, one part per path.
    Paths(Vec<PathBuf>),
    /// In-memory content, uploaded with the field name as filename.
    Bytes(Bytes),
}

impl From<PathBuf> for FileSource {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

impl From<&Path> for FileSource {
    fn from(value: &Path) -> Self {
        Self::Path(value.to_path_buf())
    }
}

impl From<&str> for FileSource {
    fn from(value: &str) -> Self {
        Self::Path(PathBuf::from(value))
    }
}

impl From<String> for FileSource {
    fn from(value: String) -> Self {
        Self::Path(PathBuf::from(value))
    }
}

impl From<Vec<PathBuf>> for FileSource {
    fn from(value: Vec<PathBuf>) -> Self {
        Self::Paths(value)
    }
}

impl From<Vec<&str>> for FileSource {
    fn from(value: Vec<&str>) -> Self {
        Self::Paths(value.into_iter().map(PathBuf::from).collect())
    }
}

impl From<Vec<String>> for FileSource {
    fn from(value: Vec<String>) -> Self {
        Self::Paths(value.into_iter().map(PathBuf::from).collect())
    }
}

impl From<Bytes> for FileSource {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

impl From<Vec<u8>> for FileSource {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(value))
    }
}

impl From<&[u8]> for FileSource {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(Bytes::copy_from_slice(value))
    }
}

impl TryFrom<Value> for FileSource {
    type Error = RequestError;

    /// A string is a path, an array of strings is a list of paths; anything
    /// else is rejected with [`RequestError::BadFiles`].
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(path) => Ok(Self::Path(PathBuf::from(path))),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(path) => Ok(PathBuf::from(path)),
                    _ => Err(RequestError::BadFiles),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Paths),
            _ => Err(RequestError::BadFiles),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_float_plain_range() {
        assert_eq!(format_float(3.25), "3.25");
        assert_eq!(format_float(0.1), "0.1");
        assert_eq!(format_float(100000.0), "100000");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(2.0), "2");
        assert_eq!(format_float(-0.5), "-0.5");
        assert_eq!(format_float(0.0), "0");
    }

    #[test]
    fn test_format_float_exponent_range() {
        assert_eq!(format_float(1_000_000.0), "1e+06");
        assert_eq!(format_float(1_234_567.0), "1.234567e+06");
        assert_eq!(format_float(0.00001), "1e-05");
        assert_eq!(format_float(2.5e-7), "2.5e-07");
        assert_eq!(format_float(1e100), "1e+100");
        assert_eq!(format_float(-3e21), "-3e+21");
    }

    #[test]
    fn test_format_float_special_values() {
        assert_eq!(format_float(f64::NAN), "NaN");
        assert_eq!(format_float(f64::INFINITY), "+Inf");
        assert_eq!(format_float(f64::NEG_INFINITY), "-Inf");
    }

    #[test]
    fn test_format_float_round_trips() {
        for value in [0.1 + 0.2, 1.0 / 3.0, 123456.789, 9.999e-5, 6.02214076e23] {
            let parsed: f64 = format_float(value).parse().unwrap();
            assert_eq!(parsed, value);
        }
    }

    #[test]
    fn test_list_expansion_preserves_order() {
        let value = ParamValue::from(vec![3, 1, 2]);
        assert!(value.is_list());
        assert_eq!(value.scalar(), None);
        assert_eq!(value.to_strings(), vec!["3", "1", "2"]);

        let value = ParamValue::from(vec![1.5, 2e6]);
        assert_eq!(value.to_strings(), vec!["1.5", "2e+06"]);
    }

    #[test]
    fn test_scalar_forms() {
        assert_eq!(ParamValue::from("x").scalar().as_deref(), Some("x"));
        assert_eq!(ParamValue::from(2341).scalar().as_deref(), Some("2341"));
        assert_eq!(ParamValue::from(0.5).scalar().as_deref(), Some("0.5"));
    }

    #[test]
    fn test_param_from_json() {
        assert_eq!(
            ParamValue::try_from(json!("a")).unwrap(),
            ParamValue::String("a".into())
        );
        assert_eq!(ParamValue::try_from(json!(7)).unwrap(), ParamValue::Int(7));
        assert_eq!(
            ParamValue::try_from(json!(7.5)).unwrap(),
            ParamValue::Float(7.5)
        );
        assert_eq!(
            ParamValue::try_from(json!(["a", "b"])).unwrap(),
            ParamValue::StringList(vec!["a".into(), "b".into()])
        );
        assert_eq!(
            ParamValue::try_from(json!([1, 2])).unwrap(),
            ParamValue::IntList(vec![1, 2])
        );
        assert_eq!(
            ParamValue::try_from(json!([1, 2.5])).unwrap(),
            ParamValue::FloatList(vec![1.0, 2.5])
        );
    }

    #[test]
    fn test_param_from_json_rejects_unsupported_shapes() {
        for value in [json!(true), json!(null), json!({"a": 1}), json!(["a", 1])] {
            assert!(matches!(
                ParamValue::try_from(value),
                Err(RequestError::BadParams)
            ));
        }
    }

    #[test]
    fn test_file_source_from_json() {
        assert_eq!(
            FileSource::try_from(json!("dir/a.png")).unwrap(),
            FileSource::Path(PathBuf::from("dir/a.png"))
        );
        assert_eq!(
            FileSource::try_from(json!(["a.png", "b.png"])).unwrap(),
            FileSource::Paths(vec![PathBuf::from("a.png"), PathBuf::from("b.png")])
        );
        for value in [json!(false), json!(3), json!(["a.png", 3])] {
            assert!(matches!(
                FileSource::try_from(value),
                Err(RequestError::BadFiles)
            ));
        }
    }
}

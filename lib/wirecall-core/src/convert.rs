//! Typed value to wire string conversion.
//!
//! Every field that ends up in a cookie, header, query parameter or path
//! segment goes through [`convert`]. Fields expose themselves as a
//! [`WireValue`] through the [`ToWireValue`] trait; the converter then renders
//! that value with fixed rules per kind:
//!
//! | Kind | Rendering |
//! |------|-----------|
//! | absent (`None`, at any depth) | no value |
//! | integers | base 10 |
//! | floats | shortest round-trip decimal, no exponent, `+Inf` / `-Inf` / `NaN` |
//! | complex | `(1+2i)` |
//! | bool | `true` / `false` |
//! | strings | as is |
//! | sequences | elements joined with `,`, absent elements skipped |
//! | records | JSON, or `{ "error": "JSON parse error" }` |
//! | anything else | `?` |

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::JsonBody;

/// Placeholder rendered when a record cannot be serialized.
pub const JSON_ERROR_SENTINEL: &str = r#"{ "error": "JSON parse error" }"#;

/// Placeholder rendered for kinds with no wire representation.
pub const UNSUPPORTED_SENTINEL: &str = "?";

/// Query component escaping: unreserved characters are kept, everything else is percent-encoded.
const QUERY_ESCAPE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

// ============================================================================
// Wire Value
// ============================================================================

/// A field value, classified by kind, ready to be rendered as a string.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue<'a> {
    /// No value (`None`).
    Absent,
    /// Text.
    Str(Cow<'a, str>),
    /// Signed integer of any width.
    Int(i128),
    /// Unsigned integer of any width.
    Uint(u128),
    /// Single-precision float.
    F32(f32),
    /// Double-precision float.
    F64(f64),
    /// Single-precision complex number.
    Complex64(Complex<f32>),
    /// Double-precision complex number.
    Complex128(Complex<f64>),
    /// Boolean.
    Bool(bool),
    /// Ordered sequence of values.
    Seq(Vec<WireValue<'a>>),
    /// A record serialized to JSON, `None` when serialization failed.
    Record(Option<String>),
    /// A kind with no wire representation (maps, unit).
    Unsupported,
}

impl WireValue<'_> {
    /// Serialize a record to its JSON rendering.
    #[must_use]
    pub fn record(value: &dyn JsonBody) -> Self {
        let json = value
            .to_json_bytes()
            .ok()
            .and_then(|bytes| String::from_utf8(bytes.to_vec()).ok());
        WireValue::Record(json)
    }

    /// Returns `true` for [`WireValue::Absent`].
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// A complex number, rendered as `(re+imi)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Complex<T> {
    /// Real part.
    pub re: T,
    /// Imaginary part.
    pub im: T,
}

impl<T> Complex<T> {
    /// Creates a complex number from its parts.
    #[must_use]
    pub const fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
}

// ============================================================================
// ToWireValue
// ============================================================================

/// Conversion of a field into a [`WireValue`].
///
/// Implemented for primitives, strings, smart pointers, `Option` and
/// sequences. Records use [`WireValue::record`] instead (the `json` field flag
/// in derived code).
pub trait ToWireValue {
    /// Classify this value.
    fn to_wire_value(&self) -> WireValue<'_>;
}

macro_rules! impl_wire_int {
    ($variant:ident => $($ty:ty),+) => {
        $(
            impl ToWireValue for $ty {
                fn to_wire_value(&self) -> WireValue<'_> {
                    WireValue::$variant((*self).into())
                }
            }
        )+
    };
}

impl_wire_int!(Int => i8, i16, i32, i64, i128);
impl_wire_int!(Uint => u8, u16, u32, u64, u128);

impl ToWireValue for isize {
    fn to_wire_value(&self) -> WireValue<'_> {
        WireValue::Int(*self as i128)
    }
}

impl ToWireValue for usize {
    fn to_wire_value(&self) -> WireValue<'_> {
        WireValue::Uint(*self as u128)
    }
}

impl ToWireValue for f32 {
    fn to_wire_value(&self) -> WireValue<'_> {
        WireValue::F32(*self)
    }
}

impl ToWireValue for f64 {
    fn to_wire_value(&self) -> WireValue<'_> {
        WireValue::F64(*self)
    }
}

impl ToWireValue for Complex<f32> {
    fn to_wire_value(&self) -> WireValue<'_> {
        WireValue::Complex64(*self)
    }
}

impl ToWireValue for Complex<f64> {
    fn to_wire_value(&self) -> WireValue<'_> {
        WireValue::Complex128(*self)
    }
}

impl ToWireValue for bool {
    fn to_wire_value(&self) -> WireValue<'_> {
        WireValue::Bool(*self)
    }
}

impl ToWireValue for str {
    fn to_wire_value(&self) -> WireValue<'_> {
        WireValue::Str(Cow::Borrowed(self))
    }
}

impl ToWireValue for String {
    fn to_wire_value(&self) -> WireValue<'_> {
        WireValue::Str(Cow::Borrowed(self.as_str()))
    }
}

impl ToWireValue for Cow<'_, str> {
    fn to_wire_value(&self) -> WireValue<'_> {
        WireValue::Str(Cow::Borrowed(self.as_ref()))
    }
}

impl ToWireValue for char {
    fn to_wire_value(&self) -> WireValue<'_> {
        WireValue::Str(Cow::Owned(self.to_string()))
    }
}

impl<T: ToWireValue> ToWireValue for Option<T> {
    fn to_wire_value(&self) -> WireValue<'_> {
        self.as_ref().map_or(WireValue::Absent, ToWireValue::to_wire_value)
    }
}

impl<T: ToWireValue + ?Sized> ToWireValue for &T {
    fn to_wire_value(&self) -> WireValue<'_> {
        (**self).to_wire_value()
    }
}

impl<T: ToWireValue + ?Sized> ToWireValue for Box<T> {
    fn to_wire_value(&self) -> WireValue<'_> {
        (**self).to_wire_value()
    }
}

impl<T: ToWireValue + ?Sized> ToWireValue for Rc<T> {
    fn to_wire_value(&self) -> WireValue<'_> {
        (**self).to_wire_value()
    }
}

impl<T: ToWireValue + ?Sized> ToWireValue for Arc<T> {
    fn to_wire_value(&self) -> WireValue<'_> {
        (**self).to_wire_value()
    }
}

impl<T: ToWireValue> ToWireValue for [T] {
    fn to_wire_value(&self) -> WireValue<'_> {
        WireValue::Seq(self.iter().map(ToWireValue::to_wire_value).collect())
    }
}

impl<T: ToWireValue, const N: usize> ToWireValue for [T; N] {
    fn to_wire_value(&self) -> WireValue<'_> {
        self.as_slice().to_wire_value()
    }
}

impl<T: ToWireValue> ToWireValue for Vec<T> {
    fn to_wire_value(&self) -> WireValue<'_> {
        self.as_slice().to_wire_value()
    }
}

impl<T: ToWireValue> ToWireValue for VecDeque<T> {
    fn to_wire_value(&self) -> WireValue<'_> {
        WireValue::Seq(self.iter().map(ToWireValue::to_wire_value).collect())
    }
}

impl<K, V, S> ToWireValue for HashMap<K, V, S> {
    fn to_wire_value(&self) -> WireValue<'_> {
        WireValue::Unsupported
    }
}

impl<K, V> ToWireValue for BTreeMap<K, V> {
    fn to_wire_value(&self) -> WireValue<'_> {
        WireValue::Unsupported
    }
}

impl ToWireValue for () {
    fn to_wire_value(&self) -> WireValue<'_> {
        WireValue::Unsupported
    }
}

impl ToWireValue for serde_json::Value {
    fn to_wire_value(&self) -> WireValue<'_> {
        match self {
            Self::Null => WireValue::Absent,
            Self::Bool(value) => WireValue::Bool(*value),
            Self::Number(number) => WireValue::Str(Cow::Owned(number.to_string())),
            Self::String(text) => WireValue::Str(Cow::Borrowed(text)),
            Self::Array(items) => {
                WireValue::Seq(items.iter().map(ToWireValue::to_wire_value).collect())
            }
            Self::Object(_) => WireValue::record(self),
        }
    }
}

// ============================================================================
// Conversion
// ============================================================================

/// Render a value as a wire string.
///
/// Returns `None` when the value is absent. With `url_encode`, scalars are
/// query-escaped; sequence elements are escaped once when converted and once
/// more when joined, and the joined string is left as is.
///
/// # Example
///
/// ```
/// use wirecall_core::{ToWireValue, convert};
///
/// assert_eq!(convert(&42_u8.to_wire_value(), false).as_deref(), Some("42"));
/// assert_eq!(convert(&Some("a b").to_wire_value(), true).as_deref(), Some("a+b"));
/// assert_eq!(convert(&None::<i32>.to_wire_value(), false), None);
/// ```
#[must_use]
pub fn convert(value: &WireValue<'_>, url_encode: bool) -> Option<String> {
    let text = match value {
        WireValue::Absent => return None,
        WireValue::Seq(items) => return Some(convert_sequence(items, url_encode)),
        WireValue::Str(text) => text.to_string(),
        WireValue::Int(value) => value.to_string(),
        WireValue::Uint(value) => value.to_string(),
        WireValue::F32(value) => format_f32(*value),
        WireValue::F64(value) => format_f64(*value),
        WireValue::Complex64(value) => format_complex(format_f32(value.re), format_f32(value.im)),
        WireValue::Complex128(value) => {
            format_complex(format_f64(value.re), format_f64(value.im))
        }
        WireValue::Bool(value) => value.to_string(),
        WireValue::Record(json) => json
            .clone()
            .unwrap_or_else(|| JSON_ERROR_SENTINEL.to_string()),
        WireValue::Unsupported => UNSUPPORTED_SENTINEL.to_string(),
    };

    Some(if url_encode { query_escape(&text) } else { text })
}

fn convert_sequence(items: &[WireValue<'_>], url_encode: bool) -> String {
    items
        .iter()
        .filter_map(|item| convert(item, url_encode))
        .map(|text| if url_encode { query_escape(&text) } else { text })
        .collect::<Vec<_>>()
        .join(",")
}

/// Escape a string for use in a query component; spaces become `+`.
#[must_use]
pub fn query_escape(value: &str) -> String {
    value
        .split(' ')
        .map(|chunk| utf8_percent_encode(chunk, QUERY_ESCAPE_SET).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

macro_rules! format_float {
    ($name:ident, $ty:ty) => {
        fn $name(value: $ty) -> String {
            if value.is_nan() {
                "NaN".to_string()
            } else if value.is_infinite() {
                let sign = if value.is_sign_positive() { '+' } else { '-' };
                format!("{sign}Inf")
            } else {
                // Display is the shortest round-trip form and never uses exponents
                value.to_string()
            }
        }
    };
}

format_float!(format_f32, f32);
format_float!(format_f64, f64);

fn format_complex(re: String, im: String) -> String {
    let sign = if im.starts_with(['+', '-']) { "" } else { "+" };
    format!("({re}{sign}{im}i)")
}

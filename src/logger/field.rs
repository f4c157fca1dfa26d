use {
    opentelemetry::{Key, logs::AnyValue},
    serde_json::{Map, Value},
    std::{borrow::Cow, fmt, time::Duration},
};

/// A structured key/value pair attached to a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    key: Cow<'static, str>,
    value: FieldValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    Duration(Duration),
    Error(String),
}

impl Field {
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<FieldValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    ///
    /// An `error` field holding the rendered error chain.
    ///
    /// A cause is skipped when the text rendered so far already ends with
    /// it, which is the case for wrappers whose `Display` prints their
    /// source.
    ///
    pub fn error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut text = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            let rendered = cause.to_string();
            if !text.ends_with(&rendered) {
                text.push_str(": ");
                text.push_str(&rendered);
            }
            source = cause.source();
        }
        Self::new("error", FieldValue::Error(text))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub(crate) fn otel_key(&self) -> Key {
        Key::from(self.key.clone())
    }
}

impl FieldValue {
    /// JSON value written on stdout. Durations use humantime notation and
    /// non-finite floats become `null`.
    pub(crate) fn to_json(&self) -> Value {
        match self {
            FieldValue::Str(s) | FieldValue::Error(s) => Value::from(s.as_str()),
            FieldValue::I64(v) => Value::from(*v),
            FieldValue::U64(v) => Value::from(*v),
            FieldValue::F64(v) => Value::from(*v),
            FieldValue::Bool(v) => Value::from(*v),
            FieldValue::Duration(d) => Value::from(humantime::format_duration(*d).to_string()),
        }
    }

    /// Typed attribute value sent to the collector. Unsigned values too
    /// large for an OTLP integer are sent as text.
    pub(crate) fn to_any_value(&self) -> AnyValue {
        match self {
            FieldValue::Str(s) | FieldValue::Error(s) => AnyValue::from(s.clone()),
            FieldValue::I64(v) => AnyValue::Int(*v),
            FieldValue::U64(v) => match i64::try_from(*v) {
                Ok(v) => AnyValue::Int(v),
                Err(_) => AnyValue::from(v.to_string()),
            },
            FieldValue::F64(v) => AnyValue::Double(*v),
            FieldValue::Bool(v) => AnyValue::Boolean(*v),
            FieldValue::Duration(d) => AnyValue::from(humantime::format_duration(*d).to_string()),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) | FieldValue::Error(s) => write!(f, "{s:?}"),
            FieldValue::I64(v) => write!(f, "{v}"),
            FieldValue::U64(v) => write!(f, "{v}"),
            FieldValue::F64(v) => write!(f, "{v}"),
            FieldValue::Bool(v) => write!(f, "{v}"),
            FieldValue::Duration(d) => write!(f, "{}", humantime::format_duration(*d)),
        }
    }
}

macro_rules! field_value_from {
    ($variant:ident: $($ty:ty),+) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(v: $ty) -> Self {
                    FieldValue::$variant(v.into())
                }
            }
        )+
    };
}

field_value_from!(I64: i64, i32, i16, i8);
field_value_from!(U64: u64, u32, u16, u8);
field_value_from!(F64: f64, f32);
field_value_from!(Bool: bool);
field_value_from!(Duration: Duration);
field_value_from!(Str: String, &str);

impl From<usize> for FieldValue {
    fn from(v: usize) -> Self {
        FieldValue::U64(v as u64)
    }
}

/// The logger's accumulated fields followed by the call's own fields.
pub(crate) struct FieldList<'a> {
    pub(crate) context: &'a [Field],
    pub(crate) call: &'a [Field],
}

impl<'a> FieldList<'a> {
    pub(crate) fn is_empty(&self) -> bool {
        self.context.is_empty() && self.call.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &'a Field> + use<'a> {
        let (context, call) = (self.context, self.call);
        context.iter().chain(call)
    }

    ///
    /// Renders the list as a JSON object, one key per field, for the stdout
    /// formatters to splice into the record. A key repeated in the call
    /// overrides the context value. `None` when there is nothing to render.
    ///
    pub(crate) fn to_json(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let object: Map<String, Value> = self
            .iter()
            .map(|field| (field.key().to_string(), field.value().to_json()))
            .collect();
        Some(Value::Object(object).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_rendering() {
        assert_eq!(Field::new("user", "ada").to_string(), r#"user="ada""#);
        assert_eq!(Field::new("attempt", 3).to_string(), "attempt=3");
        assert_eq!(Field::new("bytes", 42usize).to_string(), "bytes=42");
        assert_eq!(Field::new("ok", true).to_string(), "ok=true");
        assert_eq!(
            Field::new("elapsed", Duration::from_millis(1500)).to_string(),
            "elapsed=1s 500ms"
        );
    }

    #[test]
    fn test_error_field_renders_wrapped_source_once() {
        let io = std::io::Error::other("disk full");
        let err = crate::Error::new(crate::ErrorKind::Io, io);
        let field = Field::error(&err);
        assert_eq!(field.key(), "error");
        assert_eq!(field.value(), &FieldValue::Error("disk full".into()));
    }

    #[test]
    fn test_error_field_joins_distinct_causes() {
        #[derive(Debug, thiserror::Error)]
        #[error("export failed")]
        struct ExportFailed(#[source] std::io::Error);

        #[derive(Debug, thiserror::Error)]
        #[error("flush aborted: {0}")]
        struct FlushAborted(#[source] std::io::Error);

        let err = ExportFailed(std::io::Error::other("connection reset"));
        assert_eq!(
            Field::error(&err).value(),
            &FieldValue::Error("export failed: connection reset".into())
        );

        let err = FlushAborted(std::io::Error::other("queue closed"));
        assert_eq!(
            Field::error(&err).value(),
            &FieldValue::Error("flush aborted: queue closed".into())
        );
    }

    #[test]
    fn test_field_list_renders_one_key_per_field() {
        let context = [Field::new("request_id", "r-1")];
        let call = [
            Field::new("status", 200u16),
            Field::new("cached", false),
            Field::new("elapsed", Duration::from_millis(1500)),
        ];
        let list = FieldList {
            context: &context,
            call: &call,
        };
        assert!(!list.is_empty());
        assert_eq!(list.iter().count(), 4);
        assert_eq!(
            list.to_json().unwrap(),
            r#"{"request_id":"r-1","status":200,"cached":false,"elapsed":"1s 500ms"}"#
        );
    }

    #[test]
    fn test_empty_field_list() {
        let list = FieldList {
            context: &[],
            call: &[],
        };
        assert!(list.is_empty());
        assert_eq!(list.to_json(), None);
    }

    #[test]
    fn test_attribute_values_keep_their_type() {
        assert_eq!(FieldValue::from(3).to_any_value(), AnyValue::Int(3));
        assert_eq!(FieldValue::from(true).to_any_value(), AnyValue::Boolean(true));
        assert_eq!(FieldValue::from(0.5).to_any_value(), AnyValue::Double(0.5));
        assert_eq!(
            FieldValue::from(u64::MAX).to_any_value(),
            AnyValue::from(u64::MAX.to_string())
        );
        assert_eq!(FieldValue::from("a-7").to_any_value(), AnyValue::from("a-7".to_string()));
    }
}

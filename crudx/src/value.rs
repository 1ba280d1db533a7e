/// A type-erased SQL bind parameter.
///
/// Operations take their positional arguments as `&[Value]` so a single
/// generic function can serve any entity type. The [`args!`](crate::args)
/// macro builds an argument list from mixed primitives:
///
/// ```ignore
/// let users = crud::select_list::<User>("", "age > ? AND name != ?", &args![18, "root"]).await?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Whether this is the zero value of its variant.
    ///
    /// Partial updates skip zero-valued fields (see `updates`); the
    /// explicit-map form exists to overwrite a column with a zero value.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(v) => !*v,
            Value::Int(v) => *v == 0,
            Value::Float(v) => *v == 0.0,
            Value::Text(v) => v.is_empty(),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! value_from_int {
    ($($ty:ty),+) => {
        $(impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::Int(i64::from(value))
            }
        })+
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Lossy conversion from a JSON value.
///
/// Numbers outside the i64/f64 range and composite values (arrays,
/// objects) are stringified; callers wanting exact semantics convert
/// explicitly.
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(v) => Value::Bool(v),
            serde_json::Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Value::Int(v)
                } else if let Some(v) = n.as_f64() {
                    Value::Float(v)
                } else {
                    Value::Text(n.to_string())
                }
            }
            serde_json::Value::String(v) => Value::Text(v),
            other => Value::Text(other.to_string()),
        }
    }
}

/// Builds a `[Value; N]` argument list from mixed primitive values.
#[macro_export]
macro_rules! args {
    () => { [] };
    ($($value:expr),+ $(,)?) => { [$($crate::Value::from($value)),+] };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values() {
        assert!(Value::Null.is_zero());
        assert!(Value::Bool(false).is_zero());
        assert!(Value::Int(0).is_zero());
        assert!(Value::Float(0.0).is_zero());
        assert!(Value::Text(String::new()).is_zero());

        assert!(!Value::Bool(true).is_zero());
        assert!(!Value::Int(-1).is_zero());
        assert!(!Value::Float(0.5).is_zero());
        assert!(!Value::Text("x".into()).is_zero());
    }

    #[test]
    fn test_args_macro() {
        let args = args![1, "bob", 2.5, true, Option::<i64>::None];
        assert_eq!(
            args,
            [
                Value::Int(1),
                Value::Text("bob".into()),
                Value::Float(2.5),
                Value::Bool(true),
                Value::Null,
            ]
        );
        let empty: &[Value] = &args![];
        assert!(empty.is_empty());
    }

    #[test]
    fn test_from_json() {
        assert_eq!(Value::from(serde_json::json!(null)), Value::Null);
        assert_eq!(Value::from(serde_json::json!(7)), Value::Int(7));
        assert_eq!(Value::from(serde_json::json!(1.5)), Value::Float(1.5));
        assert_eq!(Value::from(serde_json::json!("a")), Value::Text("a".into()));
        assert_eq!(
            Value::from(serde_json::json!([1, 2])),
            Value::Text("[1,2]".into())
        );
    }
}

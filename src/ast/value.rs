//! Literal payloads carried by `Value` nodes.
//!
//! A [`Value`] is a tagged union over the builtin primitive kinds. Reading it
//! requires naming the kind you expect; asking for the wrong one is a
//! [`ValueError::WrongKind`], not a silent conversion.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Object,
    Type,
}

impl BuiltinKind {
    pub fn name(self) -> &'static str {
        match self {
            BuiltinKind::I8 => "i8",
            BuiltinKind::I16 => "i16",
            BuiltinKind::I32 => "i32",
            BuiltinKind::I64 => "i64",
            BuiltinKind::U8 => "u8",
            BuiltinKind::U16 => "u16",
            BuiltinKind::U32 => "u32",
            BuiltinKind::U64 => "u64",
            BuiltinKind::F32 => "f32",
            BuiltinKind::F64 => "f64",
            BuiltinKind::Object => "Object",
            BuiltinKind::Type => "Type",
        }
    }

    pub fn is_integer(self) -> bool {
        !matches!(
            self,
            BuiltinKind::F32 | BuiltinKind::F64 | BuiltinKind::Object | BuiltinKind::Type
        )
    }
}

impl fmt::Display for BuiltinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("wrong Value cast: holds `{found}`, read as `{expected}`")]
    WrongKind {
        expected: BuiltinKind,
        found: BuiltinKind,
    },
}

/// The payload of a `Value` node.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    /// A user-defined object, identified by its type name.
    Object(String),
    /// The type of types.
    Type,
}

impl Value {
    pub fn kind(&self) -> BuiltinKind {
        match self {
            Value::I8(_) => BuiltinKind::I8,
            Value::I16(_) => BuiltinKind::I16,
            Value::I32(_) => BuiltinKind::I32,
            Value::I64(_) => BuiltinKind::I64,
            Value::U8(_) => BuiltinKind::U8,
            Value::U16(_) => BuiltinKind::U16,
            Value::U32(_) => BuiltinKind::U32,
            Value::U64(_) => BuiltinKind::U64,
            Value::F32(_) => BuiltinKind::F32,
            Value::F64(_) => BuiltinKind::F64,
            Value::Object(_) => BuiltinKind::Object,
            Value::Type => BuiltinKind::Type,
        }
    }

    /// Read the payload as `T`, which must be exactly the stored kind.
    ///
    /// ```
    /// use fern_lang::ast::value::{Value, ValueError};
    ///
    /// let v = Value::F64(2.5);
    /// assert_eq!(v.get::<f64>(), Ok(2.5));
    /// assert!(matches!(v.get::<i64>(), Err(ValueError::WrongKind { .. })));
    /// ```
    pub fn get<T: ReadValue>(&self) -> Result<T, ValueError> {
        T::read(self)
    }

    /// Numeric payload widened to `f64`; `None` for objects and types.
    pub fn numeric(&self) -> Option<f64> {
        Some(match *self {
            Value::I8(v) => v as f64,
            Value::I16(v) => v as f64,
            Value::I32(v) => v as f64,
            Value::I64(v) => v as f64,
            Value::U8(v) => v as f64,
            Value::U16(v) => v as f64,
            Value::U32(v) => v as f64,
            Value::U64(v) => v as f64,
            Value::F32(v) => v as f64,
            Value::F64(v) => v,
            Value::Object(_) | Value::Type => return None,
        })
    }

    /// Sum of two numeric values.
    ///
    /// Two values of the same integer kind stay in that kind unless the sum
    /// overflows, two `f32` stay `f32`, every other mix widens to `f64`.
    pub fn add(&self, other: &Value) -> Option<Value> {
        macro_rules! same_int {
            ($($variant:ident),*) => {
                match (self, other) {
                    $(
                        (Value::$variant(a), Value::$variant(b)) => {
                            if let Some(sum) = a.checked_add(*b) {
                                return Some(Value::$variant(sum));
                            }
                        }
                    )*
                    _ => {}
                }
            };
        }
        same_int!(I8, I16, I32, I64, U8, U16, U32, U64);

        if let (Value::F32(a), Value::F32(b)) = (self, other) {
            return Some(Value::F32(a + b));
        }

        Some(Value::F64(self.numeric()? + other.numeric()?))
    }
}

/// Positional notation, never an exponent, always with a `.` so the text lexes
/// back as a float.
fn write_float(f: &mut fmt::Formatter<'_>, text: String) -> fmt::Result {
    if text.contains(|c: char| c.is_ascii_digit()) && !text.contains('.') {
        write!(f, "{text}.0")
    } else {
        f.write_str(&text)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::I8(v) => write!(f, "{v}"),
            Value::I16(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v}"),
            Value::U16(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::F32(v) => write_float(f, v.to_string()),
            Value::F64(v) => write_float(f, v.to_string()),
            Value::Object(name) => f.write_str(name),
            Value::Type => f.write_str("Type"),
        }
    }
}

/// Types that can be read out of a [`Value`].
pub trait ReadValue: Sized {
    const KIND: BuiltinKind;

    fn read(value: &Value) -> Result<Self, ValueError>;
}

macro_rules! read_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ReadValue for $ty {
                const KIND: BuiltinKind = BuiltinKind::$variant;

                fn read(value: &Value) -> Result<Self, ValueError> {
                    match value {
                        Value::$variant(v) => Ok(*v),
                        other => Err(ValueError::WrongKind {
                            expected: Self::KIND,
                            found: other.kind(),
                        }),
                    }
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

read_value! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_kind_read() {
        let v = Value::I64(3);
        assert_eq!(v.get::<i64>(), Ok(3));
        assert_eq!(
            v.get::<f64>(),
            Err(ValueError::WrongKind {
                expected: BuiltinKind::F64,
                found: BuiltinKind::I64,
            })
        );
    }

    #[test]
    fn test_add_keeps_integer_kind() {
        assert_eq!(Value::I64(2).add(&Value::I64(3)), Some(Value::I64(5)));
        assert_eq!(Value::I64(2).add(&Value::F64(0.5)), Some(Value::F64(2.5)));
        assert_eq!(Value::I8(127).add(&Value::I8(1)), Some(Value::F64(128.0)));
        assert_eq!(Value::Type.add(&Value::I64(1)), None);
    }

    #[test]
    fn test_display_keeps_float_marker() {
        assert_eq!(Value::F64(4.0).to_string(), "4.0");
        assert_eq!(Value::F64(2.5).to_string(), "2.5");
        assert_eq!(Value::I64(4).to_string(), "4");
        assert_eq!(Value::F64(1e17).to_string(), "100000000000000000.0");
        assert_eq!(Value::F64(0.00001).to_string(), "0.00001");
        assert_eq!(Value::F64(-3.0).to_string(), "-3.0");
        assert_eq!(Value::F32(0.5).to_string(), "0.5");
        assert_eq!(Value::Object("Point".to_string()).to_string(), "Point");
    }
}

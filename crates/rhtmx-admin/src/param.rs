// File: src/param.rs
// Purpose: Coercion of caller values into route parameter values

use crate::error::AdminUrlError;
use rhtmx_routing::Value;
use serde::ser::{self, Impossible, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Wraps a value so it is used as a route parameter through its `Display`
///
/// Structs are rejected as parameter values; this is the way to opt a type
/// into rendering as a single parameter.
///
/// # Examples
///
/// ```
/// use rhtmx_admin::param::{to_param_value, Stringify};
/// use rhtmx_admin::Value;
///
/// struct Slug(&'static str);
///
/// impl std::fmt::Display for Slug {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "post-{}", self.0)
///     }
/// }
///
/// let value = to_param_value("entityId", &Stringify(Slug("hello"))).unwrap();
/// assert_eq!(value, Value::from("post-hello"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stringify<T>(pub T);

impl<T: fmt::Display> Serialize for Stringify<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

/// Converts `value` into a route parameter value for the parameter `name`
///
/// Scalars, options, unit enum variants, newtypes, sequences and maps are
/// accepted. Structs and data-carrying enum variants are objects that do not
/// render as a single parameter, and raw bytes are not representable; both
/// fail with [`AdminUrlError::InvalidArgument`] naming the parameter.
pub fn to_param_value<T: Serialize + ?Sized>(name: &str, value: &T) -> Result<Value, AdminUrlError> {
    value
        .serialize(ParamSerializer)
        .map_err(|err| err.into_admin_error(name))
}

#[derive(Debug)]
pub(crate) enum CoercionError {
    Object(&'static str),
    Binary,
    MapKey,
    Custom(String),
}

impl CoercionError {
    fn into_admin_error(self, name: &str) -> AdminUrlError {
        let message = match self {
            CoercionError::Object(type_name) => format!(
                "The object passed as the value of the \"{}\" parameter ({}) must render as a single route parameter; wrap it in `Stringify` to use its `Display` output.",
                name, type_name
            ),
            CoercionError::Binary => format!(
                "The value of the \"{}\" parameter is raw binary data, which is not supported as a route parameter.",
                name
            ),
            CoercionError::MapKey => format!(
                "The keys of the map passed as the value of the \"{}\" parameter must be strings, numbers or booleans.",
                name
            ),
            CoercionError::Custom(msg) => format!(
                "The value of the \"{}\" parameter cannot be used as a route parameter: {}",
                name, msg
            ),
        };
        AdminUrlError::InvalidArgument(message)
    }
}

impl fmt::Display for CoercionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercionError::Object(type_name) => write!(f, "{} is not a route parameter value", type_name),
            CoercionError::Binary => f.write_str("binary data is not a route parameter value"),
            CoercionError::MapKey => f.write_str("map keys must be scalars"),
            CoercionError::Custom(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for CoercionError {}

impl ser::Error for CoercionError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        CoercionError::Custom(msg.to_string())
    }
}

struct ParamSerializer;

impl Serializer for ParamSerializer {
    type Ok = Value;
    type Error = CoercionError;

    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = Impossible<Value, CoercionError>;
    type SerializeTupleVariant = Impossible<Value, CoercionError>;
    type SerializeMap = MapBuilder;
    type SerializeStruct = Impossible<Value, CoercionError>;
    type SerializeStructVariant = Impossible<Value, CoercionError>;

    fn serialize_bool(self, v: bool) -> Result<Value, CoercionError> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, CoercionError> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, CoercionError> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, CoercionError> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, CoercionError> {
        Ok(Value::Int(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value, CoercionError> {
        Ok(i64::try_from(v)
            .map(Value::Int)
            .unwrap_or_else(|_| Value::String(v.to_string())))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, CoercionError> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, CoercionError> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, CoercionError> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<Value, CoercionError> {
        Ok(i64::try_from(v)
            .map(Value::Int)
            .unwrap_or_else(|_| Value::String(v.to_string())))
    }

    fn serialize_u128(self, v: u128) -> Result<Value, CoercionError> {
        Ok(i64::try_from(v)
            .map(Value::Int)
            .unwrap_or_else(|_| Value::String(v.to_string())))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, CoercionError> {
        // widening keeps binary noise (0.1f32 -> 0.10000000149011612)
        let shortest = v.to_string().parse().unwrap_or_else(|_| f64::from(v));
        Ok(Value::Float(shortest))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, CoercionError> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, CoercionError> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, CoercionError> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Value, CoercionError> {
        Err(CoercionError::Binary)
    }

    fn serialize_none(self) -> Result<Value, CoercionError> {
        Ok(Value::Null)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Value, CoercionError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, CoercionError> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Value, CoercionError> {
        Err(CoercionError::Object(name))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, CoercionError> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, CoercionError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Value, CoercionError> {
        Err(CoercionError::Object(name))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqBuilder, CoercionError> {
        Ok(SeqBuilder {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqBuilder, CoercionError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, CoercionError> {
        Err(CoercionError::Object(name))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, CoercionError> {
        Err(CoercionError::Object(name))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MapBuilder, CoercionError> {
        Ok(MapBuilder {
            map: BTreeMap::new(),
            pending_key: None,
        })
    }

    fn serialize_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, CoercionError> {
        Err(CoercionError::Object(name))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, CoercionError> {
        Err(CoercionError::Object(name))
    }
}

struct SeqBuilder {
    items: Vec<Value>,
}

impl ser::SerializeSeq for SeqBuilder {
    type Ok = Value;
    type Error = CoercionError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CoercionError> {
        self.items.push(value.serialize(ParamSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, CoercionError> {
        Ok(Value::List(self.items))
    }
}

impl ser::SerializeTuple for SeqBuilder {
    type Ok = Value;
    type Error = CoercionError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CoercionError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, CoercionError> {
        ser::SerializeSeq::end(self)
    }
}

struct MapBuilder {
    map: BTreeMap<String, Value>,
    pending_key: Option<String>,
}

impl ser::SerializeMap for MapBuilder {
    type Ok = Value;
    type Error = CoercionError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), CoercionError> {
        let key = match key.serialize(ParamSerializer)? {
            Value::String(s) => s,
            scalar if scalar.is_scalar() && !scalar.is_null() => {
                scalar.to_query_string().unwrap_or_default()
            }
            _ => return Err(CoercionError::MapKey),
        };
        self.pending_key = Some(key);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CoercionError> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| CoercionError::Custom("map value without a key".to_string()))?;
        self.map.insert(key, value.serialize(ParamSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, CoercionError> {
        Ok(Value::Map(self.map))
    }
}

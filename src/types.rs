//! YANG scalar types, value containers and type-directed coercion

use std::fmt;
use std::str::FromStr;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{Result, YangError};

/// Resolves a qualified identity tag to its value
pub type IdentityLookup<'a> = dyn Fn(&str) -> Option<Identity> + 'a;

/// Fraction digits every decimal64 value is quantized to
pub const DECIMAL64_DIGITS: u32 = 18;

/// Built-in YANG type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YType {
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Int8,
    Int16,
    Int32,
    Int64,
    Str,
    Boolean,
    Empty,
    Identityref,
    Enumeration,
    Bits,
    Decimal64,
    Binary,
}

impl YType {
    /// Parse a type tag as written in schema tables
    pub fn from_string(s: &str) -> Option<Self> {
        let ytype = match s {
            "uint8" => YType::Uint8,
            "uint16" => YType::Uint16,
            "uint32" => YType::Uint32,
            "uint64" => YType::Uint64,
            "int8" => YType::Int8,
            "int16" => YType::Int16,
            "int32" => YType::Int32,
            "int64" => YType::Int64,
            "string" | "str" => YType::Str,
            "boolean" => YType::Boolean,
            "empty" => YType::Empty,
            "identityref" => YType::Identityref,
            "enumeration" => YType::Enumeration,
            "bits" => YType::Bits,
            "decimal64" => YType::Decimal64,
            "binary" => YType::Binary,
            _ => return None,
        };
        Some(ytype)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            YType::Uint8 => "uint8",
            YType::Uint16 => "uint16",
            YType::Uint32 => "uint32",
            YType::Uint64 => "uint64",
            YType::Int8 => "int8",
            YType::Int16 => "int16",
            YType::Int32 => "int32",
            YType::Int64 => "int64",
            YType::Str => "string",
            YType::Boolean => "boolean",
            YType::Empty => "empty",
            YType::Identityref => "identityref",
            YType::Enumeration => "enumeration",
            YType::Bits => "bits",
            YType::Decimal64 => "decimal64",
            YType::Binary => "binary",
        }
    }

    /// Inclusive range of the integer types, `None` for everything else
    fn int_range(self) -> Option<(i128, i128)> {
        match self {
            YType::Uint8 => Some((0, u8::MAX as i128)),
            YType::Uint16 => Some((0, u16::MAX as i128)),
            YType::Uint32 => Some((0, u32::MAX as i128)),
            YType::Uint64 => Some((0, u64::MAX as i128)),
            YType::Int8 => Some((i8::MIN as i128, i8::MAX as i128)),
            YType::Int16 => Some((i16::MIN as i128, i16::MAX as i128)),
            YType::Int32 => Some((i32::MIN as i128, i32::MAX as i128)),
            YType::Int64 => Some((i64::MIN as i128, i64::MAX as i128)),
            _ => None,
        }
    }
}

impl fmt::Display for YType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named boolean flags of a `bits` leaf, kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct Bits {
    bitmap: Vec<(String, bool)>,
}

impl Bits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear a bit, adding it if unknown
    pub fn set(&mut self, name: &str, value: bool) {
        match self.bitmap.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.bitmap.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Result<bool> {
        self.lookup(name)
            .ok_or_else(|| YangError::invalid_argument(format!("Key '{}' doesn't exist", name)))
    }

    fn lookup(&self, name: &str) -> Option<bool> {
        self.bitmap.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn is_empty(&self) -> bool {
        self.bitmap.is_empty()
    }

    /// Space-separated names of the set bits
    pub fn bits_string(&self) -> String {
        self.bitmap
            .iter()
            .filter(|(_, v)| *v)
            .map(|(n, _)| n.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl PartialEq for Bits {
    fn eq(&self, other: &Self) -> bool {
        self.bitmap.len() == other.bitmap.len()
            && self
                .bitmap
                .iter()
                .all(|(n, v)| other.lookup(n) == Some(*v))
    }
}

/// One member of an enumeration: symbolic name plus its integer value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub value: i64,
}

impl EnumValue {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Identity-reference value.
///
/// Two identities are equal when their qualified tags are equal; the base
/// chain only takes part in validation.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Namespace URI of the module defining the identity
    pub namespace: String,
    /// Module prefix of the defining module
    pub prefix: String,
    /// Local identity name
    pub name: String,
    /// Qualified (`module:name`) tags of every ancestor identity
    pub bases: Vec<String>,
}

impl Identity {
    pub fn new(
        namespace: impl Into<String>,
        prefix: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            prefix: prefix.into(),
            name: name.into(),
            bases: Vec::new(),
        }
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.bases.push(base.into());
        self
    }

    /// Qualified tag, `prefix:name`
    pub fn tag(&self) -> String {
        format!("{}:{}", self.prefix, self.name)
    }

    /// Whether this identity is, or derives from, `module:name`
    pub fn is_a(&self, module: &str, name: &str) -> bool {
        let wanted = format!("{}:{}", module, name);
        self.tag() == wanted || self.bases.iter().any(|b| *b == wanted)
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.tag() == other.tag()
    }
}

/// Fixed-point decimal quantized to 18 fraction digits.
///
/// Construction always rescales to [`DECIMAL64_DIGITS`], whatever the
/// `fraction-digits` of the schema. Digits beyond the 18th are rounded away
/// (half to even) and the schema-declared precision is not kept. Values
/// whose integer part leaves no room for 18 fraction digits in the 96-bit
/// mantissa keep the largest scale that fits, see [`Decimal64::is_full_scale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decimal64(Decimal);

impl Decimal64 {
    pub fn new(value: Decimal) -> Self {
        let mut quantized =
            value.round_dp_with_strategy(DECIMAL64_DIGITS, RoundingStrategy::MidpointNearestEven);
        if quantized != value {
            tracing::warn!(%value, %quantized, "decimal64 rounded to 18 fraction digits");
        }
        quantized.rescale(DECIMAL64_DIGITS);
        if quantized.scale() < DECIMAL64_DIGITS {
            tracing::warn!(
                %value,
                scale = quantized.scale(),
                "decimal64 integer part too large for 18 fraction digits"
            );
        }
        Self(quantized)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Whether the value carries all 18 fraction digits
    pub fn is_full_scale(&self) -> bool {
        self.0.scale() == DECIMAL64_DIGITS
    }
}

impl FromStr for Decimal64 {
    type Err = YangError;

    fn from_str(s: &str) -> Result<Self> {
        let value = Decimal::from_str(s.trim()).map_err(|e| {
            YangError::invalid_argument(format!("cannot parse '{}' as decimal64: {}", s, e))
        })?;
        Ok(Self::new(value))
    }
}

impl fmt::Display for Decimal64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A typed scalar value held by a leaf
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Uint(u64),
    Str(String),
    Bool(bool),
    /// Presence-only value; any two instances are equal
    Empty,
    Identity(Identity),
    Bits(Bits),
    Enum(EnumValue),
    Decimal64(Decimal64),
    Binary(Vec<u8>),
}

impl Value {
    /// Canonical wire text of the value
    pub fn to_text(&self) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Uint(n) => n.to_string(),
            Value::Str(s) => s.clone(),
            Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            Value::Empty => String::new(),
            Value::Identity(identity) => identity.tag(),
            Value::Bits(bits) => bits.bits_string(),
            Value::Enum(e) => e.name.clone(),
            Value::Decimal64(d) => d.to_string(),
            Value::Binary(bytes) => BASE64.encode(bytes),
        }
    }

    /// Short name of the value's kind, used in error reports
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Uint(_) => "uint",
            Value::Str(_) => "str",
            Value::Bool(_) => "bool",
            Value::Empty => "Empty",
            Value::Identity(_) => "Identity",
            Value::Bits(_) => "Bits",
            Value::Enum(_) => "Enum",
            Value::Decimal64(_) => "Decimal64",
            Value::Binary(_) => "bytes",
        }
    }

    fn as_i128(&self) -> Option<i128> {
        match self {
            Value::Int(n) => Some(*n as i128),
            Value::Uint(n) => Some(*n as i128),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

macro_rules! value_from {
    ($variant:ident as $target:ty: $($t:ty),+) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::$variant(v as $target)
            }
        })+
    };
}

value_from!(Uint as u64: u8, u16, u32, u64);
value_from!(Int as i64: i8, i16, i32, i64);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Identity> for Value {
    fn from(v: Identity) -> Self {
        Value::Identity(v)
    }
}

impl From<Bits> for Value {
    fn from(v: Bits) -> Self {
        Value::Bits(v)
    }
}

impl From<EnumValue> for Value {
    fn from(v: EnumValue) -> Self {
        Value::Enum(v)
    }
}

impl From<Decimal64> for Value {
    fn from(v: Decimal64) -> Self {
        Value::Decimal64(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Binary(v)
    }
}

/// One member of a generated enumeration table
#[derive(Debug)]
pub struct EnumMember {
    pub name: &'static str,
    pub value: i64,
}

/// Generated enumeration: the (module, container, enum) triple plus its members
#[derive(Debug)]
pub struct EnumType {
    pub module: &'static str,
    pub container: &'static str,
    pub name: &'static str,
    pub members: &'static [EnumMember],
}

impl EnumType {
    pub fn member(&self, name: &str) -> Option<EnumValue> {
        self.members
            .iter()
            .find(|m| m.name == name)
            .map(|m| EnumValue::new(m.name, m.value))
    }
}

/// One acceptable type of a leaf
#[derive(Debug, Clone, Copy)]
pub enum TypeDescriptor {
    Primitive(YType),
    /// Identity derived from `module:name`
    Identity {
        module: &'static str,
        name: &'static str,
    },
    Enumeration(&'static EnumType),
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(t) => write!(f, "'{}'", t),
            TypeDescriptor::Identity { module, name } => write!(f, "'{}.{}'", module, name),
            TypeDescriptor::Enumeration(e) if e.container.is_empty() => {
                write!(f, "'{}.{}'", e.module, e.name)
            }
            TypeDescriptor::Enumeration(e) => {
                write!(f, "'{}.{}.{}'", e.module, e.container, e.name)
            }
        }
    }
}

/// Render a descriptor set the way error reports show it: `'a' or 'b'`
pub fn describe(descriptors: &[TypeDescriptor]) -> String {
    descriptors
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(" or ")
}

fn matches_descriptor(value: &Value, descriptor: &TypeDescriptor) -> bool {
    match descriptor {
        TypeDescriptor::Identity { module, name } => {
            matches!(value, Value::Identity(identity) if identity.is_a(module, name))
        }
        TypeDescriptor::Enumeration(enum_type) => {
            matches!(value, Value::Enum(e) if enum_type.member(&e.name).is_some())
        }
        TypeDescriptor::Primitive(ytype) => {
            if let Some((min, max)) = ytype.int_range() {
                return value.as_i128().is_some_and(|n| n >= min && n <= max);
            }
            match ytype {
                YType::Str => matches!(value, Value::Str(_)),
                YType::Boolean => matches!(value, Value::Bool(_)),
                YType::Empty => matches!(value, Value::Empty),
                YType::Identityref => matches!(value, Value::Identity(_)),
                YType::Enumeration => matches!(value, Value::Enum(_)),
                YType::Bits => matches!(value, Value::Bits(_) | Value::Str(_)),
                YType::Decimal64 => matches!(value, Value::Decimal64(_)),
                YType::Binary => matches!(value, Value::Binary(_)),
                _ => false,
            }
        }
    }
}

/// Whether `value` satisfies at least one descriptor
pub fn validate(value: &Value, descriptors: &[TypeDescriptor]) -> bool {
    descriptors.iter().any(|d| matches_descriptor(value, d))
}

/// Validate a value about to be assigned to `leaf` and convert it to the
/// representation the first matching type decodes to: integers become
/// `Uint` or `Int` by the signedness of the type, strings given to a bits
/// type become a bit set.
pub fn check_value(leaf: &str, value: Value, descriptors: &[TypeDescriptor]) -> Result<Value> {
    if descriptors.is_empty() {
        return Ok(value);
    }
    if let Some(descriptor) = descriptors.iter().find(|d| matches_descriptor(&value, d)) {
        return Ok(coerce(value, descriptor));
    }
    let err = YangError::TypeMismatch {
        leaf: leaf.to_string(),
        value: format!("{} ({})", value, value.kind_name()),
        expected: describe(descriptors),
    };
    tracing::error!("{}", err);
    Err(err)
}

fn coerce(value: Value, descriptor: &TypeDescriptor) -> Value {
    let TypeDescriptor::Primitive(ytype) = descriptor else {
        return value;
    };
    match (ytype.int_range(), value) {
        (Some((0, _)), Value::Int(n)) => Value::Uint(n as u64),
        (Some((min, _)), Value::Uint(n)) if min < 0 => Value::Int(n as i64),
        (None, Value::Str(text)) if *ytype == YType::Bits => {
            let mut bits = Bits::new();
            for name in text.split_whitespace() {
                bits.set(name, true);
            }
            Value::Bits(bits)
        }
        (_, value) => value,
    }
}

/// Convert wire text into a typed value, trying each descriptor in order.
///
/// `identity_lookup` resolves a qualified identity tag against the registry.
pub fn decode_value(
    text: &str,
    descriptors: &[TypeDescriptor],
    identity_lookup: &IdentityLookup<'_>,
) -> Option<Value> {
    descriptors
        .iter()
        .find_map(|d| decode_with(text, d, identity_lookup))
}

fn decode_with(
    text: &str,
    descriptor: &TypeDescriptor,
    identity_lookup: &IdentityLookup<'_>,
) -> Option<Value> {
    match descriptor {
        TypeDescriptor::Identity { .. } => identity_lookup(text.trim()).map(Value::Identity),
        TypeDescriptor::Enumeration(enum_type) => enum_type.member(text.trim()).map(Value::Enum),
        TypeDescriptor::Primitive(ytype) => {
            let text_trimmed = text.trim();
            if let Some((min, max)) = ytype.int_range() {
                let n: i128 = text_trimmed.parse().ok()?;
                if n < min || n > max {
                    return None;
                }
                return Some(if min == 0 {
                    Value::Uint(n as u64)
                } else {
                    Value::Int(n as i64)
                });
            }
            match ytype {
                YType::Str => Some(Value::Str(text.to_string())),
                YType::Boolean => match text_trimmed {
                    "true" => Some(Value::Bool(true)),
                    "false" => Some(Value::Bool(false)),
                    _ => None,
                },
                YType::Empty => Some(Value::Empty),
                YType::Bits => {
                    let mut bits = Bits::new();
                    for name in text_trimmed.split_whitespace() {
                        bits.set(name, true);
                    }
                    Some(Value::Bits(bits))
                }
                YType::Decimal64 => Decimal::from_str(text_trimmed)
                    .ok()
                    .map(|d| Value::Decimal64(Decimal64::new(d))),
                YType::Binary => BASE64.decode(text_trimmed).ok().map(Value::Binary),
                YType::Identityref => identity_lookup(text_trimmed).map(Value::Identity),
                _ => None,
            }
        }
    }
}

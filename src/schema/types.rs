//! Schema type definitions
//!
//! Supported attribute types:
//! - int: 64-bit signed integer
//! - float: 64-bit floating point
//! - string: UTF-8 text with a declared capacity in bytes
//! - bool: Boolean

use std::collections::HashSet;
use std::fmt;
use std::num::NonZeroUsize;

use super::errors::{SchemaError, SchemaResult};

/// The four-way attribute type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// Bounded UTF-8 text
    Text,
    /// Boolean
    Bool,
}

impl DataType {
    /// Every type, in prompt order
    pub const ALL: [DataType; 4] = [DataType::Int, DataType::Float, DataType::Text, DataType::Bool];

    /// Returns the type name for prompts and error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::Text => "string",
            DataType::Bool => "bool",
        }
    }

    /// The single-letter code used when configuring attributes
    pub fn code(&self) -> char {
        match self {
            DataType::Int => 'I',
            DataType::Float => 'F',
            DataType::Text => 'S',
            DataType::Bool => 'B',
        }
    }

    /// Parse a type code, case-insensitively. `None` for anything else.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "I" => Some(DataType::Int),
            "F" => Some(DataType::Float),
            "S" => Some(DataType::Text),
            "B" => Some(DataType::Bool),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// One attribute descriptor: name, type and, for text only, a capacity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDef {
    pub name: String,
    pub data_type: DataType,
    /// Declared capacity; `Some` only for [`DataType::Text`]
    pub capacity: Option<NonZeroUsize>,
}

impl AttributeDef {
    /// A non-text attribute
    pub fn scalar(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            capacity: None,
        }
    }

    /// A text attribute with a declared capacity
    pub fn text(name: impl Into<String>, capacity: NonZeroUsize) -> Self {
        Self {
            name: name.into(),
            data_type: DataType::Text,
            capacity: Some(capacity),
        }
    }

    /// Declared size: the text capacity, 0 for every other type
    pub fn size(&self) -> usize {
        self.capacity.map_or(0, NonZeroUsize::get)
    }
}

impl fmt::Display for AttributeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.capacity {
            Some(cap) => write!(f, "{}: {}({})", self.name, self.data_type, cap),
            None => write!(f, "{}: {}", self.name, self.data_type),
        }
    }
}

/// A table's row shape: ordered attribute descriptors plus key attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    attributes: Vec<AttributeDef>,
    key_attrs: Vec<usize>,
}

impl Schema {
    /// Construct a schema, validating its structure
    pub fn new(attributes: Vec<AttributeDef>, key_attrs: Vec<usize>) -> SchemaResult<Self> {
        if attributes.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen = HashSet::with_capacity(attributes.len());
        for (index, attr) in attributes.iter().enumerate() {
            if attr.name.is_empty() {
                return Err(SchemaError::EmptyName { index });
            }
            if !seen.insert(attr.name.as_str()) {
                return Err(SchemaError::DuplicateName(attr.name.clone()));
            }
            match (attr.data_type, attr.capacity) {
                (DataType::Text, None) => {
                    return Err(SchemaError::MissingCapacity(attr.name.clone()))
                }
                (DataType::Text, Some(_)) | (_, None) => {}
                (data_type, Some(_)) => {
                    return Err(SchemaError::UnexpectedCapacity {
                        name: attr.name.clone(),
                        data_type,
                    })
                }
            }
        }

        if let Some(&bad) = key_attrs.iter().find(|&&k| k >= attributes.len()) {
            return Err(SchemaError::KeyOutOfRange {
                index: bad,
                num_attr: attributes.len(),
            });
        }

        Ok(Self {
            attributes,
            key_attrs,
        })
    }

    /// Number of attributes
    pub fn num_attr(&self) -> usize {
        self.attributes.len()
    }

    pub fn attributes(&self) -> &[AttributeDef] {
        &self.attributes
    }

    pub fn attribute(&self, index: usize) -> Option<&AttributeDef> {
        self.attributes.get(index)
    }

    pub fn key_attrs(&self) -> &[usize] {
        &self.key_attrs
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, attr) in self.attributes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", attr)?;
        }
        f.write_str("}")
    }
}

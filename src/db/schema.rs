//! Structural validation of incoming payloads.
//!
//! Each payload type is described by a [`Shape`]: an ordered list of fields
//! with their primitive kind and whether they are required. A single
//! generic [`validate`] walks a JSON value against a shape before it is
//! decoded into the typed model, so handlers only ever see values that
//! already satisfy their shape. Only structure is checked; there are no
//! value-range or format rules here.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::db::models::{Profile, SearchQuery, SortBy, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    String,
    Object(&'static Shape),
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Integer => "integer",
            FieldKind::String => "string",
            FieldKind::Object(_) => "object",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl Field {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Shape {
    pub name: &'static str,
    pub fields: &'static [Field],
}

pub static PROFILE_SHAPE: Shape = Shape {
    name: "Profile",
    fields: &[
        Field::required("name", FieldKind::String),
        Field::required("age", FieldKind::Integer),
    ],
};

pub static USER_SHAPE: Shape = Shape {
    name: "User",
    fields: &[
        Field::required("id", FieldKind::Integer),
        Field::required("username", FieldKind::String),
        Field::required("email", FieldKind::String),
        Field::required("level", FieldKind::Integer),
        Field::optional("profile", FieldKind::Object(&PROFILE_SHAPE)),
    ],
};

pub static SEARCH_QUERY_SHAPE: Shape = Shape {
    name: "SearchQuery",
    fields: &[
        Field::required("name", FieldKind::String),
        Field::required("age", FieldKind::Integer),
    ],
};

/// A typed payload with a structural description.
pub trait Shaped: DeserializeOwned {
    const SHAPE: &'static Shape;
}

impl Shaped for Profile {
    const SHAPE: &'static Shape = &PROFILE_SHAPE;
}

impl Shaped for User {
    const SHAPE: &'static Shape = &USER_SHAPE;
}

impl Shaped for SearchQuery {
    const SHAPE: &'static Shape = &SEARCH_QUERY_SHAPE;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingRequiredField(String),

    #[error("field `{field}` expected {expected}, got {actual}")]
    WrongType {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("field `{field}` is not a valid {shape}: {reason}")]
    UnexpectedNestedShape {
        field: String,
        shape: &'static str,
        reason: Box<ValidationError>,
    },

    #[error("field `{field}` must be one of: {}", .allowed.join(", "))]
    InvalidEnumValue {
        field: String,
        allowed: &'static [&'static str],
    },

    #[error("payload does not decode as {shape}: {message}")]
    Undecodable { shape: &'static str, message: String },
}

/// Label used for the payload root when it is not an object at all.
const ROOT_FIELD: &str = "body";

/// Check `value` against `T`'s shape and decode it.
pub fn validate<T: Shaped>(value: Value) -> Result<T, ValidationError> {
    check_shape(&value, T::SHAPE, ROOT_FIELD)?;
    serde_json::from_value(value).map_err(|e| ValidationError::Undecodable {
        shape: T::SHAPE.name,
        message: e.to_string(),
    })
}

/// Structural check only; `label` names the value in a root-level type error.
pub fn check_shape(value: &Value, shape: &Shape, label: &str) -> Result<(), ValidationError> {
    let object = value.as_object().ok_or_else(|| ValidationError::WrongType {
        field: label.to_string(),
        expected: "object",
        actual: json_kind(value),
    })?;

    for field in shape.fields {
        match object.get(field.name) {
            None if field.required => {
                return Err(ValidationError::MissingRequiredField(field.name.to_string()));
            }
            None => {}
            Some(found) => check_field(field, found)?,
        }
    }

    Ok(())
}

fn check_field(field: &Field, value: &Value) -> Result<(), ValidationError> {
    let matches = match field.kind {
        FieldKind::Integer => value.as_i64().is_some(),
        FieldKind::String => value.is_string(),
        FieldKind::Object(_) => value.is_object(),
    };

    if !matches {
        return Err(ValidationError::WrongType {
            field: field.name.to_string(),
            expected: field.kind.name(),
            actual: json_kind(value),
        });
    }

    if let FieldKind::Object(nested) = field.kind {
        check_shape(value, nested, field.name).map_err(|reason| {
            ValidationError::UnexpectedNestedShape {
                field: field.name.to_string(),
                shape: nested.name,
                reason: Box::new(reason),
            }
        })?;
    }

    Ok(())
}

/// Parse the `sortBy` query parameter; absence is legal.
pub fn parse_sort_by(raw: Option<&str>) -> Result<Option<SortBy>, ValidationError> {
    raw.map(|value| {
        value
            .parse::<SortBy>()
            .map_err(|_| ValidationError::InvalidEnumValue {
                field: "sortBy".to_string(),
                allowed: SortBy::ALLOWED,
            })
    })
    .transpose()
}

/// Parse an integer path segment.
pub fn parse_integer_param(field: &str, raw: &str) -> Result<i64, ValidationError> {
    raw.parse::<i64>().map_err(|_| ValidationError::WrongType {
        field: field.to_string(),
        expected: FieldKind::Integer.name(),
        actual: FieldKind::String.name(),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

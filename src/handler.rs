//! Types shared between the tree builder and user handlers.
//!
//! A handler receives the invocation's captured flag values, any
//! positional arguments the host framework collected, and a
//! [`HandlerData`] describing the operation with its path template
//! already filled in.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::HandlerError;

/// Currently supported OpenAPI scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenApiType {
    String,
    Integer,
    Number,
    Boolean,
}

impl OpenApiType {
    /// Map a schema `type` value onto a supported scalar.
    pub fn from_schema(ty: &str) -> Option<Self> {
        match ty {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }

    /// The literal zero value used as a flag default.
    pub fn zero_literal(self) -> &'static str {
        match self {
            Self::String => "",
            Self::Integer => "0",
            Self::Number => "0",
            Self::Boolean => "false",
        }
    }
}

/// Metadata for one mapped parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamMeta {
    pub name: String,
    pub ty: OpenApiType,
}

/// Data passed into each handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerData {
    /// The HTTP method.
    pub method: String,
    /// The path, with the path params filled in by the time the handler runs.
    pub path: String,
    pub path_params: Vec<ParamMeta>,
    pub query_params: Vec<ParamMeta>,
    pub header_params: Vec<ParamMeta>,
    pub cookie_params: Vec<ParamMeta>,
    /// The optional request body flag.
    pub request_body_param: Option<ParamMeta>,
}

impl HandlerData {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            path_params: Vec::new(),
            query_params: Vec::new(),
            header_params: Vec::new(),
            cookie_params: Vec::new(),
            request_body_param: None,
        }
    }
}

/// Typed access to the flag values captured for one invocation.
///
/// Implemented by host-framework adapters. `None` means the flag is not
/// known to the invocation; readers fall back to the type's zero value.
pub trait FlagValues {
    fn string(&self, name: &str) -> Option<String>;
    fn integer(&self, name: &str) -> Option<i64>;
    fn number(&self, name: &str) -> Option<f64>;
    fn boolean(&self, name: &str) -> Option<bool>;
}

/// The handler signature.
pub type Handler =
    Arc<dyn Fn(&dyn FlagValues, &[String], HandlerData) -> Result<(), HandlerError> + Send + Sync>;

/// Registered handlers, keyed by operationId.
pub type HandlerMap = HashMap<String, Handler>;

/// Wrap a closure as a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&dyn FlagValues, &[String], HandlerData) -> Result<(), HandlerError>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

//! OpenAPI spec → internal IR (intermediate representation)
//!
//! Parses a dereferenced OpenAPI JSON into a flat list of `ApiOperation`s
//! that the command builder can consume. Raw `x-` extension maps are
//! carried along untyped; decoding them is the `ext` module's job.

use serde_json::Value;

use crate::error::BuildError;

/// Raw vendor extension map (`x-` keys only), as found in the document.
pub type Extensions = serde_json::Map<String, Value>;

/// A parsed API operation ready for CLI command generation.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ApiOperation {
    /// operationId from the spec (e.g. "CreatePod")
    pub operation_id: String,
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// URL path template (e.g. "/pods/{podId}")
    pub path: String,
    /// Summary text for help
    pub summary: String,
    /// Long description, used when the summary is empty
    pub description: String,
    /// Parameters in declaration order, all locations
    pub parameters: Vec<Param>,
    /// Request body, if any
    pub request_body: Option<RequestBody>,
    /// Raw `x-` extensions on the operation
    pub extensions: Extensions,
}

/// A single API parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Param {
    pub name: String,
    pub location: ParamLocation,
    pub description: String,
    pub required: bool,
    /// The schema's declared `type`, if one is set.
    pub schema_type: Option<String>,
}

/// Where a parameter is carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParamLocation {
    fn from_spec(s: &str) -> Option<Self> {
        match s {
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            "header" => Some(Self::Header),
            "cookie" => Some(Self::Cookie),
            _ => None,
        }
    }
}

/// An operation's request body. Content is treated as opaque; the
/// builder maps the whole body onto a single string flag.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct RequestBody {
    pub description: String,
    pub required: bool,
    /// Raw `x-` extensions on the body itself
    pub extensions: Extensions,
}

/// Loads operations from a dereferenced OpenAPI JSON document.
pub fn load(data: &[u8]) -> Result<Vec<ApiOperation>, BuildError> {
    let spec: Value = serde_json::from_slice(data).map_err(BuildError::InvalidDocument)?;
    Ok(extract_operations(&spec))
}

/// Loads operations from a dereferenced OpenAPI JSON file.
pub fn load_file(path: impl AsRef<std::path::Path>) -> Result<Vec<ApiOperation>, BuildError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| BuildError::SpecFileRead {
        path: path.display().to_string(),
        source,
    })?;
    load(&data)
}

/// Extract all operations from a dereferenced OpenAPI spec.
pub fn extract_operations(spec: &Value) -> Vec<ApiOperation> {
    let mut ops = Vec::new();

    let paths = match spec.get("paths").and_then(|p| p.as_object()) {
        Some(p) => p,
        None => return ops,
    };

    for (path, path_item) in paths {
        let path_level_params = path_item.get("parameters");

        for method in &[
            "get", "post", "put", "patch", "delete", "head", "options", "trace",
        ] {
            let operation = match path_item.get(*method) {
                Some(op) => op,
                None => continue,
            };

            if let Some(op) = extract_single_operation(path, method, operation, path_level_params) {
                ops.push(op);
            }
        }
    }

    ops
}

fn extract_single_operation(
    path: &str,
    method: &str,
    operation: &Value,
    path_level_params: Option<&Value>,
) -> Option<ApiOperation> {
    let operation_id = operation
        .get("operationId")
        .and_then(|v| v.as_str())
        .unwrap_or("");

    if operation_id.is_empty() {
        return None;
    }

    Some(ApiOperation {
        operation_id: operation_id.to_string(),
        method: method.to_uppercase(),
        path: path.to_string(),
        summary: text_field(operation, "summary"),
        description: text_field(operation, "description"),
        parameters: collect_params(path_level_params, operation.get("parameters")),
        request_body: extract_body(operation),
        extensions: collect_extensions(operation),
    })
}

/// Merge path-level + operation-level parameters, preserving first
/// declaration order. Operation-level overrides path-level per OpenAPI.
fn collect_params(path_level: Option<&Value>, operation_level: Option<&Value>) -> Vec<Param> {
    let mut params: Vec<Param> = Vec::new();

    for source in [path_level, operation_level].iter().flatten() {
        let Some(list) = source.as_array() else {
            continue;
        };
        for raw in list {
            let Some(param) = parse_param(raw) else {
                continue;
            };
            match params
                .iter_mut()
                .find(|p| p.name == param.name && p.location == param.location)
            {
                Some(existing) => *existing = param,
                None => params.push(param),
            }
        }
    }

    params
}

/// Parse a single parameter from its JSON representation.
fn parse_param(param: &Value) -> Option<Param> {
    let name = param.get("name")?.as_str()?.to_string();
    let location = param.get("in")?.as_str()?;

    let Some(location) = ParamLocation::from_spec(location) else {
        tracing::warn!(name = %name, location = %location, "unknown param location, skipping");
        return None;
    };

    let schema_type = param
        .get("schema")
        .and_then(|s| s.get("type"))
        .and_then(|t| t.as_str())
        .map(str::to_string);

    Some(Param {
        name,
        location,
        description: text_field(param, "description"),
        required: param
            .get("required")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        schema_type,
    })
}

fn extract_body(operation: &Value) -> Option<RequestBody> {
    let body = operation.get("requestBody")?;

    Some(RequestBody {
        description: text_field(body, "description"),
        required: body
            .get("required")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        extensions: collect_extensions(body),
    })
}

fn collect_extensions(value: &Value) -> Extensions {
    value
        .as_object()
        .map(|obj| {
            obj.iter()
                .filter(|(key, _)| key.starts_with("x-"))
                .map(|(key, val)| (key.clone(), val.clone()))
                .collect()
        })
        .unwrap_or_default()
}

fn text_field(value: &Value, field: &str) -> String {
    value
        .get(field)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_operations_valid_spec_with_get_and_post() {
        let spec = json!({
            "openapi": "3.0.0",
            "paths": {
                "/pods/{podId}": {
                    "get": {
                        "operationId": "GetPod",
                        "summary": "Get a pod",
                        "parameters": [
                            {
                                "name": "podId",
                                "in": "path",
                                "required": true,
                                "description": "Pod identifier",
                                "schema": { "type": "string" }
                            },
                            {
                                "name": "verbose",
                                "in": "query",
                                "required": false,
                                "description": "Verbose output",
                                "schema": { "type": "boolean" }
                            },
                            {
                                "name": "X-Request-Id",
                                "in": "header",
                                "schema": { "type": "string" }
                            },
                            {
                                "name": "session",
                                "in": "cookie",
                                "schema": { "type": "string" }
                            }
                        ]
                    },
                    "post": {
                        "operationId": "CreatePod",
                        "summary": "Create a pod",
                        "requestBody": {
                            "description": "Pod definition",
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "type": "object" }
                                }
                            }
                        }
                    }
                }
            }
        });

        let ops = extract_operations(&spec);
        assert_eq!(ops.len(), 2);

        let get_op = ops.iter().find(|o| o.operation_id == "GetPod").unwrap();
        assert_eq!(get_op.method, "GET");
        assert_eq!(get_op.path, "/pods/{podId}");
        assert_eq!(get_op.summary, "Get a pod");
        assert_eq!(get_op.parameters.len(), 4);
        assert_eq!(get_op.parameters[0].name, "podId");
        assert_eq!(get_op.parameters[0].location, ParamLocation::Path);
        assert!(get_op.parameters[0].required);
        assert_eq!(get_op.parameters[0].description, "Pod identifier");
        assert_eq!(get_op.parameters[1].location, ParamLocation::Query);
        assert!(!get_op.parameters[1].required);
        assert_eq!(get_op.parameters[2].location, ParamLocation::Header);
        assert_eq!(get_op.parameters[3].location, ParamLocation::Cookie);
        assert!(get_op.request_body.is_none());

        let post_op = ops.iter().find(|o| o.operation_id == "CreatePod").unwrap();
        assert_eq!(post_op.method, "POST");
        let body = post_op.request_body.as_ref().unwrap();
        assert_eq!(body.description, "Pod definition");
        assert!(body.required);
        assert!(post_op.parameters.is_empty());
    }

    #[test]
    fn extract_operations_skips_operations_without_operation_id() {
        let spec = json!({
            "openapi": "3.0.0",
            "paths": {
                "/health": {
                    "get": {
                        "summary": "Health check"
                    }
                },
                "/pods": {
                    "get": {
                        "operationId": "ListPods",
                        "summary": "List pods"
                    }
                }
            }
        });

        let ops = extract_operations(&spec);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].operation_id, "ListPods");
    }

    #[test]
    fn extract_operations_returns_empty_for_empty_paths() {
        let spec = json!({
            "openapi": "3.0.0",
            "paths": {}
        });

        assert!(extract_operations(&spec).is_empty());
    }

    #[test]
    fn extract_operations_returns_empty_when_no_paths_key() {
        let spec = json!({
            "openapi": "3.0.0"
        });

        assert!(extract_operations(&spec).is_empty());
    }

    #[test]
    fn extract_operations_merges_path_and_operation_params_with_override() {
        let spec = json!({
            "openapi": "3.0.0",
            "paths": {
                "/items/{itemId}": {
                    "parameters": [
                        {
                            "name": "itemId",
                            "in": "path",
                            "required": true,
                            "description": "Path-level description",
                            "schema": { "type": "string" }
                        },
                        {
                            "name": "shared",
                            "in": "query",
                            "description": "Path-level shared param",
                            "schema": { "type": "string" }
                        }
                    ],
                    "get": {
                        "operationId": "GetItem",
                        "parameters": [
                            {
                                "name": "shared",
                                "in": "query",
                                "required": true,
                                "description": "Operation-level override",
                                "schema": { "type": "integer" }
                            }
                        ]
                    }
                }
            }
        });

        let ops = extract_operations(&spec);
        assert_eq!(ops.len(), 1);

        let op = &ops[0];
        // first-declaration order survives the override
        assert_eq!(op.parameters.len(), 2);
        assert_eq!(op.parameters[0].name, "itemId");
        assert_eq!(op.parameters[0].description, "Path-level description");
        assert_eq!(op.parameters[1].name, "shared");
        assert_eq!(op.parameters[1].description, "Operation-level override");
        assert!(op.parameters[1].required);
        assert_eq!(op.parameters[1].schema_type.as_deref(), Some("integer"));
    }

    #[test]
    fn extract_operations_keeps_summary_and_description_separate() {
        let spec = json!({
            "openapi": "3.0.0",
            "paths": {
                "/pods": {
                    "get": {
                        "operationId": "ListPods",
                        "description": "Fallback description"
                    }
                }
            }
        });

        let ops = extract_operations(&spec);
        assert_eq!(ops[0].summary, "");
        assert_eq!(ops[0].description, "Fallback description");
    }

    #[test]
    fn extract_operations_captures_only_x_extensions() {
        let spec = json!({
            "openapi": "3.0.0",
            "paths": {
                "/add": {
                    "get": {
                        "operationId": "AddGet",
                        "x-cli-group": "ops",
                        "x-cli-aliases": ["ag"],
                        "deprecated": false
                    }
                }
            }
        });

        let ops = extract_operations(&spec);
        let exts = &ops[0].extensions;
        assert_eq!(exts.len(), 2);
        assert_eq!(exts["x-cli-group"], json!("ops"));
        assert_eq!(exts["x-cli-aliases"], json!(["ag"]));
    }

    #[test]
    fn extract_operations_captures_body_extensions() {
        let spec = json!({
            "openapi": "3.0.0",
            "paths": {
                "/add": {
                    "post": {
                        "operationId": "AddPost",
                        "requestBody": {
                            "required": true,
                            "x-cli-name": "req-body",
                            "content": {
                                "application/json": { "schema": { "type": "object" } }
                            }
                        }
                    }
                }
            }
        });

        let ops = extract_operations(&spec);
        let body = ops[0].request_body.as_ref().unwrap();
        assert_eq!(body.extensions["x-cli-name"], json!("req-body"));
        assert!(body.required);
    }

    #[test]
    fn parse_param_without_schema_has_no_type() {
        let spec = json!({
            "openapi": "3.0.0",
            "paths": {
                "/pods": {
                    "get": {
                        "operationId": "ListPods",
                        "parameters": [
                            { "name": "raw", "in": "query" }
                        ]
                    }
                }
            }
        });

        let ops = extract_operations(&spec);
        assert_eq!(ops[0].parameters[0].schema_type, None);
    }

    #[test]
    fn parse_param_with_unknown_location_is_dropped() {
        let spec = json!({
            "openapi": "3.0.0",
            "paths": {
                "/pods": {
                    "get": {
                        "operationId": "ListPods",
                        "parameters": [
                            { "name": "odd", "in": "matrix", "schema": { "type": "string" } },
                            { "name": "ok", "in": "query", "schema": { "type": "string" } }
                        ]
                    }
                }
            }
        });

        let ops = extract_operations(&spec);
        assert_eq!(ops[0].parameters.len(), 1);
        assert_eq!(ops[0].parameters[0].name, "ok");
    }

    #[test]
    fn load_rejects_invalid_json() {
        let err = load(b"{not json").unwrap_err();
        assert!(matches!(err, BuildError::InvalidDocument(_)));
    }

    #[test]
    fn load_file_reports_missing_file_with_path() {
        let err = load_file("no/such/spec.json").unwrap_err();
        match err {
            BuildError::SpecFileRead { path, .. } => assert_eq!(path, "no/such/spec.json"),
            other => panic!("unexpected error: {other}"),
        }
    }
}

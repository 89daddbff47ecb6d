//! OpenAPI 3.0.3 description of the HTTP surface.
//!
//! Every route module declares its operations as [`Operation`] constants next
//! to the handlers. [`document`] assembles them with the component schemas into
//! the JSON served at `/api/swagger.json`, and [`validate`] checks the result
//! before the server starts.

use std::collections::BTreeSet;

use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::routes;

pub const OPENAPI_VERSION: &str = "3.0.3";
pub const TITLE: &str = "Team Roles API";

const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// A path parameter of an operation.
#[derive(Debug)]
pub struct Param {
    pub name: &'static str,
    /// JSON schema type: `integer` or `string`.
    pub schema_type: &'static str,
    pub description: &'static str,
}

#[derive(Debug)]
pub struct Response {
    pub status: u16,
    pub description: &'static str,
    pub schema: Option<&'static str>,
}

/// The declared contract of one handler.
#[derive(Debug)]
pub struct Operation {
    pub operation_id: &'static str,
    pub method: &'static str,
    pub path: &'static str,
    pub tag: &'static str,
    pub summary: &'static str,
    pub description: &'static str,
    pub params: &'static [Param],
    pub request_body: Option<&'static str>,
    pub responses: &'static [Response],
}

#[derive(Debug, Error, PartialEq)]
pub enum SpecError {
    #[error("reference `{0}` does not resolve to a component schema")]
    UnresolvedRef(String),

    #[error("{method} {path}: path parameter `{param}` is not declared")]
    UndeclaredPathParam {
        method: String,
        path: String,
        param: String,
    },

    #[error("{method} {path}: parameter `{param}` does not appear in the path")]
    UnknownPathParam {
        method: String,
        path: String,
        param: String,
    },
}

/// All operations exposed by the router, in registration order.
pub fn operations() -> Vec<&'static Operation> {
    routes::teams::OPERATIONS
        .iter()
        .chain(routes::roles::OPERATIONS)
        .chain(routes::team_roles::OPERATIONS)
        .collect()
}

pub fn document(server_url: &str) -> Value {
    let mut paths = Map::new();
    for op in operations() {
        let item = paths
            .entry(op.path)
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(methods) = item {
            methods.insert(op.method.to_string(), operation_json(op));
        }
    }

    json!({
        "openapi": OPENAPI_VERSION,
        "info": {
            "title": TITLE,
            "description": "Team and role management API",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "servers": [
            { "url": server_url, "description": "The API server" }
        ],
        "paths": paths,
        "components": { "schemas": component_schemas() },
    })
}

fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("{}{}", SCHEMA_REF_PREFIX, name) })
}

fn operation_json(op: &Operation) -> Value {
    let mut body = Map::new();
    body.insert("operationId".into(), json!(op.operation_id));
    body.insert("tags".into(), json!([op.tag]));
    body.insert("summary".into(), json!(op.summary));
    body.insert("description".into(), json!(op.description));

    if !op.params.is_empty() {
        let params: Vec<Value> = op
            .params
            .iter()
            .map(|p| {
                json!({
                    "in": "path",
                    "name": p.name,
                    "required": true,
                    "description": p.description,
                    "schema": { "type": p.schema_type },
                })
            })
            .collect();
        body.insert("parameters".into(), Value::Array(params));
    }

    if let Some(schema) = op.request_body {
        body.insert(
            "requestBody".into(),
            json!({
                "required": true,
                "content": { "application/json": { "schema": schema_ref(schema) } },
            }),
        );
    }

    let mut responses = Map::new();
    for r in op.responses {
        let mut response = Map::new();
        response.insert("description".into(), json!(r.description));
        if let Some(schema) = r.schema {
            response.insert(
                "content".into(),
                json!({ "application/json": { "schema": schema_ref(schema) } }),
            );
        }
        responses.insert(r.status.to_string(), Value::Object(response));
    }
    body.insert("responses".into(), Value::Object(responses));

    Value::Object(body)
}

fn entity_schema(entity: &str) -> Value {
    json!({
        "type": "object",
        "description": entity,
        "properties": {
            "id": { "type": "integer" },
            "name": { "type": "string" },
            "description": { "type": "string", "nullable": true },
        },
        "required": ["id", "name"],
    })
}

fn create_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "description": { "type": "string", "nullable": true },
        },
        "required": ["name"],
    })
}

fn data_envelope(data: Value) -> Value {
    json!({
        "type": "object",
        "properties": {
            "success": { "type": "boolean" },
            "data": data,
        },
    })
}

fn list_envelope(item: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "success": { "type": "boolean" },
            "count": { "type": "integer" },
            "data": { "type": "array", "items": schema_ref(item) },
        },
    })
}

fn component_schemas() -> Value {
    json!({
        "Team": entity_schema("A named group holding zero or more roles"),
        "TeamCreate": create_schema(),
        "Role": entity_schema("A named label held by zero or more teams"),
        "RoleCreate": create_schema(),
        "AssignTeamRole": {
            "type": "object",
            "properties": {
                "team_name": { "type": "string" },
                "role_name": { "type": "string" },
            },
            "required": ["team_name", "role_name"],
        },
        "Message": {
            "type": "object",
            "properties": {
                "success": { "type": "boolean" },
                "message": { "type": "string" },
            },
        },
        "TeamResponse": data_envelope(schema_ref("Team")),
        "TeamList": list_envelope("Team"),
        "RoleResponse": data_envelope(schema_ref("Role")),
        "RoleList": list_envelope("Role"),
        "RoleNames": data_envelope(json!({ "type": "array", "items": { "type": "string" } })),
    })
}

/// Checks that every `$ref` resolves and that path templates and declared
/// path parameters agree.
pub fn validate(doc: &Value) -> Result<(), SpecError> {
    let schemas = doc
        .pointer("/components/schemas")
        .and_then(Value::as_object);

    let mut refs = Vec::new();
    collect_refs(doc, &mut refs);
    for reference in refs {
        let resolved = reference
            .strip_prefix(SCHEMA_REF_PREFIX)
            .and_then(|name| schemas.and_then(|s| s.get(name)))
            .is_some();
        if !resolved {
            return Err(SpecError::UnresolvedRef(reference.to_string()));
        }
    }

    let Some(paths) = doc.get("paths").and_then(Value::as_object) else {
        return Ok(());
    };

    for (path, item) in paths {
        let template = template_params(path);
        let Some(methods) = item.as_object() else {
            continue;
        };

        for (method, op) in methods {
            let declared: BTreeSet<&str> = op
                .get("parameters")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .filter(|p| p.get("in").and_then(Value::as_str) == Some("path"))
                .filter_map(|p| p.get("name").and_then(Value::as_str))
                .collect();

            if let Some(missing) = template.difference(&declared).next() {
                return Err(SpecError::UndeclaredPathParam {
                    method: method.clone(),
                    path: path.clone(),
                    param: missing.to_string(),
                });
            }
            if let Some(extra) = declared.difference(&template).next() {
                return Err(SpecError::UnknownPathParam {
                    method: method.clone(),
                    path: path.clone(),
                    param: extra.to_string(),
                });
            }
        }
    }

    Ok(())
}

fn collect_refs<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::Object(map) => {
            for (key, v) in map {
                match (key.as_str(), v) {
                    ("$ref", Value::String(r)) => out.push(r),
                    _ => collect_refs(v, out),
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|v| collect_refs(v, out)),
        _ => {}
    }
}

fn template_params(path: &str) -> BTreeSet<&str> {
    path.split('/')
        .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_validates() {
        let doc = document("http://127.0.0.1:5000/");
        assert_eq!(validate(&doc), Ok(()));
        assert_eq!(doc["openapi"], OPENAPI_VERSION);
        assert_eq!(doc["info"]["title"], TITLE);
    }

    #[test]
    fn test_every_operation_is_described() {
        let doc = document("http://localhost/");
        assert_eq!(operations().len(), 10);

        for op in operations() {
            let described = &doc["paths"][op.path][op.method];
            assert_eq!(described["operationId"], op.operation_id, "{} {}", op.method, op.path);
        }

        assert!(doc["paths"]["/teams"]["get"].is_object());
        assert!(doc["paths"]["/teams"]["post"].is_object());
    }

    #[test]
    fn test_unresolved_ref_is_rejected() {
        let mut doc = document("http://localhost/");
        doc["paths"]["/teams"]["post"]["requestBody"]["content"]["application/json"]["schema"] =
            schema_ref("Missing");

        assert_eq!(
            validate(&doc),
            Err(SpecError::UnresolvedRef("#/components/schemas/Missing".to_string()))
        );
    }

    #[test]
    fn test_undeclared_path_param_is_rejected() {
        let mut doc = document("http://localhost/");
        doc["paths"]["/team/{team_id}"]["get"]["parameters"] = json!([]);

        assert!(matches!(
            validate(&doc),
            Err(SpecError::UndeclaredPathParam { ref param, .. }) if param == "team_id"
        ));
    }

    #[test]
    fn test_template_params() {
        let params = template_params("/team/{team_name}/roles");
        assert_eq!(params.into_iter().collect::<Vec<_>>(), vec!["team_name"]);
    }
}

//! OpenAPI 3.1 description of the directory, served so typed clients can be
//! generated against it. Component schemas come from the same shapes the
//! validator enforces.

use axum::Json;
use serde_json::{json, Map, Value};

use crate::db::models::SortBy;
use crate::db::schema::{FieldKind, Shape, PROFILE_SHAPE, SEARCH_QUERY_SHAPE, USER_SHAPE};

pub const OPENAPI_VERSION: &str = "3.1.0";

pub async fn openapi_json() -> Json<Value> {
    Json(document())
}

pub fn document() -> Value {
    let mut schemas = Map::new();
    for shape in [&USER_SHAPE, &PROFILE_SHAPE, &SEARCH_QUERY_SHAPE] {
        schemas.insert(shape.name.to_string(), shape_schema(shape));
    }

    json!({
        "openapi": OPENAPI_VERSION,
        "info": {
            "title": "User Directory",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": {
            "/users": {
                "post": {
                    "operationId": "CreateUser",
                    "requestBody": json_body(&USER_SHAPE),
                    "responses": {
                        "201": json_response("Created", schema_ref(&USER_SHAPE)),
                        "400": error_response("Validation failure"),
                    },
                },
            },
            "/users/{user_id}": {
                "get": {
                    "operationId": "GetUser",
                    "parameters": [user_id_param()],
                    "responses": {
                        "200": json_response("User or null", nullable(schema_ref(&USER_SHAPE))),
                        "400": error_response("Validation failure"),
                    },
                },
            },
            "/users/profile/{user_id}": {
                "get": {
                    "operationId": "GetUserProfile",
                    "parameters": [user_id_param()],
                    "responses": {
                        "200": json_response("Profile or null", nullable(schema_ref(&PROFILE_SHAPE))),
                        "400": error_response("Validation failure"),
                    },
                },
            },
            "/users/search/{user_type}/submit": {
                "post": search_operation("SearchUsersSubmit", true),
            },
            "/users/search/{user_type}/do_thing": {
                "post": search_operation("SearchUsersDoThing", false),
            },
        },
        "components": {
            "schemas": schemas,
        },
    })
}

/// JSON Schema for an object shape; nested objects become `$ref`s.
pub fn shape_schema(shape: &Shape) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in shape.fields {
        let schema = match field.kind {
            FieldKind::Integer | FieldKind::String => json!({"type": field.kind.name()}),
            FieldKind::Object(nested) => schema_ref(nested),
        };
        properties.insert(field.name.to_string(), schema);
        if field.required {
            required.push(field.name);
        }
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn search_operation(operation_id: &str, strict: bool) -> Value {
    let sort_by_schema = json!({"type": "string", "enum": SortBy::ALLOWED});
    let sort_by_schema = if strict {
        sort_by_schema
    } else {
        nullable(sort_by_schema)
    };
    json!({
        "operationId": operation_id,
        "parameters": [
            {
                "name": "user_type",
                "in": "path",
                "required": true,
                "schema": {"type": "string"},
            },
            {
                "name": "sortBy",
                "in": "query",
                "required": strict,
                "schema": sort_by_schema,
            },
            {
                "name": "order",
                "in": "query",
                "required": false,
                "schema": nullable(json!({"type": "string"})),
            },
        ],
        "requestBody": json_body(&SEARCH_QUERY_SHAPE),
        "responses": {
            "200": json_response("Matching user or null", nullable(schema_ref(&USER_SHAPE))),
            "400": error_response("Validation failure"),
            "422": error_response("Precondition failure"),
        },
    })
}

fn user_id_param() -> Value {
    json!({
        "name": "user_id",
        "in": "path",
        "required": true,
        "schema": {"type": "integer"},
    })
}

fn schema_ref(shape: &Shape) -> Value {
    json!({"$ref": format!("#/components/schemas/{}", shape.name)})
}

fn nullable(schema: Value) -> Value {
    json!({"oneOf": [schema, {"type": "null"}]})
}

fn json_body(shape: &Shape) -> Value {
    json!({
        "required": true,
        "content": {"application/json": {"schema": schema_ref(shape)}},
    })
}

fn json_response(description: &str, schema: Value) -> Value {
    json!({
        "description": description,
        "content": {"application/json": {"schema": schema}},
    })
}

fn error_response(description: &str) -> Value {
    json_response(
        description,
        json!({
            "type": "object",
            "properties": {
                "error": {"type": "string"},
                "message": {"type": "string"},
            },
            "required": ["error", "message"],
        }),
    )
}

use std::sync::Arc;

use axum::{extract::State, response::Json};
use serde_json::Value;

// GET /api/swagger.json - API description built at startup
pub async fn swagger_spec(State(doc): State<Arc<Value>>) -> Json<Value> {
    Json(Value::clone(&doc))
}

use axum::{
    extract::{Path, State},
    response::Json,
};
use sqlx::sqlite::SqlitePool;

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::extract::JsonBody;
use crate::models::{CreateEntity, DataResponse, ListResponse, MessageResponse, Role};
use crate::openapi::{Operation, Param, Response};

const ROLE_ID: Param = Param {
    name: "role_id",
    schema_type: "integer",
    description: "Role id",
};

pub const OPERATIONS: &[Operation] = &[
    Operation {
        operation_id: "get_role",
        method: "get",
        path: "/role/{role_id}",
        tag: "Role",
        summary: "Get Role by id",
        description: "Get Role by id",
        params: &[ROLE_ID],
        request_body: None,
        responses: &[
            Response { status: 200, description: "Return a role", schema: Some("RoleResponse") },
            Response { status: 404, description: "Role id {role_id} not found", schema: Some("Message") },
        ],
    },
    Operation {
        operation_id: "get_roles",
        method: "get",
        path: "/roles",
        tag: "Role",
        summary: "Get List of Roles",
        description: "Get List of Roles",
        params: &[],
        request_body: None,
        responses: &[
            Response { status: 200, description: "Return a role list", schema: Some("RoleList") },
        ],
    },
    Operation {
        operation_id: "create_role",
        method: "post",
        path: "/roles",
        tag: "Role",
        summary: "Create new Role",
        description: "Create new Role",
        params: &[],
        request_body: Some("RoleCreate"),
        responses: &[
            Response { status: 200, description: "Role created", schema: Some("Message") },
            Response { status: 400, description: "Missing request payload", schema: Some("Message") },
            Response { status: 409, description: "Role already exists", schema: Some("Message") },
        ],
    },
    Operation {
        operation_id: "delete_role",
        method: "delete",
        path: "/role/{role_id}",
        tag: "Role",
        summary: "Delete Role by id",
        description: "Delete Role by id",
        params: &[ROLE_ID],
        request_body: None,
        responses: &[
            Response { status: 200, description: "Role deleted", schema: Some("Message") },
            Response { status: 404, description: "Role id {role_id} not found", schema: Some("Message") },
        ],
    },
];

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Role id {} not found", id))
}

// GET /role/{id} - Get role by id
pub async fn get_role(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> ApiResult<Json<DataResponse<Role>>> {
    let role = match super::parse_id(&id) {
        Some(role_id) => db::get_role_by_id(&pool, role_id).await?,
        None => None,
    };

    let role = role.ok_or_else(|| not_found(&id))?;
    Ok(Json(DataResponse::new(role)))
}

// GET /roles - List all roles
pub async fn get_roles(
    State(pool): State<SqlitePool>,
) -> ApiResult<Json<ListResponse<Role>>> {
    let roles = db::get_all_roles(&pool).await?;
    Ok(Json(ListResponse::new(roles)))
}

// POST /roles - Create a role
pub async fn create_role(
    State(pool): State<SqlitePool>,
    JsonBody(body): JsonBody<CreateEntity>,
) -> ApiResult<Json<MessageResponse>> {
    let role = db::create_role(&pool, &body.name, body.description.as_deref())
        .await
        .map_err(|err| ApiError::from_write(err, "Role", &body.name))?;

    tracing::info!(role_id = role.id, name = %role.name, "role created");

    Ok(Json(MessageResponse::ok(format!(
        "Role {} has been created successfully",
        role.name
    ))))
}

// DELETE /role/{id} - Delete role by id
pub async fn delete_role(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = match super::parse_id(&id) {
        Some(role_id) => db::delete_role(&pool, role_id).await?,
        None => false,
    };

    if !deleted {
        return Err(not_found(&id));
    }

    tracing::info!(role_id = %id, "role deleted");
    Ok(Json(MessageResponse::ok(format!("Role id {} Deleted success", id))))
}

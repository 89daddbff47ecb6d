use axum::{
    extract::{Path, State},
    response::Json,
};
use sqlx::sqlite::SqlitePool;

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::extract::JsonBody;
use crate::models::{AssignTeamRole, DataResponse, MessageResponse};
use crate::openapi::{Operation, Param, Response};

pub const OPERATIONS: &[Operation] = &[
    Operation {
        operation_id: "assign_role",
        method: "post",
        path: "/team/assign/role",
        tag: "Team Role",
        summary: "Assign new Role",
        description: "Assign a Role to a Team, both looked up by name",
        params: &[],
        request_body: Some("AssignTeamRole"),
        responses: &[
            Response { status: 200, description: "Role assigned", schema: Some("Message") },
            Response { status: 400, description: "Missing request payload", schema: Some("Message") },
            Response { status: 404, description: "Team/Role not found", schema: Some("Message") },
        ],
    },
    Operation {
        operation_id: "get_team_roles",
        method: "get",
        path: "/team/{team_name}/roles",
        tag: "Team Role",
        summary: "Get Roles by Team name",
        description: "Get Roles by Team name",
        params: &[Param {
            name: "team_name",
            schema_type: "string",
            description: "Team name",
        }],
        request_body: None,
        responses: &[
            Response { status: 200, description: "Return a Roles names list", schema: Some("RoleNames") },
            Response { status: 404, description: "Team {team_name} not found", schema: Some("Message") },
        ],
    },
];

// POST /team/assign/role - Link a role to a team by name
pub async fn assign_role(
    State(pool): State<SqlitePool>,
    JsonBody(body): JsonBody<AssignTeamRole>,
) -> ApiResult<Json<MessageResponse>> {
    let team = db::get_team_by_name(&pool, &body.team_name)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Team {} does not exist", body.team_name)))?;

    let role = db::get_role_by_name(&pool, &body.role_name)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Role {} does not exist", body.role_name)))?;

    db::assign_role(&pool, team.id, role.id).await?;

    tracing::info!(team_id = team.id, role_id = role.id, "role assigned to team");

    Ok(Json(MessageResponse::ok(format!(
        "Assign Role {} to Team {} is success",
        role.name, team.name
    ))))
}

// GET /team/{team_name}/roles - Role names held by a team
pub async fn get_team_roles(
    State(pool): State<SqlitePool>,
    Path(team_name): Path<String>,
) -> ApiResult<Json<DataResponse<Vec<String>>>> {
    let team = db::get_team_by_name(&pool, &team_name)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Team {} not found", team_name)))?;

    let roles = db::get_team_role_names(&pool, team.id).await?;
    Ok(Json(DataResponse::new(roles)))
}

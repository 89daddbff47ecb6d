use axum::{
    extract::{Path, State},
    response::Json,
};
use sqlx::sqlite::SqlitePool;

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::extract::JsonBody;
use crate::models::{CreateEntity, DataResponse, ListResponse, MessageResponse, Team};
use crate::openapi::{Operation, Param, Response};

const TEAM_ID: Param = Param {
    name: "team_id",
    schema_type: "integer",
    description: "Team id",
};

pub const OPERATIONS: &[Operation] = &[
    Operation {
        operation_id: "get_team",
        method: "get",
        path: "/team/{team_id}",
        tag: "Team",
        summary: "Get Team by id",
        description: "Get Team by id",
        params: &[TEAM_ID],
        request_body: None,
        responses: &[
            Response { status: 200, description: "Return a team", schema: Some("TeamResponse") },
            Response { status: 404, description: "Team id {team_id} not found", schema: Some("Message") },
        ],
    },
    Operation {
        operation_id: "get_teams",
        method: "get",
        path: "/teams",
        tag: "Team",
        summary: "Get List of Teams",
        description: "Get List of Teams",
        params: &[],
        request_body: None,
        responses: &[
            Response { status: 200, description: "Return a team list", schema: Some("TeamList") },
        ],
    },
    Operation {
        operation_id: "create_team",
        method: "post",
        path: "/teams",
        tag: "Team",
        summary: "Create new Team",
        description: "Create new Team",
        params: &[],
        request_body: Some("TeamCreate"),
        responses: &[
            Response { status: 200, description: "Team created", schema: Some("Message") },
            Response { status: 400, description: "Missing request payload", schema: Some("Message") },
            Response { status: 409, description: "Team already exists", schema: Some("Message") },
        ],
    },
    Operation {
        operation_id: "delete_team",
        method: "delete",
        path: "/team/{team_id}",
        tag: "Team",
        summary: "Delete Team by id",
        description: "Delete Team by id",
        params: &[TEAM_ID],
        request_body: None,
        responses: &[
            Response { status: 200, description: "Team deleted", schema: Some("Message") },
            Response { status: 404, description: "Team id {team_id} not found", schema: Some("Message") },
        ],
    },
];

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Team id {} not found", id))
}

// GET /team/{id} - Get team by id
pub async fn get_team(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> ApiResult<Json<DataResponse<Team>>> {
    let team = match super::parse_id(&id) {
        Some(team_id) => db::get_team_by_id(&pool, team_id).await?,
        None => None,
    };

    let team = team.ok_or_else(|| not_found(&id))?;
    Ok(Json(DataResponse::new(team)))
}

// GET /teams - List all teams
pub async fn get_teams(
    State(pool): State<SqlitePool>,
) -> ApiResult<Json<ListResponse<Team>>> {
    let teams = db::get_all_teams(&pool).await?;
    Ok(Json(ListResponse::new(teams)))
}

// POST /teams - Create a team
pub async fn create_team(
    State(pool): State<SqlitePool>,
    JsonBody(body): JsonBody<CreateEntity>,
) -> ApiResult<Json<MessageResponse>> {
    let team = db::create_team(&pool, &body.name, body.description.as_deref())
        .await
        .map_err(|err| ApiError::from_write(err, "Team", &body.name))?;

    tracing::info!(team_id = team.id, name = %team.name, "team created");

    Ok(Json(MessageResponse::ok(format!(
        "Team {} has been created successfully",
        team.name
    ))))
}

// DELETE /team/{id} - Delete team by id
pub async fn delete_team(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = match super::parse_id(&id) {
        Some(team_id) => db::delete_team(&pool, team_id).await?,
        None => false,
    };

    if !deleted {
        return Err(not_found(&id));
    }

    tracing::info!(team_id = %id, "team deleted");
    Ok(Json(MessageResponse::ok(format!("Team {} Deleted success", id))))
}

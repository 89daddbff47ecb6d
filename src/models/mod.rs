use serde::{Serialize, Deserialize};

/// Team row from the teams table
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Role row from the roles table
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Request body for creating a team or a role
#[derive(Debug, Deserialize)]
pub struct CreateEntity {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for linking a role to a team
#[derive(Debug, Deserialize)]
pub struct AssignTeamRole {
    pub team_name: String,
    pub role_name: String,
}

/// Single-entity envelope: `{success, data}`
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { success: true, data }
    }
}

/// List envelope: `{success, count, data}`
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Outcome envelope: `{success, message}`, used for both writes and failures
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

pub mod docs;
pub mod health;
pub mod roles;
pub mod team_roles;
pub mod teams;

/// Ids arrive as raw path segments; anything that is not an integer cannot
/// match a row.
fn parse_id(raw: &str) -> Option<i64> {
    raw.parse().ok()
}

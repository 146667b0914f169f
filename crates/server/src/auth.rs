//! Staff session endpoint.

use api_types::auth::SessionUser;
use axum::{Extension, Json};
use engine::StaffUser;

/// Returns the staff member behind the request credentials.
pub async fn current(Extension(user): Extension<StaffUser>) -> Json<SessionUser> {
    Json(SessionUser {
        email: user.email,
        name: user.name,
    })
}

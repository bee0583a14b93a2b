pub mod users;

use crate::models::{ProfileResponse, SearchQuery, UserResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        users::list_users,
        users::get_user,
    ),
    components(schemas(
        UserResponse,
        ProfileResponse,
        SearchQuery,
    )),
    tags(
        (name = "users", description = "Read-only user directory"),
    ),
)]
pub struct ApiDoc;

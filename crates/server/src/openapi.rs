use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct NewSystemRoleDoc {
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct SystemRolePatchDoc {
    pub name: Option<String>,
    pub description: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub is_deleted: Option<bool>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::system_roles::add_system_role,
        crate::routes::system_roles::list_system_roles,
        crate::routes::system_roles::get_system_role,
        crate::routes::system_roles::update_system_role,
        crate::routes::system_roles::delete_system_role,
    ),
    components(schemas(HealthResponse, NewSystemRoleDoc, SystemRolePatchDoc)),
    tags((name = "health"), (name = "system-roles"))
)]
pub struct ApiDoc;

//! OpenAPI documentation

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::health::readiness_check,
        crate::handlers::health::metrics,
        crate::handlers::users::register,
        crate::handlers::users::login,
        crate::handlers::users::list_users,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::recipes::list_recipes,
        crate::handlers::recipes::get_recipe,
        crate::handlers::recipes::create_recipe,
        crate::handlers::recipes::update_recipe,
        crate::handlers::recipes::delete_recipe,
    ),
    components(schemas(
        ladle_core::PublicUser,
        ladle_core::Recipe,
        crate::validation::RegisterUser,
        crate::validation::LoginUser,
        crate::validation::UpdateUser,
        crate::validation::CreateRecipe,
        crate::validation::UpdateRecipe,
        crate::handlers::users::LoginResponse,
        crate::error::ErrorBody,
        crate::error::FieldError,
    )),
    tags(
        (name = "users", description = "Registration, login, and account management"),
        (name = "recipes", description = "Recipe CRUD scoped to the owning author"),
        (name = "health", description = "Operational endpoints"),
    )
)]
pub struct ApiDoc;

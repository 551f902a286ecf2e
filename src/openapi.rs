//! OpenAPI 3.0 documentation assembly
//!
//! Aggregates handler path annotations and domain schemas into one document,
//! served with Swagger UI.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Forum Gateway API",
        version = "0.3.0",
        description = "REST gateway over the forum content, comment, statistics, identity and category services"
    ),
    tags(
        (name = "System", description = "Health checks and metrics"),
        (name = "Posts", description = "Posts with aggregated statistics"),
        (name = "Comments", description = "Comments on posts"),
        (name = "Categories", description = "Categories"),
        (name = "Moderation", description = "Reports and category administration"),
        (name = "Identity", description = "Users and login tokens"),
        (name = "OAuth", description = "OAuth applications and code exchange"),
    ),
    security(
        ("bearer_token" = [])
    ),
    components(
        schemas(
            crate::api::Pagination,
            crate::api::health::HealthResponse,

            crate::domain::Post,
            crate::domain::PostStats,
            crate::domain::PostWithStats,
            crate::domain::CreatePostInput,
            crate::domain::UpdatePostInput,
            crate::domain::VoteResult,

            crate::domain::CommentView,
            crate::domain::CreateCommentInput,
            crate::domain::UpdateCommentInput,

            crate::domain::Category,
            crate::domain::CreateCategoryInput,
            crate::domain::Report,
            crate::domain::CreateReportInput,

            crate::domain::UserInfo,
            crate::domain::CreateUserInput,
            crate::domain::CreatedUser,
            crate::domain::TokenRequest,
            crate::domain::TokenResponse,
            crate::domain::RefreshRequest,
            crate::domain::TokenPair,
            crate::domain::CreateAppInput,
            crate::domain::App,
            crate::domain::AppInfo,
            crate::domain::OAuthCodeRequest,
            crate::domain::OAuthCode,
        ),
    ),
    paths(
        crate::api::health::health,
        crate::api::metrics::metrics_handler,

        crate::api::post::list,
        crate::api::post::list_by_category,
        crate::api::post::get,
        crate::api::post::create,
        crate::api::post::update,
        crate::api::post::like,
        crate::api::post::dislike,
        crate::api::post::delete,
        crate::api::post::report,

        crate::api::comment::list,
        crate::api::comment::get,
        crate::api::comment::create,
        crate::api::comment::update,
        crate::api::comment::delete,
        crate::api::comment::report,

        crate::api::category::list,
        crate::api::category::get,
        crate::api::category::create,
        crate::api::category::list_reports,
        crate::api::category::delete_report,

        crate::api::user::register,
        crate::api::user::get,
        crate::api::user::token,
        crate::api::user::refresh,
        crate::api::user::create_app,
        crate::api::user::app_info,
        crate::api::user::authorize,
        crate::api::user::oauth_token,
    ),
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Document with the bearer security scheme registered
    pub fn build() -> utoipa::openapi::OpenApi {
        let mut doc = Self::openapi();
        if let Some(c) = doc.components.as_mut() {
            c.security_schemes.insert(
                "bearer_token".to_string(),
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            );
        }
        doc
    }
}

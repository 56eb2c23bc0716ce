use anyhow::Context;
use gym_storage::Database;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod extract;
mod features;
mod middleware;
mod routes;
mod state;

use config::Config;
use features::{admin, comments, members, memberships, posts, schedules, users};
use middleware::auth::ApiKeys;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        users::handlers::list_users,
        users::handlers::get_user,
        users::handlers::create_user,
        users::handlers::update_user,
        users::handlers::delete_user,
        members::handlers::list_members,
        members::handlers::get_member,
        members::handlers::create_member,
        members::handlers::update_member,
        members::handlers::delete_member,
        members::handlers::list_member_posts,
        members::handlers::list_member_schedules,
        memberships::handlers::list_memberships,
        memberships::handlers::get_membership,
        memberships::handlers::create_membership,
        memberships::handlers::update_membership,
        memberships::handlers::consume_session,
        memberships::handlers::delete_membership,
        schedules::handlers::list_schedules,
        schedules::handlers::list_today_schedules,
        schedules::handlers::list_upcoming_schedules,
        schedules::handlers::get_schedule,
        schedules::handlers::create_schedule,
        schedules::handlers::update_schedule,
        schedules::handlers::delete_schedule,
        schedules::handlers::join_schedule,
        posts::handlers::list_posts,
        posts::handlers::get_post,
        posts::handlers::create_post,
        posts::handlers::update_post,
        posts::handlers::delete_post,
        posts::handlers::add_comment,
        comments::handlers::list_comments,
        comments::handlers::get_comment,
        comments::handlers::create_comment,
        comments::handlers::update_comment,
        comments::handlers::delete_comment,
        admin::handlers::replace_participants,
    ),
    components(
        schemas(
            gym_storage::dto::user::UserResponse,
            gym_storage::dto::user::CreateUserRequest,
            gym_storage::dto::user::UpdateUserRequest,
            gym_storage::dto::member::MemberResponse,
            gym_storage::dto::member::CreateMemberRequest,
            gym_storage::dto::member::UpdateMemberRequest,
            gym_storage::dto::membership::MembershipResponse,
            gym_storage::dto::membership::CreateMembershipRequest,
            gym_storage::dto::membership::UpdateMembershipRequest,
            gym_storage::dto::schedule::ScheduleResponse,
            gym_storage::dto::schedule::ScheduleDetailResponse,
            gym_storage::dto::schedule::ParticipantInfo,
            gym_storage::dto::schedule::CreateScheduleRequest,
            gym_storage::dto::schedule::UpdateScheduleRequest,
            gym_storage::dto::schedule::JoinScheduleRequest,
            gym_storage::dto::schedule::JoinScheduleResponse,
            gym_storage::dto::schedule::ReplaceParticipantsRequest,
            gym_storage::dto::post::PostResponse,
            gym_storage::dto::post::PostDetailResponse,
            gym_storage::dto::post::CommentResponse,
            gym_storage::dto::post::CreatePostRequest,
            gym_storage::dto::post::UpdatePostRequest,
            gym_storage::dto::post::AddCommentRequest,
            gym_storage::dto::post::CreateCommentRequest,
            gym_storage::dto::post::UpdateCommentRequest,
            gym_storage::models::UserType,
            gym_storage::models::Gender,
            gym_storage::models::MembershipType,
            gym_storage::models::ScheduleType,
            gym_storage::models::ScheduleStatus,
            gym_storage::models::PostType,
        )
    ),
    tags(
        (name = "users", description = "Staff accounts"),
        (name = "members", description = "Gym members"),
        (name = "memberships", description = "Membership periods and session allowances"),
        (name = "schedules", description = "Training schedules and admission control"),
        (name = "posts", description = "Training log posts"),
        (name = "comments", description = "Comments on posts"),
        (name = "admin", description = "Administrative endpoints, API key required"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting gym back office API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::with_max_connections(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.is_empty() {
        tracing::warn!("API_KEYS is empty; administrative routes will reject every request");
    }

    let state = AppState {
        db,
        upcoming_horizon_days: config.upcoming_horizon_days,
    };

    let app = routes::router(state, api_keys).merge(
        SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}

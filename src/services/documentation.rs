use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the Number Click backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::stream,
        crate::routes::session::get_snapshot,
        crate::routes::session::start_session,
        crate::routes::session::start_daily,
        crate::routes::session::tap,
        crate::routes::session::stop,
        crate::routes::session::dismiss,
        crate::routes::session::summary,
        crate::routes::progress::tiers,
        crate::routes::progress::leaderboard,
        crate::routes::progress::badges,
        crate::routes::progress::daily,
        crate::routes::preferences::get_preferences,
        crate::routes::preferences::update_preferences,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::StoreStatus,
            crate::dto::session::SnapshotDto,
            crate::dto::session::StartSessionRequest,
            crate::dto::session::TapRequest,
            crate::dto::session::TapResponse,
            crate::dto::session::GameSummaryDto,
            crate::dto::progress::TiersResponse,
            crate::dto::progress::LeaderboardResponse,
            crate::dto::progress::BadgesResponse,
            crate::dto::progress::DailyResponse,
            crate::dto::preferences::PreferencesDto,
            crate::dto::preferences::UpdatePreferencesRequest,
            crate::dto::sse::CountdownEvent,
            crate::dto::sse::TickEvent,
            crate::dto::sse::FeedbackEvent,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events stream"),
        (name = "session", description = "Session lifecycle"),
        (name = "progress", description = "Leaderboards, badges and daily streak"),
        (name = "preferences", description = "Player preferences"),
    )
)]
pub struct ApiDoc;

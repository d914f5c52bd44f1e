pub mod auth;
pub mod bookings;
pub mod db;
pub mod error;
pub mod models;
pub mod notifications;
pub mod query;
pub mod reconciler;
pub mod reviews;
pub mod rewards;
pub mod validation;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;
use validator::Validate;

use auth::middleware::StaffUser;
use auth::repository::CustomersRepository;
use auth::service::SessionService;
use bookings::repository::{AppointmentsRepository, CatalogRepository, OrdersRepository};
use bookings::service::BookingService;
use error::ApiError;
use models::{CreatePromotionRequest, Promotion, Service, Staff, UpdatePromotionRequest};
use notifications::NotificationsRepository;
use query::{CatalogQueryBuilder, CatalogQueryParams, CatalogQueryValidator};
use reconciler::Reconciler;
use reviews::repository::ReviewsRepository;
use reviews::service::ReviewsService;
use rewards::repository::{PointHistoryRepository, VouchersRepository};
use rewards::service::RewardsService;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        get_services,
        get_staff,
        get_promotions,
        create_promotion,
        update_promotion,
        delete_promotion,
    ),
    components(
        schemas(
            Service,
            Staff,
            models::StylistRank,
            Promotion,
            models::DiscountSpec,
            CreatePromotionRequest,
            UpdatePromotionRequest,
        )
    ),
    tags(
        (name = "catalog", description = "Service and stylist reference data"),
        (name = "promotions", description = "Promotion management endpoints")
    ),
    info(
        title = "Lumina Salon API",
        version = "1.0.0",
        description = "Booking, checkout pricing, and loyalty backend for the Lumina salon",
        contact(
            name = "API Support",
            email = "support@lumina.com"
        )
    )
)]
struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub booking_service: BookingService,
    pub rewards_service: RewardsService,
    pub reviews_service: ReviewsService,
    pub session_service: SessionService,
    pub notifications_repo: NotificationsRepository,
    pub reconciler: Reconciler,
}

/// Handler for GET /api/services
/// Lists the service catalog with search, filtering, sorting, and pagination
#[utoipa::path(
    get,
    path = "/api/services",
    params(
        ("search" = Option<String>, Query, description = "Partial name match"),
        ("category" = Option<String>, Query, description = "Category filter"),
        ("min_price_cents" = Option<i64>, Query, description = "Minimum price in cents"),
        ("max_price_cents" = Option<i64>, Query, description = "Maximum price in cents"),
        ("sort" = Option<String>, Query, description = "Sort field: price or duration"),
        ("order" = Option<String>, Query, description = "Sort order: asc or desc"),
        ("page" = Option<u32>, Query, description = "Page number (1-indexed)"),
        ("limit" = Option<u32>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "List of services", body = Vec<Service>),
        (status = 400, description = "Invalid query parameters"),
        (status = 500, description = "Internal server error")
    ),
    tag = "catalog"
)]
async fn get_services(
    Query(params): Query<CatalogQueryParams>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Service>>, ApiError> {
    tracing::debug!("Fetching services with query parameters: {:?}", params);

    let validated = CatalogQueryValidator::validate(params)
        .map_err(|_e| ApiError::ValidationError(validator::ValidationErrors::new()))?;

    let mut builder = CatalogQueryBuilder::new();

    if let Some(search) = validated.search {
        builder.add_search_filter(&search);
    }
    if let Some(category) = validated.category {
        builder.add_category_filter(&category);
    }
    builder.add_price_range(validated.min_price_cents, validated.max_price_cents);

    if let Some(sort_field) = validated.sort_field {
        builder.set_sort(sort_field, validated.sort_order);
    }
    builder.set_pagination(validated.page, validated.limit);

    let (query_str, params) = builder.build();

    let mut query = sqlx::query_as::<_, Service>(&query_str);
    for param in params {
        query = query.bind(param);
    }

    let services = query.fetch_all(&state.db).await?;

    tracing::debug!("Query returned {} services", services.len());
    Ok(Json(services))
}

/// Handler for GET /api/staff
/// Lists the stylist roster
#[utoipa::path(
    get,
    path = "/api/staff",
    responses(
        (status = 200, description = "List of stylists", body = Vec<Staff>),
        (status = 500, description = "Internal server error")
    ),
    tag = "catalog"
)]
async fn get_staff(State(state): State<AppState>) -> Result<Json<Vec<Staff>>, ApiError> {
    tracing::debug!("Fetching staff roster");

    let staff = sqlx::query_as::<_, Staff>(
        r#"
        SELECT staff_id, name, email, rank, rating, specialties, avatar_url
        FROM staff
        ORDER BY name
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(staff))
}

/// Handler for GET /api/promotions
#[utoipa::path(
    get,
    path = "/api/promotions",
    responses(
        (status = 200, description = "List of promotions", body = Vec<Promotion>),
        (status = 500, description = "Internal server error")
    ),
    tag = "promotions"
)]
async fn get_promotions(State(state): State<AppState>) -> Result<Json<Vec<Promotion>>, ApiError> {
    let promotions = sqlx::query_as::<_, Promotion>(
        r#"
        SELECT id, title, description, discount_display, image_url, active,
               start_date, end_date, applicable_services
        FROM promotions
        ORDER BY start_date
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(promotions))
}

/// Handler for POST /api/promotions (staff only)
#[utoipa::path(
    post,
    path = "/api/promotions",
    request_body = CreatePromotionRequest,
    responses(
        (status = 201, description = "Promotion created", body = Promotion),
        (status = 400, description = "Invalid input data"),
        (status = 403, description = "Staff account required"),
        (status = 500, description = "Internal server error")
    ),
    tag = "promotions"
)]
async fn create_promotion(
    State(state): State<AppState>,
    StaffUser(_session): StaffUser,
    Json(payload): Json<CreatePromotionRequest>,
) -> Result<(StatusCode, Json<Promotion>), ApiError> {
    tracing::debug!("Creating promotion: {}", payload.title);

    payload.validate()?;

    let promotion = sqlx::query_as::<_, Promotion>(
        r#"
        INSERT INTO promotions (title, description, discount_display, image_url, active,
                                start_date, end_date, applicable_services)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, title, description, discount_display, image_url, active,
                  start_date, end_date, applicable_services
        "#,
    )
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(&payload.discount_display)
    .bind(&payload.image_url)
    .bind(payload.active)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(&payload.applicable_services)
    .fetch_one(&state.db)
    .await?;

    tracing::info!("Created promotion {}", promotion.id);
    Ok((StatusCode::CREATED, Json(promotion)))
}

/// Handler for PUT /api/promotions/:id (staff only)
/// Omitted fields keep their current values
#[utoipa::path(
    put,
    path = "/api/promotions/{id}",
    params(("id" = Uuid, Path, description = "Promotion id")),
    request_body = UpdatePromotionRequest,
    responses(
        (status = 200, description = "Promotion updated", body = Promotion),
        (status = 403, description = "Staff account required"),
        (status = 404, description = "Promotion not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "promotions"
)]
async fn update_promotion(
    State(state): State<AppState>,
    StaffUser(_session): StaffUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePromotionRequest>,
) -> Result<Json<Promotion>, ApiError> {
    // Merge-and-write inside one transaction so concurrent updates cannot
    // interleave between the read and the write
    let mut tx = state.db.begin().await?;

    let existing = sqlx::query_as::<_, Promotion>(
        "SELECT id, title, description, discount_display, image_url, active, start_date, \
         end_date, applicable_services FROM promotions WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| ApiError::NotFound {
        resource: "Promotion".to_string(),
        id: id.to_string(),
    })?;

    let updated = sqlx::query_as::<_, Promotion>(
        r#"
        UPDATE promotions
        SET title = $1, description = $2, discount_display = $3, image_url = $4,
            active = $5, start_date = $6, end_date = $7, applicable_services = $8
        WHERE id = $9
        RETURNING id, title, description, discount_display, image_url, active,
                  start_date, end_date, applicable_services
        "#,
    )
    .bind(payload.title.unwrap_or(existing.title))
    .bind(payload.description.unwrap_or(existing.description))
    .bind(payload.discount_display.unwrap_or(existing.discount_display))
    .bind(payload.image_url.or(existing.image_url))
    .bind(payload.active.unwrap_or(existing.active))
    .bind(payload.start_date.unwrap_or(existing.start_date))
    .bind(payload.end_date.unwrap_or(existing.end_date))
    .bind(payload.applicable_services.unwrap_or(existing.applicable_services))
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!("Updated promotion {}", id);
    Ok(Json(updated))
}

/// Handler for DELETE /api/promotions/:id (staff only)
#[utoipa::path(
    delete,
    path = "/api/promotions/{id}",
    params(("id" = Uuid, Path, description = "Promotion id")),
    responses(
        (status = 204, description = "Promotion deleted"),
        (status = 403, description = "Staff account required"),
        (status = 404, description = "Promotion not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "promotions"
)]
async fn delete_promotion(
    State(state): State<AppState>,
    StaffUser(_session): StaffUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let result = sqlx::query("DELETE FROM promotions WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound {
            resource: "Promotion".to_string(),
            id: id.to_string(),
        });
    }

    tracing::info!("Deleted promotion {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Build the application state from a connection pool
fn build_state(db: PgPool) -> AppState {
    let customers_repo = CustomersRepository::new(db.clone());
    let notifications_repo = NotificationsRepository::new(db.clone());
    let vouchers_repo = VouchersRepository::new(db.clone());
    let history_repo = PointHistoryRepository::new(db.clone());
    let appointments_repo = AppointmentsRepository::new(db.clone());
    let orders_repo = OrdersRepository::new(db.clone());
    let catalog_repo = CatalogRepository::new(db.clone());
    let reviews_repo = ReviewsRepository::new(db.clone());

    let rewards_service = RewardsService::new(
        vouchers_repo.clone(),
        history_repo,
        customers_repo.clone(),
        notifications_repo.clone(),
    );

    let booking_service = BookingService::new(
        appointments_repo.clone(),
        orders_repo,
        catalog_repo,
        customers_repo.clone(),
        vouchers_repo,
    );

    let reviews_service = ReviewsService::new(
        reviews_repo,
        appointments_repo.clone(),
        customers_repo.clone(),
        rewards_service.clone(),
        notifications_repo.clone(),
    );

    let session_service = SessionService::new(customers_repo, rewards_service.clone());

    let reconciler = Reconciler::new(appointments_repo, notifications_repo.clone());

    AppState {
        db,
        booking_service,
        rewards_service,
        reviews_service,
        session_service,
        notifications_repo,
        reconciler,
    }
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
fn create_router(db: PgPool) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let state = build_state(db);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Session and profile
        .route("/api/session", get(auth::handlers::session_handler))
        .route("/api/profile/theme", put(auth::handlers::update_theme_handler))
        .route("/api/profile/pin", put(auth::handlers::update_pin_handler))
        .route("/api/profile/pin/verify", post(auth::handlers::verify_pin_handler))
        // Catalog
        .route("/api/services", get(get_services))
        .route("/api/staff", get(get_staff))
        // Promotions
        .route("/api/promotions", get(get_promotions))
        .route("/api/promotions", post(create_promotion))
        .route("/api/promotions/:id", put(update_promotion))
        .route("/api/promotions/:id", delete(delete_promotion))
        // Bookings
        .route("/api/bookings/quote", post(bookings::handlers::quote_handler))
        .route("/api/bookings/voucher-options", get(bookings::handlers::voucher_options_handler))
        .route("/api/bookings", post(bookings::handlers::create_booking_handler))
        .route("/api/bookings", get(bookings::handlers::list_bookings_handler))
        .route("/api/bookings/:id/reschedule", post(bookings::handlers::reschedule_handler))
        .route("/api/bookings/:id/cancel", post(bookings::handlers::cancel_handler))
        .route("/api/bookings/:id/review", post(reviews::handlers::submit_review_handler))
        .route("/api/check-in/:ref_id", post(bookings::handlers::check_in_handler))
        .route("/api/availability", get(bookings::handlers::availability_handler))
        .route("/api/receipts", get(bookings::handlers::receipts_handler))
        // Staff
        .route("/api/staff/schedule", get(bookings::handlers::staff_schedule_handler))
        .route("/api/staff/notifications", get(notifications::staff_feed_handler))
        .route("/api/reviews", get(reviews::handlers::list_reviews_handler))
        .route("/api/reviews/:id/reply", post(reviews::handlers::reply_handler))
        .route("/api/reviews/:id/compensation", post(reviews::handlers::compensation_handler))
        // Rewards
        .route("/api/rewards", get(rewards::handlers::rewards_overview_handler))
        .route("/api/rewards/vouchers", get(rewards::handlers::vouchers_handler))
        .route("/api/rewards/redeem", post(rewards::handlers::redeem_handler))
        .route("/api/rewards/history", get(rewards::handlers::point_history_handler))
        // Notifications
        .route("/api/notifications", get(notifications::list_notifications_handler))
        .route("/api/notifications/read", post(notifications::mark_all_read_handler))
        .route("/api/notifications/:id/read", post(notifications::mark_read_handler))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Lumina Salon API - Starting...");

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&database_url)
        .await
        .expect("Failed to create database pool");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    let app = create_router(db_pool);

    let addr = format!("{}:{}", host, port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Lumina Salon API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}

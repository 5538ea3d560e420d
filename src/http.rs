use crate::backend::BookingBackend;
use crate::types::{format_date, format_time, is_time_format_valid, BookingError};
use crate::AppState;
use axum::extract::{Query, Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SelectDateRequest {
    user_id: i64,
    date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BookRequest {
    user_id: i64,
    time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResetRequest {
    user_id: i64,
}

#[derive(Debug, Deserialize)]
struct UserQuery {
    user_id: i64,
}

#[derive(Debug, Deserialize)]
struct BookableQuery {
    user_id: i64,
    time: String,
}

pub fn app<T: BookingBackend>(state: AppState<T>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public = Router::new()
        .route("/dates", get(get_dates))
        .route("/times", get(get_times))
        .route("/bookable", get(get_bookable))
        .route("/select_date", post(select_date))
        .route("/book", post(book))
        .route("/reset", post(reset));

    let admin = Router::new()
        .route("/bookers", get(get_bookers))
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_auth::<T>));

    Router::new()
        .merge(public)
        .merge(admin)
        .with_state(state)
        .layer(cors)
}

pub async fn start_server<T: BookingBackend>(state: AppState<T>, bind_address: String) {
    let listener = tokio::net::TcpListener::bind(&bind_address).await.unwrap();
    tracing::info!(%bind_address, "listening");
    axum::serve(listener, app(state)).await.unwrap();
}

async fn admin_auth<T: BookingBackend>(
    State(state): State<AppState<T>>,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    match request.headers().get("x-admin-password") {
        Some(header) if header.to_str().unwrap_or("") == state.admin_password => {
            Ok(next.run(request).await)
        }
        Some(_) => Err((StatusCode::UNAUTHORIZED, "Unauthorized".to_string())),
        None => Err((StatusCode::UNAUTHORIZED, "Missing credentials".to_string())),
    }
}

fn error_response(err: BookingError) -> (StatusCode, String) {
    let status = match err {
        BookingError::InvalidFormat | BookingError::NotInFuture => StatusCode::UNPROCESSABLE_ENTITY,
        BookingError::NotFound => StatusCode::NOT_FOUND,
        BookingError::NotFree => StatusCode::CONFLICT,
        BookingError::NoActiveSession => StatusCode::PRECONDITION_FAILED,
    };
    (status, err.to_string())
}

async fn get_dates<T: BookingBackend>(State(state): State<AppState<T>>) -> impl IntoResponse {
    let now = Local::now().naive_local();
    Json(state.backend.available_dates(state.window_days, now))
}

async fn get_times<T: BookingBackend>(
    State(state): State<AppState<T>>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<String>>, (StatusCode, String)> {
    let now = Local::now().naive_local();
    match state.backend.available_times(query.user_id, now) {
        Ok(times) => Ok(Json(times.into_iter().map(format_time).collect())),
        Err(err) => Err(error_response(err)),
    }
}

async fn get_bookable<T: BookingBackend>(
    State(state): State<AppState<T>>,
    Query(query): Query<BookableQuery>,
) -> impl IntoResponse {
    let now = Local::now().naive_local();
    Json(state.backend.is_slot_bookable(query.user_id, &query.time, now))
}

async fn select_date<T: BookingBackend>(
    State(state): State<AppState<T>>,
    Json(request): Json<SelectDateRequest>,
) -> impl IntoResponse {
    let now = Local::now().naive_local();
    match state.backend.select_date(request.user_id, &request.date, now) {
        Ok(date) => (StatusCode::OK, format!("Date {} selected", format_date(date))),
        Err(err) => error_response(err),
    }
}

async fn book<T: BookingBackend>(
    State(state): State<AppState<T>>,
    Json(request): Json<BookRequest>,
) -> impl IntoResponse {
    // early format check; the backend re-validates everything anyway
    if !is_time_format_valid(&request.time) {
        return error_response(BookingError::InvalidFormat);
    }
    let now = Local::now().naive_local();
    match state.backend.book(request.user_id, &request.time, now) {
        Ok(time) => (
            StatusCode::OK,
            format!("Slot {} booked successfully", format_time(time)),
        ),
        Err(err) => error_response(err),
    }
}

async fn reset<T: BookingBackend>(
    State(state): State<AppState<T>>,
    Json(request): Json<ResetRequest>,
) -> impl IntoResponse {
    state.backend.reset_session(request.user_id);
    (StatusCode::OK, "Session reset".to_string())
}

async fn get_bookers<T: BookingBackend>(State(state): State<AppState<T>>) -> impl IntoResponse {
    Json(state.backend.recent_bookers())
}

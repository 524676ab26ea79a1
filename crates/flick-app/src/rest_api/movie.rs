use axum::{response::IntoResponse, routing::get};
use flick_dal::movie::{CreateMovie, MovieRepository};
use http::{header::LOCATION, StatusCode};
use tracing::debug;

use crate::{
    error::ApiResult,
    rest_api::{decode::ReadJson, envelope::envelope, RecordId},
    state::AppState,
    validate::Validated,
};

crate::repository_from_request!(MovieRepository);

pub async fn create(
    repository: MovieRepository,
    Validated(ReadJson(payload)): Validated<ReadJson<CreateMovie>>,
) -> ApiResult<impl IntoResponse> {
    let movie = repository.insert(payload).await?;
    debug!("Created movie {}", movie.id);
    let location = format!("/v1/movies/{}", movie.id);

    Ok(envelope("movie", movie)
        .with_status(StatusCode::CREATED)
        .with_header(LOCATION, location))
}

pub async fn list(repository: MovieRepository) -> ApiResult<impl IntoResponse> {
    let movies = repository.list().await?;
    Ok(envelope("movies", movies))
}

pub async fn get_one(
    RecordId(id): RecordId,
    repository: MovieRepository,
) -> ApiResult<impl IntoResponse> {
    let movie = repository.get(id).await?;
    Ok(envelope("movie", movie))
}

/// Full replace of the movie, responds with the new version.
pub async fn update(
    RecordId(id): RecordId,
    repository: MovieRepository,
    Validated(ReadJson(payload)): Validated<ReadJson<CreateMovie>>,
) -> ApiResult<impl IntoResponse> {
    let mut movie = repository.get(id).await?;
    movie.replace_with(payload);
    let movie = repository.update(movie).await?;
    debug!("Updated movie {} to version {}", movie.id, movie.version);

    Ok(envelope("movie", movie))
}

pub async fn delete(
    RecordId(id): RecordId,
    repository: MovieRepository,
) -> ApiResult<impl IntoResponse> {
    repository.delete(id).await?;
    debug!("Deleted movie {id}");

    Ok(envelope("message", "movie successfully deleted"))
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(update).delete(delete))
}

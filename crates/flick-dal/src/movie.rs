use std::fmt::Display;
use std::time::Duration;

use flick_types::validator::{Validate, Validator, unique};
use futures::StreamExt as _;
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Row, types::Json};

use crate::{ChosenRow, Error, error::Result};

const ENTITY: &str = "Movie";

pub const MAX_TITLE_BYTES: usize = 500;
pub const MIN_YEAR: i32 = 1888;
pub const MAX_GENRES: usize = 5;

/// Running time in minutes. Zero means not set.
///
/// Serialized as `"<n> mins"`, deserialized from that form or a plain integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Runtime(pub i32);

impl Runtime {
    pub fn minutes(&self) -> i32 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Display for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} mins", self.0)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid runtime format")]
pub struct InvalidRuntimeFormat;

impl std::str::FromStr for Runtime {
    type Err = InvalidRuntimeFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(' ');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(minutes), Some("mins"), None) => minutes
                .parse::<i32>()
                .map(Runtime)
                .map_err(|_| InvalidRuntimeFormat),
            _ => Err(InvalidRuntimeFormat),
        }
    }
}

impl Serialize for Runtime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Runtime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RuntimeVisitor;

        impl serde::de::Visitor<'_> for RuntimeVisitor {
            type Value = Runtime;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("runtime as \"<n> mins\" or integer minutes")
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Runtime, E> {
                i32::try_from(v)
                    .map(Runtime)
                    .map_err(|_| E::custom(InvalidRuntimeFormat))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Runtime, E> {
                i32::try_from(v)
                    .map(Runtime)
                    .map_err(|_| E::custom(InvalidRuntimeFormat))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Runtime, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(RuntimeVisitor)
    }
}

fn is_zero(v: &i32) -> bool {
    *v == 0
}

#[derive(Debug, Clone, Serialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub year: i32,
    #[serde(skip_serializing_if = "Runtime::is_zero")]
    pub runtime: Runtime,
    pub genres: Vec<String>,
    pub version: i32,
    #[serde(skip)]
    pub created_at: time::PrimitiveDateTime,
    #[serde(skip)]
    pub updated_at: Option<time::PrimitiveDateTime>,
}

impl Movie {
    /// Replaces all client editable fields, identity and version stay.
    pub fn replace_with(&mut self, payload: CreateMovie) {
        self.title = payload.title;
        self.year = payload.year;
        self.runtime = payload.runtime;
        self.genres = payload.genres.unwrap_or_default();
    }
}

impl sqlx::FromRow<'_, ChosenRow> for Movie {
    fn from_row(row: &ChosenRow) -> Result<Self, sqlx::Error> {
        let genres: Json<Vec<String>> = row.try_get("genres")?;
        Ok(Movie {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            year: row.try_get("year")?,
            runtime: Runtime(row.try_get("runtime")?),
            genres: genres.0,
            version: row.try_get("version")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// JSON `null` decodes as the zero value, same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Candidate movie as sent by clients, for both create and full update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CreateMovie {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub year: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub runtime: Runtime,
    pub genres: Option<Vec<String>>,
}

impl Validate for CreateMovie {
    fn validate(&self, v: &mut Validator) {
        validate_movie(v, self)
    }
}

pub fn validate_movie(v: &mut Validator, movie: &CreateMovie) {
    let current_year = time::OffsetDateTime::now_utc().year();
    validate_movie_for_year(v, movie, current_year)
}

pub(crate) fn validate_movie_for_year(v: &mut Validator, movie: &CreateMovie, current_year: i32) {
    v.check(!movie.title.is_empty(), "title", "must be provided");
    v.check(
        movie.title.len() <= MAX_TITLE_BYTES,
        "title",
        format!("must not be more than {MAX_TITLE_BYTES} bytes long"),
    );

    v.check(movie.year != 0, "year", "must be provided");
    v.check(
        movie.year >= MIN_YEAR,
        "year",
        format!("must be greater than {MIN_YEAR}"),
    );
    v.check(movie.year <= current_year, "year", "must not be in the future");

    v.check(movie.runtime.0 != 0, "runtime", "must be provided");
    v.check(movie.runtime.0 > 0, "runtime", "must be a positive integer");

    let genres = movie.genres.as_deref();
    v.check(genres.is_some(), "genres", "must be provided");
    let genres = genres.unwrap_or_default();
    v.check(!genres.is_empty(), "genres", "must contain at least 1 genre");
    v.check(
        genres.len() <= MAX_GENRES,
        "genres",
        format!("must not contain more than {MAX_GENRES} genres"),
    );
    v.check(unique(genres), "genres", "must not contain duplicate values");
}

/// Failure while listing; rows read before the failure are kept in `partial`.
#[derive(Debug, thiserror::Error)]
#[error("{source}")]
pub struct ListError {
    pub partial: Vec<Movie>,
    #[source]
    pub source: Error,
}

const SELECT_ONE: &str = "SELECT id, title, year, runtime, genres, version, created_at, updated_at \
    FROM movies WHERE id = ?";
const SELECT_ALL: &str = "SELECT id, title, year, runtime, genres, version, created_at, updated_at \
    FROM movies ORDER BY id";

pub type MovieRepository = MovieRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct MovieRepositoryImpl<E> {
    executor: E,
    timeout: Option<Duration>,
}

impl<'c, E> MovieRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            timeout: None,
        }
    }

    /// Every operation fails with a storage error once `timeout` elapses.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn within<T>(&self, op: impl Future<Output = Result<T>>) -> Result<T> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, op)
                .await
                .unwrap_or_else(|_| Err(Error::timed_out())),
            None => op.await,
        }
    }

    pub async fn insert(&self, payload: CreateMovie) -> Result<Movie> {
        let genres = payload.genres.unwrap_or_default();
        let (id, version, created_at): (i64, i32, time::PrimitiveDateTime) = self
            .within(async {
                let row = sqlx::query_as(
                    "INSERT INTO movies (title, year, runtime, genres) VALUES (?, ?, ?, ?) \
                     RETURNING id, version, created_at",
                )
                .bind(&payload.title)
                .bind(payload.year)
                .bind(payload.runtime.0)
                .bind(Json(&genres))
                .fetch_one(&self.executor)
                .await?;
                Ok::<_, Error>(row)
            })
            .await?;

        Ok(Movie {
            id,
            title: payload.title,
            year: payload.year,
            runtime: payload.runtime,
            genres,
            version,
            created_at,
            updated_at: None,
        })
    }

    pub async fn get(&self, id: i64) -> Result<Movie> {
        if id < 1 {
            return Err(Error::not_found(ENTITY));
        }
        let record = self
            .within(async {
                let record = sqlx::query_as::<_, Movie>(SELECT_ONE)
                    .bind(id)
                    .fetch_optional(&self.executor)
                    .await?;
                Ok::<_, Error>(record)
            })
            .await?;
        record.ok_or_else(|| Error::not_found(ENTITY))
    }

    /// Overwrites the stored record and bumps its version by one.
    ///
    /// The version carried by `movie` is not compared with the stored one.
    pub async fn update(&self, mut movie: Movie) -> Result<Movie> {
        if movie.id < 1 {
            return Err(Error::not_found(ENTITY));
        }
        let version: Option<i32> = self
            .within(async {
                let version = sqlx::query_scalar(
                    "UPDATE movies SET title = ?, year = ?, runtime = ?, genres = ?, \
                     version = version + 1 WHERE id = ? RETURNING version",
                )
                .bind(&movie.title)
                .bind(movie.year)
                .bind(movie.runtime.0)
                .bind(Json(&movie.genres))
                .bind(movie.id)
                .fetch_optional(&self.executor)
                .await?;
                Ok::<_, Error>(version)
            })
            .await?;

        match version {
            Some(version) => {
                movie.version = version;
                Ok(movie)
            }
            None => Err(Error::not_found(ENTITY)),
        }
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if id < 1 {
            return Err(Error::not_found(ENTITY));
        }
        let res = self
            .within(async {
                let res = sqlx::query("DELETE FROM movies WHERE id = ?")
                    .bind(id)
                    .execute(&self.executor)
                    .await?;
                Ok::<_, Error>(res)
            })
            .await?;

        if res.rows_affected() == 0 {
            Err(Error::not_found(ENTITY))
        } else {
            Ok(())
        }
    }

    pub async fn list(&self) -> Result<Vec<Movie>, ListError> {
        let deadline = self.timeout.map(|t| tokio::time::Instant::now() + t);
        let mut rows = sqlx::query_as::<_, Movie>(SELECT_ALL).fetch(&self.executor);
        let mut movies = Vec::new();
        loop {
            let next = match deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, rows.next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        return Err(ListError {
                            partial: movies,
                            source: Error::timed_out(),
                        });
                    }
                },
                None => rows.next().await,
            };
            match next {
                Some(Ok(movie)) => movies.push(movie),
                Some(Err(e)) => {
                    return Err(ListError {
                        partial: movies,
                        source: e.into(),
                    });
                }
                None => break,
            }
        }
        Ok(movies)
    }
}

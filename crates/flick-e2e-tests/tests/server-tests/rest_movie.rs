use flick_e2e_tests::{
    base_url, extend_url, prepare_env, random_port, rest::create_movie, spawn_server,
    wait_for_server,
};
use flick_server::{build_state, run::run_graceful_with_state};
use serde_json::json;
use tracing::info;
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn test_movie_lifecycle() {
    let (args, _config_guard) = prepare_env("test_movie_lifecycle").await.unwrap();
    let base_url = spawn_server(args).await.unwrap();
    let client = reqwest::Client::new();
    let api_url = base_url.join("v1/movies").unwrap();

    let movie = create_movie(
        &client,
        &base_url,
        &json!({"title": "Moana", "year": 2016, "runtime": "107 mins", "genres": ["animation", "adventure"]}),
    )
    .await
    .unwrap();
    let id = movie["id"].as_i64().unwrap();
    assert_eq!(movie["version"], 1);
    assert_eq!(movie["runtime"], "107 mins");

    let movie_url = extend_url(&api_url, id);
    let response = client.get(movie_url.clone()).send().await.unwrap();
    info! {"Response: {:#?}", response};
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["movie"]["title"], "Moana");

    let response = client
        .put(movie_url.clone())
        .json(&json!({"title": "Moana", "year": 2016, "runtime": 107, "genres": ["animation"]}))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["movie"]["version"], 2);
    assert_eq!(body["movie"]["genres"], json!(["animation"]));

    let response = client
        .put(movie_url.clone())
        .json(&json!({"title": "Moana", "year": 2016, "runtime": 107, "genres": ["animation", "animation"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 422);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"]["genres"], "must not contain duplicate values");

    let response = client.get(api_url.clone()).send().await.unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["movies"].as_array().unwrap().len(), 1);

    let response = client.delete(movie_url.clone()).send().await.unwrap();
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "movie successfully deleted");

    let response = client.get(movie_url).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
#[traced_test]
async fn test_list_rows_inserted_directly() {
    let (args, _config_guard) = prepare_env("test_list_rows").await.unwrap();

    let pool = flick_dal::new_pool(&args.database_url()).await.unwrap();
    flick_dal::migrate(&pool).await.unwrap();
    let mut transaction = pool.begin().await.unwrap();
    for n in 1..=30 {
        sqlx::query("INSERT INTO movies (title, year, runtime, genres) VALUES (?, ?, ?, ?)")
            .bind(format!("Movie {n}"))
            .bind(1950 + n)
            .bind(80 + n)
            .bind(r#"["drama"]"#)
            .execute(&mut *transaction)
            .await
            .unwrap();
    }
    transaction.commit().await.unwrap();
    pool.close().await;

    let base_url = spawn_server(args).await.unwrap();
    let client = reqwest::Client::new();
    let response = client
        .get(base_url.join("v1/movies").unwrap())
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    let movies = body["movies"].as_array().unwrap();
    assert_eq!(movies.len(), 30);
    assert_eq!(movies[0]["title"], "Movie 1");
    assert_eq!(movies[29]["runtime"], "110 mins");
}

#[tokio::test]
#[traced_test]
async fn test_movies_survive_restart() {
    let (mut args, _config_guard) = prepare_env("test_restart").await.unwrap();

    let state = build_state(&args).await.unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(run_graceful_with_state(args.clone(), state, async move {
        let _ = rx.await;
    }));
    let url = base_url(&args).unwrap();
    wait_for_server(&url).await.unwrap();

    let client = reqwest::Client::new();
    let movie = create_movie(
        &client,
        &url,
        &json!({"title": "Heat", "year": 1995, "runtime": 170, "genres": ["crime"]}),
    )
    .await
    .unwrap();
    drop(client);

    tx.send(()).unwrap();
    server.await.unwrap().unwrap();

    args.port = random_port().unwrap();
    let url = spawn_server(args).await.unwrap();
    let client = reqwest::Client::new();
    let movie_url = extend_url(&url.join("v1/movies").unwrap(), movie["id"].as_i64().unwrap());
    let response = client.get(movie_url).send().await.unwrap();
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["movie"], movie);
}

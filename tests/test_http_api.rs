//! Drives the HTTP API in-process: router bound to an ephemeral port,
//! requests sent with reqwest.

use pet_shelter::{transport, ShelterService};
use serde_json::{json, Value};

async fn start_server() -> Result<(String, tokio::task::JoinHandle<()>), Box<dyn std::error::Error>> {
    let (service, report) = ShelterService::connect("sqlite::memory:", true).await?;
    assert!(report.is_clean());
    let router = transport::http::create_router(transport::http::AppState::new(service));

    // Bind to an ephemeral port to avoid conflicts if an API server is already running.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Ok((format!("http://127.0.0.1:{}", port), handle))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_adoption_over_http() -> Result<(), Box<dyn std::error::Error>> {
    let (base_url, server) = start_server().await?;
    let client = reqwest::Client::new();

    let health = client.get(format!("{}/health", base_url)).send().await?;
    assert_eq!(health.status(), 200);

    // --- register a pet and an adopter ---
    let pet = client
        .post(format!("{}/api/pets", base_url))
        .json(&json!({ "name": "Rex", "breed": "Lab", "age": 3, "gender": "M" }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert!(pet["success"].as_bool().unwrap_or(false));
    let pet_id = pet["data"]["pet_id"].as_i64().unwrap();

    let adopter = client
        .post(format!("{}/api/adopters", base_url))
        .json(&json!({ "name": "Jo", "phone": "555", "city": "NYC" }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let adopter_id = adopter["data"]["adopter_id"].as_i64().unwrap();

    let pets = client
        .get(format!("{}/api/pets", base_url))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(pets["data"][0]["status"], "Available");

    // --- adopt ---
    let adopt = client
        .post(format!("{}/api/adoptions", base_url))
        .json(&json!({ "pet_id": pet_id, "adopter_id": adopter_id.to_string() }))
        .send()
        .await?;
    assert_eq!(adopt.status(), 200);

    let again = client
        .post(format!("{}/api/adoptions", base_url))
        .json(&json!({ "pet_id": pet_id, "adopter_id": adopter_id }))
        .send()
        .await?;
    assert_eq!(again.status(), 409);
    let again = again.json::<Value>().await?;
    assert_eq!(again["data"]["title"], "Adoption Failed");

    let report = client
        .get(format!("{}/api/reports/adopted", base_url))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let rows = report["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["pet_name"], "Rex");
    assert_eq!(rows[0]["city"], "NYC");

    let count = client
        .get(format!("{}/api/pets/available-count", base_url))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(count["data"]["available"], 0);

    // --- delete ---
    let deleted = client
        .delete(format!("{}/api/pets/{}", base_url, pet_id))
        .send()
        .await?;
    assert_eq!(deleted.status(), 200);
    let report = client
        .get(format!("{}/api/reports/adopted", base_url))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert!(report["data"].as_array().unwrap().is_empty());

    server.abort();
    let _ = server.await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_execute_endpoint_and_errors() -> Result<(), Box<dyn std::error::Error>> {
    let (base_url, server) = start_server().await?;
    let client = reqwest::Client::new();

    let actions = client
        .get(format!("{}/api/actions", base_url))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(actions.as_array().unwrap().len(), 11);
    assert_eq!(actions[0]["key"], "add_pet");

    let added = client
        .post(format!("{}/api/execute", base_url))
        .json(&json!({
            "action": "add_pet",
            "fields": { "name": "Mia", "breed": "Siamese", "age": "2", "gender": "F" }
        }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(added["data"]["kind"], "notice");
    assert_eq!(added["data"]["message"], "Pet added successfully!");

    let table = client
        .post(format!("{}/api/execute", base_url))
        .json(&json!({ "action": "view_pets" }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(table["data"]["kind"], "table");
    assert_eq!(table["data"]["rows"][0][1], "Mia");

    let bad_age = client
        .post(format!("{}/api/execute", base_url))
        .json(&json!({ "action": "add_pet", "fields": { "age": "old" } }))
        .send()
        .await?;
    assert_eq!(bad_age.status(), 400);

    let unknown = client
        .post(format!("{}/api/execute", base_url))
        .json(&json!({ "action": "teleport" }))
        .send()
        .await?;
    assert_eq!(unknown.status(), 400);

    let exit = client
        .post(format!("{}/api/execute", base_url))
        .json(&json!({ "action": "exit" }))
        .send()
        .await?;
    assert_eq!(exit.status(), 400);

    let missing = client
        .put(format!("{}/api/pets/404/name", base_url))
        .json(&json!({ "new_name": "Ghost" }))
        .send()
        .await?;
    assert_eq!(missing.status(), 404);

    let not_json = client
        .post(format!("{}/api/adoptions", base_url))
        .header("content-type", "application/json")
        .body("{")
        .send()
        .await?;
    assert_eq!(not_json.status(), 422);

    let empty_search = client
        .get(format!("{}/api/pets/search?name=", base_url))
        .send()
        .await?;
    assert_eq!(empty_search.status(), 400);

    server.abort();
    let _ = server.await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_shutdown_closes_the_session() -> Result<(), Box<dyn std::error::Error>> {
    let (service, _) = ShelterService::connect("sqlite::memory:", true).await?;
    let state = transport::http::AppState::new(service);
    let router = transport::http::create_router(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let server_state = state.clone();
    let server = tokio::spawn(async move {
        transport::http::serve_until(listener, router, &server_state, async {
            let _ = stop_rx.await;
        })
        .await
    });

    let health = reqwest::get(format!("http://127.0.0.1:{}/health", port)).await?;
    assert_eq!(health.status(), 200);

    stop_tx.send(()).map_err(|_| "server already stopped")?;
    server.await??;
    assert!(!state.service.lock().await.is_connected());
    Ok(())
}

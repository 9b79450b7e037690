mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{CannedProvider, TestApp};

fn goa_request() -> Value {
    json!({
        "destination": "Goa",
        "start_date": "2026-11-01",
        "duration_days": 3,
        "budget_tier": "mid",
        "max_budget": 30000,
        "traveler_count": 2,
        "trip_type": "couple",
        "interests": ["Food"]
    })
}

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new();
    let resp = app.get("/health", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "ok");
}

#[tokio::test]
async fn register_login_and_me() {
    let app = TestApp::new();
    let cookie = app.register("asha", "Monsoon!").await;

    let me = app.get("/api/v1/auth/me", Some(&cookie)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.json()["username"], "asha");
    assert!(me.json().get("password_hash").is_none());

    let login = app
        .json(
            "POST",
            "/api/v1/auth/login",
            Some(json!({ "username": "asha", "password": "Monsoon!" })),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert!(login.cookie("wanderlust_session").is_some());
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let app = TestApp::new();
    app.register("asha", "one").await;

    let resp = app
        .json(
            "POST",
            "/api/v1/auth/register",
            Some(json!({ "username": "asha", "password": "two" })),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::CONFLICT);
    assert_eq!(resp.json()["error"], "Username already taken");
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() {
    let app = TestApp::new();
    app.register("asha", "Monsoon!").await;

    for (username, password) in [("asha", "monsoon!"), ("nobody", "Monsoon!")] {
        let resp = app
            .json(
                "POST",
                "/api/v1/auth/login",
                Some(json!({ "username": username, "password": password })),
                None,
            )
            .await;
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn api_requires_session() {
    let app = TestApp::new();
    let resp = app.get("/api/v1/trips", None).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);

    let resp = app.get("/api/v1/trips", Some("wanderlust_session=bogus")).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);

    let resp = app.get("/api/v1/trips", Some("wanderlust_session=")).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_ends_session() {
    let app = TestApp::new();
    let cookie = app.register("asha", "pw").await;

    let resp = app.json("POST", "/api/v1/auth/logout", None, Some(&cookie)).await;
    assert_eq!(resp.status, StatusCode::OK);

    let me = app.get("/api/v1/auth/me", Some(&cookie)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn generate_without_providers_uses_offline_itinerary() {
    let app = TestApp::new();
    let cookie = app.register("asha", "pw").await;

    let resp = app
        .json("POST", "/api/v1/itineraries", Some(goa_request()), Some(&cookie))
        .await;
    assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.body);

    let body = resp.json();
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["cached"], false);
    assert!(body["logistics"].is_null());

    let itinerary = &body["trip"]["itinerary"];
    assert_eq!(itinerary["trip_title"], "The Ultimate Goa Experience");
    let days = itinerary["days"].as_array().unwrap();
    assert_eq!(days.len(), 3);
    assert_eq!(days[0]["day"], 1);
    assert_eq!(days[0]["theme"], "Arrival & Discovery");
    assert_eq!(days[2]["theme"], "Departure");
    assert!(!itinerary["hotel_recommendations"].as_array().unwrap().is_empty());
    assert!(!itinerary["dining_recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn generate_with_origin_estimates_logistics() {
    let app = TestApp::new();
    let cookie = app.register("asha", "pw").await;

    let mut request = goa_request();
    request["origin"] = json!("Mumbai");
    let resp = app
        .json("POST", "/api/v1/itineraries", Some(request), Some(&cookie))
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);

    let logistics = &resp.json()["logistics"];
    let distance = logistics["distance_km"].as_u64().unwrap();
    assert!((350..550).contains(&distance), "{distance}");
    assert_eq!(logistics["costs"]["flight"]["inr"], 4000 + 10 * distance);
    assert_eq!(logistics["costs"]["train"]["inr"], 500 + 2 * distance);
}

#[tokio::test]
async fn invalid_requests_are_rejected() {
    let app = TestApp::new();
    let cookie = app.register("asha", "pw").await;

    let mut zero_days = goa_request();
    zero_days["duration_days"] = json!(0);
    let resp = app
        .json("POST", "/api/v1/itineraries", Some(zero_days), Some(&cookie))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let mut blank = goa_request();
    blank["destination"] = json!("   ");
    let resp = app
        .json("POST", "/api/v1/itineraries", Some(blank), Some(&cookie))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json()["error"], "Destination is required");
}

#[tokio::test]
async fn remote_itinerary_is_conformed_to_duration() {
    let reply = r#"Here you go!
```json
{
  "trip_title": "Goa Unplugged",
  "travel_persona": "Beach Couple",
  "days": [
    {"day": 1, "theme": "Beaches", "activities": [
      {"time": "10:00", "activity": "Baga Beach", "description": "Swim", "location": "15.55, 73.75", "cost": "₹0"}
    ]},
    {"day": 2, "activities": []},
    {"day": 9, "activities": []}
  ],
  "hotel_recommendations": ["Taj Fort Aguada"],
  "safety_tips": "Mind the tides."
}
```"#;
    let app = TestApp::with_providers(vec![
        CannedProvider::failing("gemini:test"),
        CannedProvider::replying("groq:test", reply),
    ]);
    let cookie = app.register("asha", "pw").await;

    let resp = app
        .json("POST", "/api/v1/itineraries", Some(goa_request()), Some(&cookie))
        .await;
    let body = resp.json();
    assert_eq!(body["source"], "groq:test");

    let itinerary = &body["trip"]["itinerary"];
    assert_eq!(itinerary["trip_title"], "Goa Unplugged");
    let days: Vec<u64> = itinerary["days"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["day"].as_u64().unwrap())
        .collect();
    assert_eq!(days, vec![1, 2, 3]);
    assert_eq!(itinerary["days"][2]["theme"], "Departure");
    assert_eq!(itinerary["hotel_recommendations"][0]["name"], "Taj Fort Aguada");

    // Same request again is served from the cache.
    let again = app
        .json("POST", "/api/v1/itineraries", Some(goa_request()), Some(&cookie))
        .await;
    assert_eq!(again.json()["cached"], true);
}

#[tokio::test]
async fn prose_replies_fall_through_to_offline() {
    let app = TestApp::with_providers(vec![CannedProvider::replying(
        "gemini:test",
        "Sorry, I can't plan trips today.",
    )]);
    let cookie = app.register("asha", "pw").await;

    let resp = app
        .json("POST", "/api/v1/itineraries", Some(goa_request()), Some(&cookie))
        .await;
    assert_eq!(resp.json()["source"], "fallback");
}

#[tokio::test]
async fn history_is_newest_first_and_notes_update() {
    let app = TestApp::new();
    let cookie = app.register("asha", "pw").await;

    let mut ids = Vec::new();
    for city in ["Goa", "Jaipur"] {
        let mut request = goa_request();
        request["destination"] = json!(city);
        let resp = app
            .json("POST", "/api/v1/itineraries", Some(request), Some(&cookie))
            .await;
        ids.push(resp.json()["trip"]["id"].as_i64().unwrap());
    }

    let list = app.get("/api/v1/trips", Some(&cookie)).await.json();
    let cities: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["destination"].as_str().unwrap())
        .collect();
    assert_eq!(cities, vec!["Jaipur", "Goa"]);

    let updated = app
        .json(
            "PUT",
            &format!("/api/v1/trips/{}/notes", ids[0]),
            Some(json!({ "notes": "Book the ferry early" })),
            Some(&cookie),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.json()["notes"], "Book the ferry early");

    let jaipur = app
        .get(&format!("/api/v1/trips/{}", ids[1]), Some(&cookie))
        .await
        .json();
    assert_eq!(jaipur["notes"], "");
}

#[tokio::test]
async fn trips_are_private() {
    let app = TestApp::new();
    let asha = app.register("asha", "pw").await;
    let ravi = app.register("ravi", "pw").await;

    let resp = app
        .json("POST", "/api/v1/itineraries", Some(goa_request()), Some(&asha))
        .await;
    let id = resp.json()["trip"]["id"].as_i64().unwrap();

    let resp = app.get(&format!("/api/v1/trips/{id}"), Some(&ravi)).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let resp = app
        .json(
            "PUT",
            &format!("/api/v1/trips/{id}/notes"),
            Some(json!({ "notes": "mine" })),
            Some(&ravi),
        )
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let list = app.get("/api/v1/trips", Some(&ravi)).await.json();
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn place_suggestions() {
    let app = TestApp::new();

    let short = app.get("/api/v1/places/suggest?q=Go", None).await;
    assert_eq!(short.status, StatusCode::OK);
    assert_eq!(short.json(), json!([]));

    let goa = app.get("/api/v1/places/suggest?q=goa", None).await;
    assert_eq!(goa.json(), json!(["Goa, India"]));

    let india = app.get("/api/v1/places/suggest?q=India", None).await;
    assert_eq!(india.json().as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn logistics_endpoint() {
    let app = TestApp::new();

    let resp = app
        .get("/api/v1/logistics?origin=Mumbai&destination=Goa", None)
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.json()["times"]["flight"].as_str().unwrap().ends_with('h'));

    let unknown = app
        .get("/api/v1/logistics?origin=Atlantis&destination=Goa", None)
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn budget_summary_respects_exclusions() {
    let app = TestApp::new();
    let cookie = app.register("asha", "pw").await;

    let itinerary = app
        .json("POST", "/api/v1/itineraries", Some(goa_request()), Some(&cookie))
        .await
        .json()["trip"]["itinerary"]
        .clone();

    let resp = app
        .json(
            "POST",
            "/api/v1/budget",
            Some(json!({
                "itinerary": itinerary,
                "max_budget": 8000,
                "excluded": [{ "day": 1, "index": 1 }]
            })),
            Some(&cookie),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    let summary = resp.json();
    assert_eq!(summary["total"], 7500.0);
    assert_eq!(summary["included_activities"], 8);
    assert_eq!(summary["remaining"], 500.0);
    assert_eq!(summary["over_budget"], false);
}

#[tokio::test]
async fn chat_answers_offline_without_providers() {
    let app = TestApp::new();
    let cookie = app.register("asha", "pw").await;

    let resp = app
        .json(
            "POST",
            "/api/v1/chat",
            Some(json!({ "question": "Is the ferry running?" })),
            Some(&cookie),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.json()["answer"].as_str().unwrap().contains("offline"));

    let missing = app
        .json(
            "POST",
            "/api/v1/chat",
            Some(json!({ "question": "Hi", "trip_id": 42 })),
            Some(&cookie),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn chat_uses_first_answering_provider() {
    let app = TestApp::with_providers(vec![
        CannedProvider::failing("gemini:test"),
        CannedProvider::replying("groq:test", "  Take the Konkan railway.  "),
    ]);
    let cookie = app.register("asha", "pw").await;

    let resp = app
        .json(
            "POST",
            "/api/v1/chat",
            Some(json!({ "question": "Best way from Mumbai?" })),
            Some(&cookie),
        )
        .await;
    assert_eq!(resp.json()["answer"], "Take the Konkan railway.");
}

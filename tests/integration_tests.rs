// Integration tests for SNIF Match

use std::sync::Arc;
use std::time::Duration;

use actix_web::{test, web, App};
use async_trait::async_trait;
use chrono::Utc;
use mockito::Matcher;
use tokio::sync::Mutex;

use snif_match::core::MatchFinder;
use snif_match::models::{
    ErrorResponse, Gender, Location, Match, MatchNotification, MatchStatus, OwnerPreferences, Pet,
    PetPurpose, PotentialMatchesResponse,
};
use snif_match::routes::{configure_routes, matches::AppState};
use snif_match::services::{
    DiscoveryError, DiscoveryService, InMemoryStore, MatchNotifier, MatchRepository,
    NotificationPublisher, OwnerRepository, PetDirectoryClient, PetQuery, PetRepository,
    PublishError, RoutingStrategy,
};

#[derive(Default)]
struct RecordingPublisher {
    published: Mutex<Vec<(String, MatchNotification)>>,
}

#[async_trait]
impl NotificationPublisher for RecordingPublisher {
    async fn publish(
        &self,
        routing_key: &str,
        notification: &MatchNotification,
    ) -> Result<(), PublishError> {
        self.published
            .lock()
            .await
            .push((routing_key.to_string(), notification.clone()));
        Ok(())
    }
}

struct FailingPublisher;

#[async_trait]
impl NotificationPublisher for FailingPublisher {
    async fn publish(&self, _: &str, _: &MatchNotification) -> Result<(), PublishError> {
        let err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        Err(PublishError::Serialization(err))
    }
}

fn create_pet(id: &str, gender: Gender, purposes: &[PetPurpose], lat: f64, lon: f64) -> Pet {
    Pet {
        id: id.to_string(),
        name: format!("Pet {}", id),
        species: "Dog".to_string(),
        breed: "Labrador".to_string(),
        gender,
        age: 4,
        purposes: purposes.to_vec(),
        location: Some(Location { latitude: lat, longitude: lon }),
        owner_id: format!("owner-{}", id),
    }
}

fn service_with(store: &Arc<InMemoryStore>, publisher: Arc<dyn NotificationPublisher>) -> DiscoveryService {
    DiscoveryService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        MatchNotifier::new(publisher, RoutingStrategy::PerOwner),
        MatchFinder::default(),
    )
}

/// P looks for breeding partners; Q and Z are eligible, X has a pending match with P
async fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());

    store
        .upsert_pet(create_pet("P", Gender::Male, &[PetPurpose::Breeding, PetPurpose::Playdate], 0.0, 0.0))
        .await;
    store
        .upsert_pet(create_pet("Q", Gender::Female, &[PetPurpose::Breeding], 0.0, 0.5))
        .await;
    store
        .upsert_pet(create_pet("R", Gender::Male, &[PetPurpose::Breeding], 0.0, 0.1))
        .await;
    store
        .upsert_pet(create_pet("X", Gender::Female, &[PetPurpose::Breeding], 0.0, 0.2))
        .await;
    store
        .upsert_pet(create_pet("Z", Gender::Female, &[PetPurpose::Breeding], 0.0, 0.3))
        .await;

    let mut cat = create_pet("C", Gender::Female, &[PetPurpose::Breeding], 0.0, 0.05);
    cat.species = "Cat".to_string();
    store.upsert_pet(cat).await;

    store.set_preferences(OwnerPreferences::new("owner-P", 100.0)).await;

    store
        .add_match(Match::pending("P", "X", PetPurpose::Breeding, Utc::now()))
        .await;
    let mut rejected = Match::pending("Z", "P", PetPurpose::Breeding, Utc::now());
    rejected.status = MatchStatus::Rejected;
    store.add_match(rejected).await;

    store
}

#[tokio::test]
async fn test_discover_ranks_and_notifies_candidate_owners() {
    let store = seeded_store().await;
    let publisher = Arc::new(RecordingPublisher::default());
    let service = service_with(&store, publisher.clone());

    let outcome = service.discover("P", Some(PetPurpose::Breeding)).await.unwrap();

    // X is excluded by its pending match, R is same gender, C is a cat
    let ids: Vec<&str> = outcome.matches.iter().map(|m| m.pet.id.as_str()).collect();
    assert_eq!(ids, vec!["Z", "Q"]);
    assert_eq!(outcome.notifications_sent, 2);

    let published = publisher.published.lock().await;
    assert_eq!(published.len(), 2);
    assert_eq!(published[0].0, "matches.owner-Z.Z");
    assert_eq!(published[1].0, "matches.owner-Q.Q");
    assert_eq!(published[1].1.owner_id, "owner-Q");
    assert_eq!(published[1].1.matched_owner_id, "owner-Q");
    assert_eq!(published[1].1.source_pet_id, "P");
    assert!((published[1].1.distance_km - 55.6).abs() < 0.2);
}

#[tokio::test]
async fn test_find_potential_matches_has_no_side_effects() {
    let store = seeded_store().await;
    let publisher = Arc::new(RecordingPublisher::default());
    let service = service_with(&store, publisher.clone());

    let (matches, total_candidates) = service
        .find_potential_matches("P", Some(PetPurpose::Breeding))
        .await
        .unwrap();

    assert_eq!(matches.len(), 2);
    // Dogs other than P and X
    assert_eq!(total_candidates, 3);
    assert!(publisher.published.lock().await.is_empty());
}

#[tokio::test]
async fn test_accepted_match_excludes_counterpart() {
    let store = seeded_store().await;
    let mut accepted = Match::pending("Q", "P", PetPurpose::Breeding, Utc::now());
    accepted.status = MatchStatus::Accepted;
    store.add_match(accepted).await;

    let service = service_with(&store, Arc::new(RecordingPublisher::default()));
    let (matches, _) = service
        .find_potential_matches("P", Some(PetPurpose::Breeding))
        .await
        .unwrap();

    let ids: Vec<&str> = matches.iter().map(|m| m.pet.id.as_str()).collect();
    assert_eq!(ids, vec!["Z"]);
}

#[tokio::test]
async fn test_discover_unknown_pet() {
    let store = seeded_store().await;
    let service = service_with(&store, Arc::new(RecordingPublisher::default()));

    let result = service.discover("missing", None).await;
    assert!(matches!(result, Err(DiscoveryError::PetNotFound(id)) if id == "missing"));
}

#[tokio::test]
async fn test_publish_failures_do_not_abort_discovery() {
    let store = seeded_store().await;
    let service = service_with(&store, Arc::new(FailingPublisher));

    let outcome = service.discover("P", Some(PetPurpose::Breeding)).await.unwrap();

    assert_eq!(outcome.matches.len(), 2);
    assert_eq!(outcome.notifications_sent, 0);
}

#[tokio::test]
async fn test_out_of_range_locations_never_match() {
    let store = Arc::new(InMemoryStore::new());

    store
        .upsert_pet(create_pet("S", Gender::Male, &[PetPurpose::Playdate], 0.0, 0.0))
        .await;
    store.set_preferences(OwnerPreferences::new("owner-S", 50.0)).await;
    // Wraps to ~5.6 km if taken at face value
    store
        .upsert_pet(create_pet("W", Gender::Female, &[PetPurpose::Playdate], 0.0, 360.05))
        .await;
    store
        .upsert_pet(create_pet("V", Gender::Female, &[PetPurpose::Playdate], 0.0, 0.2))
        .await;
    store
        .upsert_pet(create_pet("B", Gender::Female, &[PetPurpose::Playdate], 91.0, 0.0))
        .await;
    store.set_preferences(OwnerPreferences::new("owner-B", 500.0)).await;

    let publisher = Arc::new(RecordingPublisher::default());
    let service = service_with(&store, publisher.clone());

    let outcome = service.discover("S", None).await.unwrap();
    let ids: Vec<&str> = outcome.matches.iter().map(|m| m.pet.id.as_str()).collect();
    assert_eq!(ids, vec!["V"]);
    assert_eq!(outcome.notifications_sent, 1);

    let outcome = service.discover("B", None).await.unwrap();
    assert!(outcome.matches.is_empty());
    assert_eq!(outcome.notifications_sent, 0);

    let fan_out = service.announce_new_pet("W").await.unwrap();
    assert_eq!(fan_out.pets_scanned, 0);
    assert_eq!(fan_out.notifications_sent, 0);

    let published = publisher.published.lock().await;
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].1.matched_pet_id, "V");
}

#[tokio::test]
async fn test_new_pet_fan_out() {
    let store = Arc::new(InMemoryStore::new());

    // A: owner has a 50 km radius, new pet is ~11 km away
    store
        .upsert_pet(create_pet("A", Gender::Male, &[PetPurpose::Playdate], 0.0, 0.0))
        .await;
    store.set_preferences(OwnerPreferences::new("owner-A", 50.0)).await;

    // B: owner has no preferences, skipped
    store
        .upsert_pet(create_pet("B", Gender::Male, &[PetPurpose::Playdate], 0.0, 0.05))
        .await;

    // D: owner radius too small to reach the new pet
    store
        .upsert_pet(create_pet("D", Gender::Male, &[PetPurpose::Playdate], 0.0, 1.0))
        .await;
    store.set_preferences(OwnerPreferences::new("owner-D", 5.0)).await;

    store
        .upsert_pet(create_pet("N", Gender::Female, &[PetPurpose::Playdate], 0.0, 0.1))
        .await;

    let publisher = Arc::new(RecordingPublisher::default());
    let service = service_with(&store, publisher.clone());

    let outcome = service.announce_new_pet("N").await.unwrap();

    assert_eq!(outcome.pets_scanned, 2);
    assert_eq!(outcome.notifications_sent, 1);

    let published = publisher.published.lock().await;
    assert_eq!(published.len(), 1);
    let (routing_key, notification) = &published[0];
    assert_eq!(routing_key, "matches.owner-A.N");
    assert_eq!(notification.owner_id, "owner-A");
    assert_eq!(notification.matched_pet_id, "N");
    assert_eq!(notification.matched_owner_id, "owner-N");

    let json = serde_json::to_value(notification).unwrap();
    assert_eq!(json["matchedOwnerId"], "owner-N");
    assert_eq!(json["ownerId"], "owner-A");
    assert_eq!(notification.source_pet_id, "A");
}

#[tokio::test]
async fn test_new_pet_without_location_announces_nothing() {
    let store = Arc::new(InMemoryStore::new());
    store
        .upsert_pet(create_pet("A", Gender::Male, &[PetPurpose::Playdate], 0.0, 0.0))
        .await;
    store.set_preferences(OwnerPreferences::new("owner-A", 50.0)).await;

    let mut homeless = create_pet("N", Gender::Female, &[PetPurpose::Playdate], 0.0, 0.0);
    homeless.location = None;
    store.upsert_pet(homeless).await;

    let publisher = Arc::new(RecordingPublisher::default());
    let service = service_with(&store, publisher.clone());

    let outcome = service.announce_new_pet("N").await.unwrap();

    assert_eq!(outcome.pets_scanned, 0);
    assert_eq!(outcome.notifications_sent, 0);
    assert!(publisher.published.lock().await.is_empty());
}

#[tokio::test]
async fn test_new_pet_fan_out_survives_publish_failures() {
    let store = Arc::new(InMemoryStore::new());
    for id in ["A", "B"] {
        store
            .upsert_pet(create_pet(id, Gender::Male, &[PetPurpose::Playdate], 0.0, 0.0))
            .await;
        store
            .set_preferences(OwnerPreferences::new(format!("owner-{}", id), 50.0))
            .await;
    }
    store
        .upsert_pet(create_pet("N", Gender::Female, &[PetPurpose::Playdate], 0.0, 0.1))
        .await;

    let service = service_with(&store, Arc::new(FailingPublisher));
    let outcome = service.announce_new_pet("N").await.unwrap();

    assert_eq!(outcome.pets_scanned, 2);
    assert_eq!(outcome.notifications_sent, 0);
}

#[actix_web::test]
async fn test_health_endpoint() {
    let store = seeded_store().await;
    let state = AppState {
        discovery: service_with(&store, Arc::new(RecordingPublisher::default())),
    };
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
}

#[actix_web::test]
async fn test_potential_matches_endpoint() {
    let store = seeded_store().await;
    let state = AppState {
        discovery: service_with(&store, Arc::new(RecordingPublisher::default())),
    };
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/pets/P/potential-matches?purpose=Breeding")
        .to_request();
    let body: PotentialMatchesResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.pet_id, "P");
    assert_eq!(body.matches.len(), 2);
    assert_eq!(body.matches[0].pet_id, "Z");
    assert_eq!(body.notifications_sent, 2);

    let req = test::TestRequest::get()
        .uri("/api/v1/pets/nobody/potential-matches")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
}

#[actix_web::test]
async fn test_pet_created_endpoint() {
    let store = seeded_store().await;
    store.set_preferences(OwnerPreferences::new("owner-Z", 100.0)).await;
    store
        .upsert_pet(create_pet("N", Gender::Male, &[PetPurpose::Breeding], 0.0, 0.25))
        .await;

    let state = AppState {
        discovery: service_with(&store, Arc::new(RecordingPublisher::default())),
    };
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/pets/created")
        .set_json(serde_json::json!({ "petId": "N" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    // Only P and Z have owner preferences; P is rejected as a same-gender breeding pair
    assert_eq!(body["petId"], "N");
    assert_eq!(body["petsScanned"], 2);
    assert_eq!(body["notificationsSent"], 1);

    let req = test::TestRequest::post()
        .uri("/api/v1/pets/created")
        .set_json(serde_json::json!({ "petId": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

fn directory_client(url: String) -> PetDirectoryClient {
    PetDirectoryClient::new(url, "test-key".to_string(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_directory_get_pet() {
    let mut server = mockito::Server::new_async().await;
    let found = server
        .mock("GET", "/pets/p1")
        .match_header("X-Api-Key", "test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"id":"p1","name":"Rex","species":"Dog","breed":"Boxer","gender":"Male","age":5,
                "purposes":["Playdate"],"location":{"latitude":51.5,"longitude":-0.12},"ownerId":"o1"}"#,
        )
        .create_async()
        .await;
    let missing = server
        .mock("GET", "/pets/p2")
        .with_status(404)
        .create_async()
        .await;

    let client = directory_client(server.url());

    let pet = client.get_pet("p1").await.unwrap().unwrap();
    assert_eq!(pet.name, "Rex");
    assert_eq!(pet.gender, Gender::Male);
    assert_eq!(pet.owner_id, "o1");
    assert!(pet.location.is_some());

    assert!(client.get_pet("p2").await.unwrap().is_none());

    found.assert_async().await;
    missing.assert_async().await;
}

#[tokio::test]
async fn test_directory_find_pets_skips_malformed_and_filters() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/pets")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("exclude".into(), "a,b".into()),
            Matcher::UrlEncoded("species".into(), "Dog".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"pets":[
                {"id":"c","name":"Coco","species":"Dog","ownerId":"o3"},
                {"id":"d","name":"Dot"},
                {"id":"a","name":"Ace","species":"Dog","ownerId":"o1"},
                {"id":"e","name":"Eve","species":"Cat","ownerId":"o5"}
            ]}"#,
        )
        .create_async()
        .await;

    let client = directory_client(server.url());
    let query = PetQuery::excluding(["b".to_string(), "a".to_string()]).with_species("Dog");

    let pets = client.find_pets(&query).await.unwrap();

    let ids: Vec<&str> = pets.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["c"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_directory_server_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/owners/o1/preferences")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let client = directory_client(server.url());

    assert!(client.get_preferences("o1").await.is_err());
}

#[tokio::test]
async fn test_directory_preferences_and_matches() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/owners/o1/preferences")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ownerId":"o1","searchRadiusKm":25.0}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/pets/p1/matches")
        .match_query(Matcher::UrlEncoded("status".into(), "Pending,Accepted".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"matches":[
                {"id":"m1","initiatorPetId":"p1","targetPetId":"p2","purpose":"Playdate",
                 "status":"Pending","createdAt":"2026-01-01T00:00:00Z"},
                {"id":"m2","initiatorPetId":"p3","targetPetId":"p1","purpose":"Breeding",
                 "status":"Rejected","createdAt":"2026-01-01T00:00:00Z"}
            ]}"#,
        )
        .create_async()
        .await;

    let client = directory_client(server.url());

    let preferences = client.get_preferences("o1").await.unwrap().unwrap();
    assert_eq!(preferences.search_radius_km, 25.0);

    let matches = client
        .matches_for_pet("p1", &MatchStatus::ACTIVE)
        .await
        .unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].target_pet_id, "p2");
}

#[actix_web::test]
async fn test_malformed_body_returns_error_response() {
    let store = seeded_store().await;
    let state = AppState {
        discovery: service_with(&store, Arc::new(RecordingPublisher::default())),
    };
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/pets/created")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"petId\":")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "invalid_json");

    let req = test::TestRequest::get()
        .uri("/api/v1/pets/P/potential-matches?purpose=Grooming")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

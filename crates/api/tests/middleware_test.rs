use muster_api::middleware::{auth, error_handling::map_error};
use muster_core::errors::MusterError;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_error_handling_not_found() {
    let error = MusterError::NotFound("Resource not found".to_string());

    let response = map_error(error);

    assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_error_handling_invalid_input() {
    let error = MusterError::InvalidInput("Invalid input".to_string());

    let response = map_error(error);

    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_error_handling_unauthorized() {
    let error = MusterError::Unauthorized("Missing credentials".to_string());

    let response = map_error(error);

    assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_error_handling_forbidden() {
    let error = MusterError::Forbidden("Not allowed".to_string());

    let response = map_error(error);

    assert_eq!(response.status(), axum::http::StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_error_handling_conflict() {
    let error = MusterError::Conflict("Username taken".to_string());

    let response = map_error(error);

    assert_eq!(response.status(), axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_error_handling_transient() {
    let error = MusterError::Transient("Upstream flaked".to_string());

    let response = map_error(error);

    assert_eq!(response.status(), axum::http::StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_error_handling_database() {
    let error = MusterError::Database(eyre::eyre!("Database error"));

    let response = map_error(error);

    assert_eq!(
        response.status(),
        axum::http::StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn test_error_handling_internal() {
    let error = MusterError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    let response = map_error(error);

    assert_eq!(
        response.status(),
        axum::http::StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_password_hash_round_trip() {
    let hash = auth::hash_password("correct horse battery staple").unwrap();

    assert!(auth::verify_password("correct horse battery staple", &hash).unwrap());
    assert!(!auth::verify_password("wrong password", &hash).unwrap());
}

#[test]
fn test_password_hashes_are_salted() {
    let first = auth::hash_password("same password").unwrap();
    let second = auth::hash_password("same password").unwrap();

    // Fresh salt per hash, so the PHC strings differ
    assert_ne!(first, second);
}

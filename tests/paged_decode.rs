use pagereq::{PageReqError, PagedRequest};
use serde::Deserialize;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

#[derive(Debug, Deserialize, PartialEq)]
struct Listing {
    items: Vec<String>,
    next: Option<u32>,
}

fn listing_request() -> PagedRequest<String> {
    PagedRequest::<String>::builder("GET")
        .url(|base| format!("{}/listing", base))
        .build()
        .expect("request should build")
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_execute_into_decodes_json() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/listing"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"items":["a","b"],"next":2}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let listing: Listing = listing_request()
        .execute_into(&server.uri())
        .await
        .expect("listing should decode");
    assert_eq!(
        listing,
        Listing {
            items: vec!["a".to_string(), "b".to_string()],
            next: Some(2),
        }
    );
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_execute_into_reports_decode_error() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/listing"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>blocked</html>"))
        .mount(&server)
        .await;

    let err = listing_request()
        .execute_into::<Listing>(&server.uri())
        .await
        .expect_err("html is not a listing");
    assert!(matches!(err, PageReqError::Json(_)));
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_error_status_is_not_an_error() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/listing"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    let response = listing_request()
        .execute(&server.uri())
        .await
        .expect("status is passed through");
    assert_eq!(response.status(), 503);
    assert!(!response.is_success());
    assert_eq!(response.text(), "busy");
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_connection_failure_is_http_error() {
    let listener = match std::net::TcpListener::bind("127.0.0.1:0") {
        Ok(listener) => listener,
        Err(_) => return,
    };
    let base = format!("http://{}", listener.local_addr().expect("addr"));
    drop(listener);

    let err = listing_request()
        .execute(&base)
        .await
        .expect_err("nothing is listening");
    match err {
        PageReqError::Http(source) => assert!(source.is_connect() || source.is_request()),
        other => panic!("unexpected error: {other:?}"),
    }
}

//! Resource API client against a local mock server

use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use practice_qa_common::{CreatePostRequest, UpdatePostRequest};
use practice_qa_e2e::api::client::{JSON, JSON_UTF8};
use practice_qa_e2e::{E2eError, JsonPlaceholderApi};

fn api(server: &MockServer) -> JsonPlaceholderApi {
    JsonPlaceholderApi::with_base_url(&server.uri(), Duration::from_secs(5)).unwrap()
}

fn post_json(id: u64) -> serde_json::Value {
    json!({
        "userId": 1,
        "id": id,
        "title": "sunt aut facere",
        "body": "quia et suscipit"
    })
}

fn comment_json(id: u64, post_id: u64) -> serde_json::Value {
    json!({
        "postId": post_id,
        "id": id,
        "name": "id labore ex et quam laborum",
        "email": "Eliseo@gardner.biz",
        "body": "laudantium enim quasi"
    })
}

#[tokio::test]
async fn get_all_posts_sends_plain_json_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(header("content-type", JSON))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([post_json(1), post_json(2)])))
        .expect(1)
        .mount(&server)
        .await;

    let response = api(&server).get_all_posts().await.unwrap();
    assert_eq!(response.status, 200);
    let posts = response.body.unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[1].id, 2);
}

#[tokio::test]
async fn get_post_by_id_decodes_post() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(post_json(1)))
        .mount(&server)
        .await;

    let client = api(&server);
    let response = client.get_post_by_id(1).await.unwrap();
    assert!(response.is_success());
    let post = response.body.unwrap();
    assert_eq!(post.id, 1);
    assert_eq!(post.user_id, 1);
    client.verify_post_structure(&response.raw).unwrap();
}

#[tokio::test]
async fn missing_post_is_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/99999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({})))
        .mount(&server)
        .await;

    let response = api(&server).get_post_by_id(99999).await.unwrap();
    assert_eq!(response.status, 404);
    assert!(!response.is_success());
    assert!(response.body.is_none());
    assert_eq!(response.raw, json!({}));
}

#[tokio::test]
async fn comments_by_post_id_uses_query_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/comments"))
        .and(query_param("postId", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([comment_json(1, 1), comment_json(2, 1)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = api(&server);
    let response = client.get_comments_by_post_id(1).await.unwrap();
    let comments = response.body.unwrap();
    assert_eq!(comments.len(), 2);
    for comment in &comments {
        assert_eq!(comment.post_id, 1);
        client.verify_comment_structure(comment).unwrap();
    }
}

#[tokio::test]
async fn post_comments_uses_nested_route() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/3/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([comment_json(11, 3)])))
        .expect(1)
        .mount(&server)
        .await;

    let response = api(&server).get_post_comments(3).await.unwrap();
    assert_eq!(response.body.unwrap()[0].post_id, 3);
}

#[tokio::test]
async fn get_user_decodes_nested_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "address": {
                "street": "Kulas Light",
                "suite": "Apt. 556",
                "city": "Gwenborough",
                "zipcode": "92998-3874",
                "geo": { "lat": "-37.3159", "lng": "81.1496" }
            },
            "phone": "1-770-736-8031 x56442",
            "website": "hildegard.org",
            "company": {
                "name": "Romaguera-Crona",
                "catchPhrase": "Multi-layered client-server neural-net",
                "bs": "harness real-time e-markets"
            }
        })))
        .mount(&server)
        .await;

    let user = api(&server).get_user_by_id(1).await.unwrap().body.unwrap();
    assert_eq!(user.username, "Bret");
    assert_eq!(user.address.city, "Gwenborough");
}

#[tokio::test]
async fn create_post_sends_body_with_utf8_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .and(header("content-type", JSON_UTF8))
        .and(body_json(json!({
            "title": "foo",
            "body": "bar",
            "userId": 1
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "title": "foo",
            "body": "bar",
            "userId": 1,
            "id": 101
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = CreatePostRequest {
        title: "foo".to_string(),
        body: "bar".to_string(),
        user_id: 1,
    };
    let response = api(&server).create_post(&request).await.unwrap();
    assert_eq!(response.status, 201);
    let post = response.body.unwrap();
    assert_eq!(post.id, 101);
    assert_eq!(post.title, "foo");
}

#[tokio::test]
async fn update_post_forces_path_id_into_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/posts/1"))
        .and(header("content-type", JSON_UTF8))
        .and(body_json(json!({
            "id": 1,
            "userId": 1,
            "title": "updated",
            "body": "updated body"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "userId": 1,
            "title": "updated",
            "body": "updated body"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = UpdatePostRequest {
        id: Some(42),
        user_id: Some(1),
        title: Some("updated".to_string()),
        body: Some("updated body".to_string()),
    };
    let response = api(&server).update_post(1, &request).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body.unwrap().id, 1);
}

#[tokio::test]
async fn update_post_without_id_sends_path_id() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/posts/1"))
        .and(body_json(json!({
            "id": 1,
            "userId": 1,
            "title": "no id given",
            "body": "still post one"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "userId": 1,
            "title": "no id given",
            "body": "still post one"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = UpdatePostRequest {
        id: None,
        user_id: Some(1),
        title: Some("no id given".to_string()),
        body: Some("still post one".to_string()),
    };
    let response = api(&server).update_post(1, &request).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body.unwrap().id, 1);
}

#[tokio::test]
async fn patch_post_sends_only_set_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/posts/1"))
        .and(body_json(json!({ "title": "patched" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userId": 1,
            "id": 1,
            "title": "patched",
            "body": "quia et suscipit"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let changes = UpdatePostRequest {
        title: Some("patched".to_string()),
        ..Default::default()
    };
    let post = api(&server).patch_post(1, &changes).await.unwrap().body.unwrap();
    assert_eq!(post.title, "patched");
    assert_eq!(post.body, "quia et suscipit");
}

#[tokio::test]
async fn delete_post_returns_empty_object() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/posts/1"))
        .and(header("content-type", JSON))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let response = api(&server).delete_post(1).await.unwrap();
    assert_eq!(response.status, 200);
    assert!(response.body.unwrap().is_empty());
}

#[tokio::test]
async fn headers_are_exposed_lowercase() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(post_json(1))
                .insert_header("X-Powered-By", "Express"),
        )
        .mount(&server)
        .await;

    let response = api(&server).get_post_by_id(1).await.unwrap();
    assert_eq!(response.header("X-Powered-By"), Some("Express"));
    assert!(response.headers.contains_key("x-powered-by"));
}

#[tokio::test]
async fn repeated_headers_keep_every_value() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(post_json(1))
                .append_header("Set-Cookie", "a=1")
                .append_header("Set-Cookie", "b=2"),
        )
        .mount(&server)
        .await;

    let response = api(&server).get_post_by_id(1).await.unwrap();
    assert_eq!(response.header("set-cookie"), Some("a=1, b=2"));
}

#[tokio::test]
async fn non_json_body_is_kept_raw() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/1"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let response = api(&server).get_post_by_id(1).await.unwrap();
    assert_eq!(response.status, 502);
    assert!(response.body.is_none());
    assert_eq!(response.raw, json!("Bad Gateway"));
}

#[tokio::test]
async fn slow_response_is_a_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = JsonPlaceholderApi::with_base_url(&server.uri(), Duration::from_millis(200)).unwrap();
    let err = client.get_all_posts().await.unwrap_err();
    assert!(matches!(err, E2eError::RequestTimeout { .. }));
    assert!(err.is_test_failure());
}

#[tokio::test]
async fn malformed_post_fails_structure_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userId": "1",
            "id": 1,
            "title": "t"
        })))
        .mount(&server)
        .await;

    let client = api(&server);
    let response = client.get_post_by_id(1).await.unwrap();
    assert!(response.body.is_none());
    let err = client.verify_post_structure(&response.raw).unwrap_err();
    assert!(matches!(err, E2eError::Expectation(_)));
}

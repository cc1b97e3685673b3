use anyhow::Result;
use canvas_client::{AccessToken, CanvasClient, ClientError, ErrorKind, parse_base_url};
use canvas_test_support::fixtures::{json_response, next_link_header, student};
use httpmock::prelude::*;
use serde_json::json;

fn client_for(server: &MockServer) -> Result<CanvasClient> {
    Ok(CanvasClient::new(
        parse_base_url(&server.base_url())?,
        AccessToken::new("integration-token")?,
    )?)
}

#[test]
fn get_students_concatenates_pages_in_order() -> Result<()> {
    let server = MockServer::start();
    let next = server.url("/api/v1/courses/666/users?page=2");

    let first = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/courses/666/users")
            .query_param("enrollment_type", "student")
            .query_param("per_page", "100")
            .header("authorization", "Bearer integration-token");
        json_response(then, 200, &json!([student(1, "Doe, Jane")]))
            .header("link", next_link_header(&next));
    });
    let second = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/courses/666/users")
            .query_param("page", "2")
            .header("authorization", "Bearer integration-token");
        json_response(then, 200, &json!([student(2, "Roe, Sam")]));
    });

    let client = client_for(&server)?;
    let students = client
        .get_students(666)
        .collect::<Result<Vec<_>, ClientError>>()?;

    first.assert();
    second.assert();
    let names: Vec<_> = students.iter().map(|s| s.display_name()).collect();
    assert_eq!(names, ["Doe, Jane", "Roe, Sam"]);
    assert_eq!(students[1].id, 2);
    Ok(())
}

#[test]
fn pages_are_fetched_only_when_needed() -> Result<()> {
    let server = MockServer::start();
    let next = server.url("/api/v1/courses/3/users?page=2");

    let first = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/courses/3/users")
            .query_param("enrollment_type", "student");
        json_response(then, 200, &json!([student(10, "A"), student(11, "B")]))
            .header("link", next_link_header(&next));
    });
    let second = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/courses/3/users")
            .query_param("page", "2");
        json_response(then, 200, &json!([student(12, "C")]));
    });

    let client = client_for(&server)?;
    let mut pages = client.get_students(3);
    let first_two: Vec<_> = pages.by_ref().take(2).collect::<Result<_, _>>()?;

    assert_eq!(first_two.len(), 2);
    assert_eq!(pages.pages_fetched(), 1);
    first.assert();

    let rest: Vec<_> = pages.collect::<Result<_, _>>()?;
    assert_eq!(rest.len(), 1);
    second.assert();
    Ok(())
}

#[test]
fn not_found_surfaces_status_for_every_call_shape() -> Result<()> {
    let server = MockServer::start();
    for resource in ["users", "discussion_topics", "external_tools"] {
        server.mock(|when, then| {
            when.path(format!("/api/v1/courses/404/{resource}"));
            then.status(404)
                .header("content-type", "application/json")
                .body(r#"{"errors":[{"message":"The specified resource does not exist."}]}"#);
        });
    }

    let client = client_for(&server)?;
    let list_err = client
        .get_students(404)
        .next()
        .expect("an error item")
        .expect_err("404 listing should fail");
    let post_err = client
        .post_announcement(404, "t", "m")
        .expect_err("404 post should fail");
    let link_err = client
        .add_navigation_link(404, "n", "https://example.edu")
        .expect_err("404 tool should fail");

    for err in [list_err, post_err, link_err] {
        assert_eq!(err.kind(), ErrorKind::Remote);
        assert_eq!(err.status().map(|status| status.as_u16()), Some(404));
        assert!(err.to_string().contains("does not exist"));
    }
    Ok(())
}

#[test]
fn failed_listing_yields_one_error_then_ends() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.path("/api/v1/courses/8/users");
        then.status(500).body("boom");
    });

    let client = client_for(&server)?;
    let mut pages = client.get_students(8);
    assert!(matches!(pages.next(), Some(Err(_))));
    assert!(pages.next().is_none());
    Ok(())
}

#[test]
fn post_announcement_sends_exact_fields_and_returns_echo() -> Result<()> {
    let server = MockServer::start();
    let title = "Exam moved";
    let message = "<p>The exam is now on <b>Friday</b>, room 101 & 102.</p>";
    let echoed = json!({
        "id": 4401,
        "title": title,
        "message": message,
        "html_url": "https://canvas.example.edu/courses/666/discussion_topics/4401",
        "posted_at": "2024-09-02T15:00:00Z",
        "is_announcement": true,
        "user_name": "Prof X",
        "delayed_post_at": null,
        "attachments": []
    });

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/courses/666/discussion_topics")
            .header("authorization", "Bearer integration-token")
            .json_body(json!({"title": title, "message": message, "is_announcement": true}));
        json_response(then, 200, &echoed);
    });

    let client = client_for(&server)?;
    let announcement = client.post_announcement(666, title, message)?;

    mock.assert();
    assert_eq!(serde_json::Value::Object(announcement), echoed);
    Ok(())
}

#[test]
fn created_records_are_returned_without_added_fields() -> Result<()> {
    let server = MockServer::start();
    let echoed = json!({"id": 5, "title": "T", "message": "M", "is_announcement": true});
    server.mock(|when, then| {
        when.method(POST).path("/api/v1/groups/3/discussion_topics");
        json_response(then, 200, &echoed);
    });

    let client = client_for(&server)?;
    let record = client.post_group_announcement(3, "T", "M")?;

    assert!(!record.contains_key("html_url"));
    assert!(!record.contains_key("posted_at"));
    assert_eq!(serde_json::Value::Object(record), echoed);
    Ok(())
}

#[test]
fn foreign_next_link_is_refused() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.path("/api/v1/courses/2/users");
        json_response(then, 200, &json!([student(1, "Doe, Jane")])).header(
            "link",
            next_link_header("https://elsewhere.example.com/api/v1/courses/2/users?page=2"),
        );
    });

    let client = client_for(&server)?;
    let items: Vec<_> = client.get_students(2).collect();

    assert_eq!(items.len(), 2);
    assert!(items[0].is_ok());
    assert!(matches!(items[1], Err(ClientError::ForeignPageLink { .. })));
    Ok(())
}

#[test]
fn list_records_passes_records_through_untouched() -> Result<()> {
    let server = MockServer::start();
    let body = json!([{"id": 1, "custom": {"nested": [1, 2, 3]}, "flag": null}]);
    let expected = body.clone();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/courses/1/assignment_groups");
        json_response(then, 200, &body);
    });

    let client = client_for(&server)?;
    let records = client
        .list_records("/api/v1/courses/1/assignment_groups", &[])
        .collect::<Result<Vec<_>, _>>()?;

    let echoed = serde_json::Value::Array(
        records.into_iter().map(serde_json::Value::Object).collect(),
    );
    assert_eq!(echoed, expected);
    Ok(())
}

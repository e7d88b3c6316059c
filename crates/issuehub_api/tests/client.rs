use issuehub_api::{
    AddProjectMember, HubClient, HubConfig, HubError, IssueCreate, IssuePriority, IssueQuery,
    IssueSort, IssueStatus, IssueUpdate, MemberRole, ProjectCreate, SortOrder,
};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

const USER_JSON: &str =
    r#"{"id":1,"name":"Ann","email":"ann@example.com","created_at":"2024-01-01T09:00:00"}"#;

fn issue_json(id: i64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "project_id": 4,
        "title": "Login button misaligned",
        "description": null,
        "status": status,
        "priority": "high",
        "reporter": {"id": 1, "name": "Ann", "email": "ann@example.com", "created_at": "2024-01-01T09:00:00"},
        "reporter_id": 1,
        "assignee": null,
        "assignee_id": null,
        "expected_completion_date": null,
        "created_at": "2024-02-01T10:00:00",
        "updated_at": "2024-02-02T10:00:00",
        "comment_count": 0
    })
}

fn client_for(server: &ServerGuard) -> HubClient {
    HubClient::new(HubConfig::new(format!("{}/api", server.url()))).expect("client should build")
}

#[tokio::test]
async fn requests_without_token_carry_no_authorization_header() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/health")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"healthy"}"#)
        .create_async()
        .await;

    let health = client_for(&server).health().await.expect("health should succeed");
    assert!(health.is_healthy());
    mock.assert_async().await;
}

#[tokio::test]
async fn installed_token_is_sent_as_bearer_and_shared_by_clones() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/me")
        .match_header("authorization", "Bearer tok-123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(USER_JSON)
        .create_async()
        .await;

    let client = client_for(&server);
    let handle = client.clone();
    client.set_token("tok-123");
    assert!(handle.has_token());

    let user = handle.me().await.expect("profile should load");
    assert_eq!(user.email, "ann@example.com");
    mock.assert_async().await;
}

#[tokio::test]
async fn cleared_token_stops_being_sent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/projects")
        .match_header("authorization", Matcher::Missing)
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail":"Not authenticated"}"#)
        .create_async()
        .await;

    let client = HubClient::new(
        HubConfig::new(format!("{}/api", server.url())).with_token("stale"),
    )
    .expect("client should build");
    assert_eq!(client.token().as_deref(), Some("stale"));
    client.clear_token();

    let err = client.list_projects().await.expect_err("request should be rejected");
    assert!(err.is_unauthorized());
    assert_eq!(err.detail(), Some("Not authenticated"));
    mock.assert_async().await;
}

#[tokio::test]
async fn login_posts_credentials_and_returns_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/auth/login")
        .match_body(Matcher::Json(json!({"email": "ann@example.com", "password": "s3cret"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"jwt-abc","token_type":"bearer"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let token = client
        .login("ann@example.com", "s3cret")
        .await
        .expect("login should succeed");
    assert_eq!(token.access_token, "jwt-abc");
    assert!(!client.has_token());
    mock.assert_async().await;
}

#[tokio::test]
async fn wrong_password_surfaces_backend_detail() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/auth/login")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail":"Incorrect email or password"}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .login("ann@example.com", "wrong")
        .await
        .expect_err("login should fail");
    assert!(matches!(err, HubError::Authentication(_)));
    assert_eq!(err.detail(), Some("Incorrect email or password"));
}

#[tokio::test]
async fn signup_returns_created_user() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/auth/signup")
        .match_body(Matcher::Json(json!({
            "name": "Ann",
            "email": "ann@example.com",
            "password": "s3cret"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(USER_JSON)
        .create_async()
        .await;

    let user = client_for(&server)
        .signup("Ann", "ann@example.com", "s3cret")
        .await
        .expect("signup should succeed");
    assert_eq!(user.id, 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn issue_list_sends_only_set_filters() {
    let mut server = Server::new_async().await;
    let bare = server
        .mock("GET", "/api/projects/4/issues")
        .match_query(Matcher::Regex(
            "^sort=created_at&order=desc&page=1&per_page=20$".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let client = client_for(&server);
    let issues = client
        .list_issues(4, &IssueQuery::default())
        .await
        .expect("list should succeed");
    assert!(issues.is_empty());
    bare.assert_async().await;
}

#[tokio::test]
async fn issue_list_encodes_filters_and_clamps_paging() {
    let mut server = Server::new_async().await;
    let body = serde_json::to_string(&vec![issue_json(11, "in_progress")]).expect("body");
    let mock = server
        .mock("GET", "/api/projects/4/issues")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "login".into()),
            Matcher::UrlEncoded("status".into(), "in_progress".into()),
            Matcher::UrlEncoded("priority".into(), "high".into()),
            Matcher::UrlEncoded("assignee_id".into(), "7".into()),
            Matcher::UrlEncoded("sort".into(), "priority".into()),
            Matcher::UrlEncoded("order".into(), "asc".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("per_page".into(), "100".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let query = IssueQuery {
        q: Some("  login ".to_string()),
        status: Some(IssueStatus::InProgress),
        priority: Some(IssuePriority::High),
        assignee_id: Some(7),
        sort: IssueSort::Priority,
        order: SortOrder::Asc,
        page: 0,
        per_page: 1000,
    };
    let issues = client_for(&server)
        .list_issues(4, &query)
        .await
        .expect("list should succeed");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].status, IssueStatus::InProgress);
    mock.assert_async().await;
}

#[tokio::test]
async fn create_issue_omits_unset_optional_fields() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/projects/4/issues")
        .match_body(Matcher::Json(json!({
            "title": "Login button misaligned",
            "priority": "medium"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(issue_json(12, "open").to_string())
        .create_async()
        .await;

    let payload = IssueCreate {
        title: "Login button misaligned".to_string(),
        ..IssueCreate::default()
    };
    let issue = client_for(&server)
        .create_issue(4, &payload)
        .await
        .expect("create should succeed");
    assert_eq!(issue.id, 12);
    mock.assert_async().await;
}

#[tokio::test]
async fn update_issue_can_unassign_with_null() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PATCH", "/api/issues/12")
        .match_body(Matcher::Json(json!({"status": "resolved", "assignee_id": null})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(issue_json(12, "resolved").to_string())
        .create_async()
        .await;

    let update = IssueUpdate {
        status: Some(IssueStatus::Resolved),
        assignee_id: Some(None),
        ..IssueUpdate::default()
    };
    let issue = client_for(&server)
        .update_issue(12, &update)
        .await
        .expect("update should succeed");
    assert_eq!(issue.status, IssueStatus::Resolved);
    mock.assert_async().await;
}

#[tokio::test]
async fn forbidden_update_reports_detail() {
    let mut server = Server::new_async().await;
    server
        .mock("PATCH", "/api/issues/12")
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"detail":"Only project maintainers or the reporter can change status/assignee"}"#,
        )
        .create_async()
        .await;

    let update = IssueUpdate {
        status: Some(IssueStatus::Closed),
        ..IssueUpdate::default()
    };
    let err = client_for(&server)
        .update_issue(12, &update)
        .await
        .expect_err("update should be refused");
    assert!(err.is_forbidden());
    assert_eq!(
        err.detail(),
        Some("Only project maintainers or the reporter can change status/assignee")
    );
}

#[tokio::test]
async fn delete_issue_accepts_no_content() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", "/api/issues/12")
        .with_status(204)
        .create_async()
        .await;

    client_for(&server)
        .delete_issue(12)
        .await
        .expect("delete should succeed");
    mock.assert_async().await;
}

#[tokio::test]
async fn missing_issue_maps_to_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/issues/99")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail":"Issue not found"}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .get_issue(99)
        .await
        .expect_err("issue should be missing");
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "http 404 Not Found: Issue not found");
}

#[tokio::test]
async fn validation_errors_are_flattened() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/projects")
        .with_status(422)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"detail":[{"loc":["body","key"],"msg":"ensure this value has at most 10 characters","type":"value_error"}]}"#,
        )
        .create_async()
        .await;

    let payload = ProjectCreate {
        name: "Platform".to_string(),
        key: "PLATFORMTEAM".to_string(),
        description: None,
    };
    let err = client_for(&server)
        .create_project(&payload)
        .await
        .expect_err("project should be rejected");
    assert_eq!(
        err.detail(),
        Some("ensure this value has at most 10 characters")
    );
}

#[tokio::test]
async fn project_detail_and_member_management() {
    let mut server = Server::new_async().await;
    let detail = server
        .mock("GET", "/api/projects/4")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": 4,
                "name": "Platform",
                "key": "PLAT",
                "description": "Core services",
                "created_at": "2024-01-10T08:00:00",
                "members": [
                    {"user": {"id": 1, "name": "Ann", "email": "ann@example.com", "created_at": "2024-01-01T09:00:00"}, "role": "maintainer"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let add = server
        .mock("POST", "/api/projects/4/members")
        .match_body(Matcher::Json(json!({"email": "bo@example.com", "role": "member"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"Member added successfully"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let project = client.get_project(4).await.expect("project should load");
    assert_eq!(project.members.len(), 1);
    assert_eq!(project.members[0].role, MemberRole::Maintainer);

    let payload = AddProjectMember {
        email: "bo@example.com".to_string(),
        role: MemberRole::Member,
    };
    let ack = client
        .add_project_member(4, &payload)
        .await
        .expect("member should be added");
    assert_eq!(ack.message, "Member added successfully");

    detail.assert_async().await;
    add.assert_async().await;
}

#[tokio::test]
async fn comments_round_trip_through_issue_endpoints() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/api/issues/12/comments")
        .match_body(Matcher::Json(json!({"body": "Reproduced on Firefox"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"id":5,"issue_id":12,"author_id":1,"author":null,"body":"Reproduced on Firefox","created_at":"2024-02-03T11:00:00"}"#,
        )
        .create_async()
        .await;
    let list = server
        .mock("GET", "/api/issues/12/comments")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{"id":5,"issue_id":12,"author_id":1,"body":"Reproduced on Firefox","created_at":"2024-02-03T11:00:00"}]"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let comment = client
        .create_comment(12, "Reproduced on Firefox")
        .await
        .expect("comment should be created");
    assert_eq!(comment.id, 5);
    assert!(comment.author.is_none());

    let comments = client.list_comments(12).await.expect("comments should load");
    assert_eq!(comments.len(), 1);

    create.assert_async().await;
    list.assert_async().await;
}

use std::sync::Arc;

use anyhow::Result;
use axum::http::StatusCode;
use feedback_api::handlers::ideas;
use feedback_api::mock::MockServer;
use feedback_api::models::{Tenant, User};
use feedback_api::storage::{IdeaStorage, InMemoryIdeaStorage};
use feedback_api::AppState;

fn any_tenant() -> Tenant {
    Tenant::new(1, "Any Tenant", "any")
}

fn jon() -> User {
    User::new(1, "Jon")
}

fn server_for(storage: &Arc<InMemoryIdeaStorage>) -> MockServer {
    MockServer::new(AppState::with_ideas(storage.clone()))
}

#[tokio::test]
async fn test_list_handler() -> Result<()> {
    let storage = Arc::new(InMemoryIdeaStorage::new());
    let mut server = server_for(&storage);
    server.context.set_tenant(any_tenant());

    let (code, body) = server.execute(ideas::list_ideas).await?;

    assert_eq!(code, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body)?;
    assert_eq!(body["count"], 0);
    Ok(())
}

#[tokio::test]
async fn test_list_handler_only_returns_tenant_ideas() -> Result<()> {
    let storage = Arc::new(InMemoryIdeaStorage::new());
    storage.save(1, 1, "Mine", "").await?;
    storage.save(2, 1, "Someone else's", "").await?;
    let mut server = server_for(&storage);
    server.context.set_tenant(any_tenant());

    let (code, body) = server.execute(ideas::list_ideas).await?;

    assert_eq!(code, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body)?;
    assert_eq!(body["count"], 1);
    assert_eq!(body["items"][0]["title"], "Mine");
    Ok(())
}

#[tokio::test]
async fn test_details_handler() -> Result<()> {
    let storage = Arc::new(InMemoryIdeaStorage::new());
    let idea = storage.save(1, 1, "My Idea", "My Idea Description").await?;
    let mut server = server_for(&storage);
    server.context.set_tenant(any_tenant());
    server.context.set_param_names(&["number"]);
    server.context.set_param_values(&[idea.number.to_string()]);

    let (code, body) = server.execute(ideas::idea_details).await?;

    assert_eq!(code, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body)?;
    assert_eq!(body["idea"]["title"], "My Idea");
    assert_eq!(body["idea"]["description"], "My Idea Description");
    assert_eq!(body["idea"]["total_supporters"], 1);
    assert_eq!(body["comments"], serde_json::json!([]));
    Ok(())
}

#[tokio::test]
async fn test_details_handler_not_found() -> Result<()> {
    let storage = Arc::new(InMemoryIdeaStorage::new());
    let mut server = server_for(&storage);
    server.context.set_tenant(any_tenant());
    server.context.set_param_names(&["number"]);
    server.context.set_param_values(&["99"]);

    let (code, _) = server.execute(ideas::idea_details).await?;

    assert_eq!(code, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_details_handler_invalid_number() -> Result<()> {
    let storage = Arc::new(InMemoryIdeaStorage::new());
    let mut server = server_for(&storage);
    server.context.set_tenant(any_tenant());
    server.context.set_param_names(&["number"]);
    server.context.set_param_values(&["first"]);

    let (code, _) = server.execute(ideas::idea_details).await?;

    assert_eq!(code, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_details_handler_other_tenant_not_found() -> Result<()> {
    let storage = Arc::new(InMemoryIdeaStorage::new());
    storage.save(2, 1, "Elsewhere", "").await?;
    let mut server = server_for(&storage);
    server.context.set_tenant(any_tenant());
    server.context.set_param_names(&["number"]);
    server.context.set_param_values(&["1"]);

    let (code, _) = server.execute(ideas::idea_details).await?;

    assert_eq!(code, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_post_idea_handler() -> Result<()> {
    let storage = Arc::new(InMemoryIdeaStorage::new());
    let mut server = server_for(&storage);
    server.context.set_tenant(any_tenant());
    server.context.set_user(jon());

    let (code, _) = server
        .execute_post(ideas::post_idea, r#"{ "title": "My newest idea :)" }"#)
        .await?;

    let idea = storage.get_by_number(1, 1).await?;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(idea.title, "My newest idea :)");
    assert_eq!(idea.total_supporters, 1);
    assert_eq!(idea.user_id, 1);
    Ok(())
}

#[tokio::test]
async fn test_post_idea_handler_without_title() -> Result<()> {
    let storage = Arc::new(InMemoryIdeaStorage::new());
    let mut server = server_for(&storage);
    server.context.set_tenant(any_tenant());
    server.context.set_user(jon());

    let (code, _) = server
        .execute_post(ideas::post_idea, r#"{ "title": "" }"#)
        .await?;

    assert_eq!(code, StatusCode::BAD_REQUEST);
    assert!(storage.get_by_number(1, 1).await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_post_idea_handler_missing_title_field() -> Result<()> {
    let storage = Arc::new(InMemoryIdeaStorage::new());
    let mut server = server_for(&storage);
    server.context.set_tenant(any_tenant());
    server.context.set_user(jon());

    let (code, body) = server
        .execute_post(ideas::post_idea, r#"{ "description": "No title" }"#)
        .await?;

    assert_eq!(code, StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_str(&body)?;
    assert_eq!(body["error"]["code"], "VAL_3002");
    assert!(storage.get_all(1).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_post_idea_handler_blank_title() -> Result<()> {
    let storage = Arc::new(InMemoryIdeaStorage::new());
    let mut server = server_for(&storage);
    server.context.set_tenant(any_tenant());
    server.context.set_user(jon());

    let (code, body) = server
        .execute_post(ideas::post_idea, r#"{ "title": "   " }"#)
        .await?;

    assert_eq!(code, StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_str(&body)?;
    assert_eq!(body["error"]["field"], "title");
    assert!(storage.get_all(1).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_post_idea_handler_title_too_long() -> Result<()> {
    let storage = Arc::new(InMemoryIdeaStorage::new());
    let mut server = server_for(&storage);
    server.context.set_tenant(any_tenant());
    server.context.set_user(jon());

    let body = serde_json::json!({ "title": "x".repeat(101) }).to_string();
    let (code, _) = server.execute_post(ideas::post_idea, &body).await?;

    assert_eq!(code, StatusCode::BAD_REQUEST);
    assert!(storage.get_all(1).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_post_idea_handler_anonymous() -> Result<()> {
    let storage = Arc::new(InMemoryIdeaStorage::new());
    let mut server = server_for(&storage);
    server.context.set_tenant(any_tenant());

    let (code, _) = server
        .execute_post(ideas::post_idea, r#"{ "title": "Who am I?" }"#)
        .await?;

    assert_eq!(code, StatusCode::UNAUTHORIZED);
    assert!(storage.get_all(1).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_post_comment_handler() -> Result<()> {
    let storage = Arc::new(InMemoryIdeaStorage::new());
    storage.save(1, 1, "Title", "Description").await?;
    let mut server = server_for(&storage);
    server.context.set_tenant(any_tenant());
    server.context.set_user(jon());
    server.context.set_param_names(&["number"]);
    server.context.set_param_values(&["1"]);

    let (code, _) = server
        .execute_post(ideas::post_comment, r#"{ "content": "This is a comment!" }"#)
        .await?;

    assert_eq!(code, StatusCode::OK);
    let comments = storage.get_comments(1, 1).await?;
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].content, "This is a comment!");
    Ok(())
}

#[tokio::test]
async fn test_post_comment_handler_without_content() -> Result<()> {
    let storage = Arc::new(InMemoryIdeaStorage::new());
    let mut server = server_for(&storage);
    server.context.set_tenant(any_tenant());
    server.context.set_user(jon());
    server.context.set_param_names(&["number"]);
    server.context.set_param_values(&["1"]);

    let (code, _) = server
        .execute_post(ideas::post_comment, r#"{ "content": "" }"#)
        .await?;

    assert_eq!(code, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_post_comment_handler_missing_idea() -> Result<()> {
    let storage = Arc::new(InMemoryIdeaStorage::new());
    let mut server = server_for(&storage);
    server.context.set_tenant(any_tenant());
    server.context.set_user(jon());
    server.context.set_param_names(&["number"]);
    server.context.set_param_values(&["1"]);

    let (code, _) = server
        .execute_post(ideas::post_comment, r#"{ "content": "Anyone there?" }"#)
        .await?;

    assert_eq!(code, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_add_supporter_handler() -> Result<()> {
    let storage = Arc::new(InMemoryIdeaStorage::new());
    storage.save(1, 1, "The Idea #1", "The Description #1").await?;
    storage.save(1, 1, "The Idea #2", "The Description #2").await?;
    let mut server = server_for(&storage);
    server.context.set_tenant(any_tenant());
    server.context.set_user(User::new(2, "Arya"));
    server.context.set_param_names(&["number"]);
    server.context.set_param_values(&["2"]);

    let (code, _) = server.execute(ideas::add_supporter).await?;
    assert_eq!(code, StatusCode::OK);

    // supporting again keeps the count
    let (code, body) = server.execute(ideas::add_supporter).await?;
    assert_eq!(code, StatusCode::OK);
    let idea: serde_json::Value = serde_json::from_str(&body)?;
    assert_eq!(idea["total_supporters"], 2);

    assert_eq!(storage.get_by_number(1, 1).await?.total_supporters, 1);
    Ok(())
}

#[tokio::test]
async fn test_remove_supporter_handler() -> Result<()> {
    let storage = Arc::new(InMemoryIdeaStorage::new());
    storage.save(1, 1, "The Idea #1", "").await?;
    let mut server = server_for(&storage);
    server.context.set_tenant(any_tenant());
    server.context.set_user(jon());
    server.context.set_param_names(&["number"]);
    server.context.set_param_values(&["1"]);

    let (code, _) = server.execute(ideas::remove_supporter).await?;

    assert_eq!(code, StatusCode::OK);
    assert_eq!(storage.get_by_number(1, 1).await?.total_supporters, 0);
    Ok(())
}

#[tokio::test]
async fn test_add_supporter_handler_missing_idea() -> Result<()> {
    let storage = Arc::new(InMemoryIdeaStorage::new());
    let mut server = server_for(&storage);
    server.context.set_tenant(any_tenant());
    server.context.set_user(jon());
    server.context.set_param_names(&["number"]);
    server.context.set_param_values(&["5"]);

    let (code, _) = server.execute(ideas::add_supporter).await?;

    assert_eq!(code, StatusCode::NOT_FOUND);
    Ok(())
}

//! Ideas Handler
//!
//! Lists and shows ideas of the current tenant, and lets the current user
//! post ideas, comment on them and support them.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::Json,
};
use tracing::info;
use validator::Validate;

use crate::app_state::AppState;
use crate::auth::middleware::CurrentUser;
use crate::error::Result;
use crate::handlers::response::ListResponse;
use crate::middleware::metrics::{track_comment_created, track_idea_created, track_support_change};
use crate::middleware::CurrentTenant;
use crate::models::{Comment, Idea, IdeaDetails, NewCommentRequest, NewIdeaRequest};

/// List ideas of the current tenant
/// GET /api/ideas
#[utoipa::path(
    get,
    path = "/api/ideas",
    tag = "ideas",
    responses(
        (status = 200, description = "Ideas of the tenant, ordered by number", body = ListResponse<Idea>),
        (status = 404, description = "Tenant not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_ideas(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
) -> Result<Json<ListResponse<Idea>>> {
    let ideas = state.ideas.get_all(tenant.id).await?;
    Ok(Json(ListResponse::new(ideas)))
}

/// Show an idea with its comments
/// GET /api/ideas/{number}
#[utoipa::path(
    get,
    path = "/api/ideas/{number}",
    tag = "ideas",
    params(("number" = i32, Path, description = "Idea number within the tenant")),
    responses(
        (status = 200, description = "Idea details", body = IdeaDetails),
        (status = 400, description = "Invalid idea number"),
        (status = 404, description = "Idea not found")
    )
)]
pub async fn idea_details(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
    number: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<IdeaDetails>> {
    let Path(number) = number?;

    let idea = state.ideas.get_by_number(tenant.id, number).await?;
    let comments = state.ideas.get_comments(tenant.id, number).await?;

    Ok(Json(IdeaDetails { idea, comments }))
}

/// Post a new idea; the author becomes its first supporter
/// POST /api/ideas
#[utoipa::path(
    post,
    path = "/api/ideas",
    tag = "ideas",
    request_body = NewIdeaRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Idea created", body = Idea),
        (status = 400, description = "Title missing or too long"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn post_idea(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
    CurrentUser(user): CurrentUser,
    payload: std::result::Result<Json<NewIdeaRequest>, JsonRejection>,
) -> Result<Json<Idea>> {
    let Json(payload) = payload?;
    let payload = payload.normalized();
    payload.validate()?;

    let idea = state
        .ideas
        .save(tenant.id, user.id, &payload.title, &payload.description)
        .await?;

    info!(
        tenant_id = tenant.id,
        user_id = user.id,
        number = idea.number,
        "Idea posted"
    );
    track_idea_created(tenant.id);

    Ok(Json(idea))
}

/// Comment on an idea
/// POST /api/ideas/{number}/comments
#[utoipa::path(
    post,
    path = "/api/ideas/{number}/comments",
    tag = "ideas",
    params(("number" = i32, Path, description = "Idea number within the tenant")),
    request_body = NewCommentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Comment created", body = Comment),
        (status = 400, description = "Content missing"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Idea not found")
    )
)]
pub async fn post_comment(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
    CurrentUser(user): CurrentUser,
    number: std::result::Result<Path<i32>, PathRejection>,
    payload: std::result::Result<Json<NewCommentRequest>, JsonRejection>,
) -> Result<Json<Comment>> {
    let Json(payload) = payload?;
    let payload = payload.normalized();
    payload.validate()?;
    let Path(number) = number?;

    let comment = state
        .ideas
        .add_comment(tenant.id, user.id, number, &payload.content)
        .await?;

    info!(
        tenant_id = tenant.id,
        user_id = user.id,
        number,
        comment_id = comment.id,
        "Comment posted"
    );
    track_comment_created(tenant.id);

    Ok(Json(comment))
}

/// Support an idea; supporting twice has no further effect
/// POST /api/ideas/{number}/supporters
#[utoipa::path(
    post,
    path = "/api/ideas/{number}/supporters",
    tag = "ideas",
    params(("number" = i32, Path, description = "Idea number within the tenant")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated idea", body = Idea),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Idea not found")
    )
)]
pub async fn add_supporter(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
    CurrentUser(user): CurrentUser,
    number: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<Idea>> {
    let Path(number) = number?;

    let idea = state.ideas.add_supporter(tenant.id, user.id, number).await?;
    track_support_change(tenant.id, true);

    Ok(Json(idea))
}

/// Withdraw support from an idea
/// DELETE /api/ideas/{number}/supporters
#[utoipa::path(
    delete,
    path = "/api/ideas/{number}/supporters",
    tag = "ideas",
    params(("number" = i32, Path, description = "Idea number within the tenant")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated idea", body = Idea),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Idea not found")
    )
)]
pub async fn remove_supporter(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
    CurrentUser(user): CurrentUser,
    number: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<Idea>> {
    let Path(number) = number?;

    let idea = state
        .ideas
        .remove_supporter(tenant.id, user.id, number)
        .await?;
    track_support_change(tenant.id, false);

    Ok(Json(idea))
}

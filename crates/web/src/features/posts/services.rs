use gym_storage::{
    dto::post::{
        AddCommentRequest, CommentResponse, CreatePostRequest, PostDetailResponse, PostFilter,
        UpdatePostRequest,
    },
    error::{Result, StorageError},
    models::{CommentWithAuthor, PostWithNames},
    repository::{CommentRepository, MemberRepository, PostRepository, UserRepository},
};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn list_posts(pool: &PgPool, filter: &PostFilter) -> Result<Vec<PostWithNames>> {
    let repo = PostRepository::new(pool);
    repo.list(filter).await
}

pub async fn get_post_detail(pool: &PgPool, id: Uuid) -> Result<PostDetailResponse> {
    let post = PostRepository::new(pool).find_by_id(id).await?;
    let comments = CommentRepository::new(pool).list_for_post(id).await?;

    Ok(PostDetailResponse {
        post: post.into(),
        comments: comments.into_iter().map(CommentResponse::from).collect(),
    })
}

pub async fn create_post(pool: &PgPool, request: &CreatePostRequest) -> Result<PostWithNames> {
    let author_id = request
        .author_id
        .ok_or_else(|| StorageError::validation("author_id is required"))?;

    if !MemberRepository::new(pool).exists(request.member_id).await? {
        return Err(StorageError::NotFound("Member"));
    }
    ensure_author(pool, author_id).await?;

    let repo = PostRepository::new(pool);
    repo.create(request, author_id).await
}

pub async fn update_post(
    pool: &PgPool,
    id: Uuid,
    request: &UpdatePostRequest,
) -> Result<PostWithNames> {
    let repo = PostRepository::new(pool);

    let existing = repo.find_by_id(id).await?;
    repo.update(&existing.post, request).await
}

pub async fn delete_post(pool: &PgPool, id: Uuid) -> Result<()> {
    let repo = PostRepository::new(pool);
    repo.delete(id).await
}

pub async fn add_comment(
    pool: &PgPool,
    post_id: Uuid,
    request: &AddCommentRequest,
) -> Result<CommentWithAuthor> {
    let author_id = request
        .author_id
        .ok_or_else(|| StorageError::validation("author_id is required"))?;

    if !PostRepository::new(pool).exists(post_id).await? {
        return Err(StorageError::NotFound("Post"));
    }
    ensure_author(pool, author_id).await?;

    let repo = CommentRepository::new(pool);
    repo.create(post_id, author_id, &request.content).await
}

/// Posts and comments are written by a staff account
pub(crate) async fn ensure_author(pool: &PgPool, author_id: Uuid) -> Result<()> {
    UserRepository::new(pool)
        .find_by_id(author_id)
        .await
        .map(|_| ())
        .map_err(|e| match e {
            StorageError::NotFound(_) => StorageError::NotFound("Author"),
            other => other,
        })
}

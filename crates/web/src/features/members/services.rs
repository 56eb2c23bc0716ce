use gym_storage::{
    dto::{
        member::{CreateMemberRequest, MemberFilter, UpdateMemberRequest},
        post::PostFilter,
    },
    error::{Result, StorageError},
    models::{MemberWithTrainer, PostWithNames, ScheduleWithTrainer},
    repository::{MemberRepository, PostRepository, ScheduleRepository, UserRepository},
};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn list_members(pool: &PgPool, filter: &MemberFilter) -> Result<Vec<MemberWithTrainer>> {
    let repo = MemberRepository::new(pool);
    repo.list(filter).await
}

pub async fn get_member(pool: &PgPool, id: Uuid) -> Result<MemberWithTrainer> {
    let repo = MemberRepository::new(pool);
    repo.find_by_id(id).await
}

/// Register a member. A trainer, when given, must be a trainer account.
pub async fn create_member(
    pool: &PgPool,
    request: &CreateMemberRequest,
) -> Result<MemberWithTrainer> {
    if let Some(trainer_id) = request.trainer_id {
        UserRepository::new(pool).find_trainer(trainer_id).await?;
    }

    let repo = MemberRepository::new(pool);
    repo.create(request).await
}

pub async fn update_member(
    pool: &PgPool,
    id: Uuid,
    request: &UpdateMemberRequest,
) -> Result<MemberWithTrainer> {
    let repo = MemberRepository::new(pool);
    let existing = repo.find_by_id(id).await?;

    if let Some(trainer_id) = request.trainer_id {
        UserRepository::new(pool).find_trainer(trainer_id).await?;
    }

    repo.update(&existing.member, request).await
}

pub async fn delete_member(pool: &PgPool, id: Uuid) -> Result<()> {
    let repo = MemberRepository::new(pool);
    repo.delete(id).await
}

pub async fn member_posts(pool: &PgPool, id: Uuid) -> Result<Vec<PostWithNames>> {
    ensure_member(pool, id).await?;

    let filter = PostFilter {
        member: Some(id),
        ..PostFilter::default()
    };
    PostRepository::new(pool).list(&filter).await
}

pub async fn member_schedules(pool: &PgPool, id: Uuid) -> Result<Vec<ScheduleWithTrainer>> {
    ensure_member(pool, id).await?;

    ScheduleRepository::new(pool).list_for_member(id).await
}

async fn ensure_member(pool: &PgPool, id: Uuid) -> Result<()> {
    if MemberRepository::new(pool).exists(id).await? {
        Ok(())
    } else {
        Err(StorageError::NotFound("Member"))
    }
}

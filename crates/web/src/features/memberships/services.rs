use gym_storage::{
    dto::membership::{CreateMembershipRequest, MembershipFilter, UpdateMembershipRequest},
    error::{Result, StorageError},
    models::MembershipWithMember,
    repository::{MemberRepository, MembershipRepository},
    services::membership_period::{ensure_period, ensure_price, ensure_sessions, plan_membership},
};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn list_memberships(
    pool: &PgPool,
    filter: &MembershipFilter,
) -> Result<Vec<MembershipWithMember>> {
    let repo = MembershipRepository::new(pool);
    repo.list(filter).await
}

pub async fn get_membership(pool: &PgPool, id: Uuid) -> Result<MembershipWithMember> {
    let repo = MembershipRepository::new(pool);
    repo.find_by_id(id).await
}

/// Sell a membership; the end date follows the type unless given
pub async fn create_membership(
    pool: &PgPool,
    request: &CreateMembershipRequest,
) -> Result<MembershipWithMember> {
    if !MemberRepository::new(pool).exists(request.member_id).await? {
        return Err(StorageError::NotFound("Member"));
    }

    let plan = plan_membership(
        request.member_id,
        request.membership_type,
        request.start_date,
        request.price,
        request.remaining_sessions,
        request.end_date,
    )?;

    let repo = MembershipRepository::new(pool);
    repo.create(&plan, request.is_active).await
}

/// Apply a partial update. The stored end date is kept unless a new one is
/// given, and the merged period must still be ordered.
pub async fn update_membership(
    pool: &PgPool,
    id: Uuid,
    request: &UpdateMembershipRequest,
) -> Result<MembershipWithMember> {
    let repo = MembershipRepository::new(pool);
    let mut membership = repo.find_by_id(id).await?.membership;

    if let Some(membership_type) = request.membership_type {
        membership.membership_type = membership_type;
    }
    if let Some(start_date) = request.start_date {
        membership.start_date = start_date;
    }
    if let Some(end_date) = request.end_date {
        membership.end_date = end_date;
    }
    if let Some(remaining_sessions) = request.remaining_sessions {
        membership.remaining_sessions = remaining_sessions;
    }
    if let Some(price) = request.price {
        membership.price = price;
    }
    if let Some(is_active) = request.is_active {
        membership.is_active = is_active;
    }

    ensure_period(membership.start_date, membership.end_date)?;
    ensure_price(membership.price)?;
    ensure_sessions(membership.remaining_sessions)?;

    repo.update(&membership).await
}

pub async fn consume_session(pool: &PgPool, id: Uuid) -> Result<MembershipWithMember> {
    let repo = MembershipRepository::new(pool);
    repo.consume_session(id).await
}

pub async fn delete_membership(pool: &PgPool, id: Uuid) -> Result<()> {
    let repo = MembershipRepository::new(pool);
    repo.delete(id).await
}

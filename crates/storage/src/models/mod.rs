mod member;
mod membership;
mod post;
mod roster;
mod schedule;
mod user;

pub use member::{Gender, Member, MemberWithTrainer};
pub use membership::{Membership, MembershipType, MembershipWithMember};
pub use post::{CommentWithAuthor, Post, PostComment, PostType, PostWithNames};
pub use roster::{Admission, Roster};
pub use schedule::{Schedule, ScheduleStatus, ScheduleType, ScheduleWithTrainer};
pub use user::{User, UserType};

#[cfg(test)]
pub(crate) use schedule::fixtures;

pub mod comment;
pub mod member;
pub mod membership;
pub mod post;
pub mod schedule;
pub mod user;

pub use comment::CommentRepository;
pub use member::MemberRepository;
pub use membership::MembershipRepository;
pub use post::PostRepository;
pub use schedule::{Registration, ScheduleRepository};
pub use user::UserRepository;

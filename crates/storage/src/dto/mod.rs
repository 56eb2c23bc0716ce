pub mod member;
pub mod membership;
pub mod post;
pub mod schedule;
pub mod user;

pub mod calendar;
pub mod membership_period;
pub mod validation;

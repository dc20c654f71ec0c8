pub mod application;
pub mod opportunity;

pub use application::{Application, ApplicationStatus, NewApplication};
pub use opportunity::{Category, NewOpportunity, Opportunity};

pub mod submission;
pub mod submission_vote;

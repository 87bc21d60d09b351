pub mod jira;
pub mod sprint;

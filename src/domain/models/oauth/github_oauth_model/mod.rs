pub mod github_user;

pub use github_user::GitHubUser;

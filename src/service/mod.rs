//! Orchestration layer between the HTTP handlers and the backends

pub mod category;
pub mod comment;
pub mod post;
pub mod user;

pub use category::CategoryService;
pub use comment::CommentService;
pub use post::PostService;
pub use user::UserService;

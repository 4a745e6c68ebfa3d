//! Domain entities - the core business objects.

mod comment;
mod post;
mod principal;
pub mod slug;
mod tag;
mod user;
mod view;

pub use comment::Comment;
pub use post::{Post, TITLE_MAX_CHARS};
pub use principal::Principal;
pub use tag::Tag;
pub use user::User;
pub use view::{AuthorSummary, CommentView, PostDetail, PostListItem, PostPage, PostView, SearchResult};

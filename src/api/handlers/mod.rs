pub mod announcements;
pub mod comments;
pub mod reactions;
pub mod root;

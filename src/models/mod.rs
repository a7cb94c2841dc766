pub mod event;
pub mod photo;
pub mod user;

pub use event::{Event, EventSummary, MemberInfo, ROLE_CREATOR, ROLE_MEMBER};
pub use photo::EventPhoto;
pub use user::User;

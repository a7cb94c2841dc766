pub mod admin;
pub mod auth;
pub mod events;
pub mod health;
pub mod members;
pub mod photos;
pub mod users;

pub use admin::{admin_delete_user, admin_list_users, admin_update_user};
pub use auth::{login, register};
pub use events::{
    create_event, delete_event, get_event, join_event, leave_event, list_events, update_event,
};
pub use health::health_check;
pub use members::{invite_member, remove_member};
pub use photos::{delete_photo, get_photo_raw, list_photos, upload_photo};
pub use users::{get_me, search_users, update_me};

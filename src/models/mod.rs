pub mod course;
mod de;
pub mod session;
pub mod user;

pub use course::Course;
pub use session::{AdminTab, Session, SessionUser, View};
pub use user::{EntityId, Role, User};

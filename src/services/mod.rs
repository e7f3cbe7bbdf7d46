pub mod session;

pub use session::{Notice, SessionController};

pub mod cache;
pub mod errors;
pub mod persistence;
pub mod types;

pub use cache::SessionCache;
pub use errors::SessionError;
pub use persistence::{load_credentials, remove_credentials, save_credentials, session_file_path};
pub use types::Credentials;

//! Staff directory module
//!
//! Staff profiles, role assignments, and the PIN credentials that gate
//! every transfer operation. PINs are stored only as salted Argon2id
//! digests; plaintext never leaves the verification path.

pub mod directory;
pub mod models;
pub mod pin;

// Re-export commonly used types
pub use directory::StaffDirectory;
pub use models::StaffProfile;

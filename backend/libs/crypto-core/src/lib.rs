//! Credential and session-token primitives shared by the backend services
//!
//! - `jwt`: signed, time-limited session tokens binding a client identity
//! - `password`: salted Argon2id password hashes

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtCodec, TokenError};
pub use password::{hash_password, verify_password, PasswordError};

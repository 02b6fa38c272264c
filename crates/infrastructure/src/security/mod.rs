pub mod password_hasher;
pub mod token_service;

pub use password_hasher::Pbkdf2PasswordHasher;
pub use token_service::HmacTokenService;

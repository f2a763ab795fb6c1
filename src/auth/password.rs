use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::{error, warn};

lazy_static! {
    // Verified against when the email is unknown so both login failures cost
    // one Argon2 run.
    static ref DECOY_HASH: Option<String> = hash_password("decoy-password").ok();
}

/// Argon2id v19 with pinned cost parameters; stored hashes carry them in
/// their PHC string, so raising the cost later still verifies old hashes.
fn hasher() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::DEFAULT)
}

/// Salted hash in PHC string format.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    match hasher().hash_password(plain.as_bytes(), &salt) {
        Ok(hash) => Ok(hash.to_string()),
        Err(e) => {
            error!(error = %e, "password hashing failed");
            Err(anyhow::anyhow!("password hashing failed: {e}"))
        }
    }
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| {
        error!(error = %e, "stored password hash is malformed");
        anyhow::anyhow!("malformed password hash: {e}")
    })?;
    Ok(hasher().verify_password(plain.as_bytes(), &parsed).is_ok())
}

/// Spends one verification on a throwaway hash. Always fails.
pub fn verify_against_decoy(plain: &str) -> bool {
    match DECOY_HASH.as_deref() {
        Some(decoy) => {
            let _ = verify_password(plain, decoy);
        }
        None => warn!("decoy hash unavailable, unknown-email login is not padded"),
    }
    false
}

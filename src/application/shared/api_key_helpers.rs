use rand::Rng;
use sha2::{Digest, Sha256};

/// Marks tokens issued by this service.
pub const API_KEY_PREFIX: &str = "dpk_";

const KEY_RANDOM_LEN: usize = 40;
const KEY_DISPLAY_LEN: usize = 8;
const BASE62_CHARS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Generate a new raw key and its stored lookup fields: `(raw, prefix, hash)`.
///
/// The random part comes from the thread-local CSPRNG.
pub fn generate_api_key() -> (String, String, String) {
    let mut rng = rand::rng();
    let random: String = (0..KEY_RANDOM_LEN)
        .map(|_| BASE62_CHARS[rng.random_range(0..BASE62_CHARS.len())] as char)
        .collect();
    let raw = format!("{API_KEY_PREFIX}{random}");
    let prefix = api_key_prefix(&raw);
    let hash = api_key_hash(&raw);
    (raw, prefix, hash)
}

/// Displayable leading characters of a raw key.
pub fn api_key_prefix(raw: &str) -> String {
    raw.chars().take(KEY_DISPLAY_LEN).collect()
}

/// SHA-256 hex digest of a raw key; this is what gets stored and looked up.
pub fn api_key_hash(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

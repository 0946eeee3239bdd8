//! Persisted session tokens.
//!
//! The bearer token lives under [`TOKEN_KEY`], the optional refresh token
//! under [`REFRESH_TOKEN_KEY`]. Absence of the bearer token is the only
//! "logged out" signal at startup.

use crate::error::KVError;
use crate::traits::KVStore;

pub const TOKEN_KEY: &str = "token";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Bearer token, if one is stored. An empty value counts as absent.
pub fn read_token(store: &dyn KVStore) -> Result<Option<String>, KVError> {
    Ok(store.get_string(TOKEN_KEY)?.filter(|t| !t.is_empty()))
}

pub fn read_refresh_token(store: &dyn KVStore) -> Result<Option<String>, KVError> {
    Ok(store.get_string(REFRESH_TOKEN_KEY)?.filter(|t| !t.is_empty()))
}

/// Store a freshly issued token pair. A missing refresh token clears any
/// stale one.
pub fn write_tokens(
    store: &dyn KVStore,
    token: &str,
    refresh_token: Option<&str>,
) -> Result<(), KVError> {
    store.set_string(TOKEN_KEY, token)?;
    match refresh_token {
        Some(r) => store.set_string(REFRESH_TOKEN_KEY, r),
        None => store.delete(REFRESH_TOKEN_KEY),
    }
}

/// Remove both tokens.
pub fn purge_tokens(store: &dyn KVStore) -> Result<(), KVError> {
    store.batch_delete(&[TOKEN_KEY, REFRESH_TOKEN_KEY])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[test]
    fn write_read_purge() {
        let store = MemoryStore::new();
        assert_eq!(read_token(&store).unwrap(), None);

        write_tokens(&store, "jwt", Some("refresh")).unwrap();
        assert_eq!(read_token(&store).unwrap().as_deref(), Some("jwt"));
        assert_eq!(read_refresh_token(&store).unwrap().as_deref(), Some("refresh"));

        purge_tokens(&store).unwrap();
        assert_eq!(read_token(&store).unwrap(), None);
        assert_eq!(read_refresh_token(&store).unwrap(), None);
    }

    #[test]
    fn new_login_without_refresh_clears_old_refresh() {
        let store = MemoryStore::new();
        write_tokens(&store, "a", Some("r")).unwrap();
        write_tokens(&store, "b", None).unwrap();
        assert_eq!(read_token(&store).unwrap().as_deref(), Some("b"));
        assert_eq!(read_refresh_token(&store).unwrap(), None);
    }

    #[test]
    fn empty_token_is_absent() {
        let store = MemoryStore::new();
        store.set_string(TOKEN_KEY, "").unwrap();
        assert_eq!(read_token(&store).unwrap(), None);
    }
}

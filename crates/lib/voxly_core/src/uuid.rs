// Identifier helpers.
//
// User ids and session ids are both random UUIDv4 values. Session ids are
// deliberately unrelated to anything in the bearer token.

use uuid::Uuid;

/// Generate a new user id.
pub fn new_user_id() -> Uuid {
    Uuid::new_v4()
}

/// Generate a new opaque session id.
pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_is_v4() {
        let id = new_user_id();
        assert_eq!(id.get_version(), Some(uuid::Version::Random));
    }

    #[test]
    fn session_ids_do_not_repeat() {
        let a = new_session_id();
        let b = new_session_id();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }
}

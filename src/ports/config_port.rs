//! Configuration access port trait.

/// Raw key lookup. Typed parsing and defaults live in
/// [`crate::domain::config_validation`].
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
}

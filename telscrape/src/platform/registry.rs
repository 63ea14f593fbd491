//! Global platform registry for looking up platform definitions.

use std::sync::{LazyLock, RwLock};

use indexmap::IndexMap;

use super::definition::PlatformDefinition;
use super::vendors;
use crate::error::{PlatformError, Result};

/// Global platform registry.
static REGISTRY: LazyLock<RwLock<PlatformRegistry>> = LazyLock::new(|| {
    let mut registry = PlatformRegistry::new();
    registry.register_builtin_platforms();
    RwLock::new(registry)
});

/// Registry for platform definitions, in registration order.
#[derive(Debug, Default)]
pub struct PlatformRegistry {
    platforms: IndexMap<String, PlatformDefinition>,
}

impl PlatformRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            platforms: IndexMap::new(),
        }
    }

    /// Get the global registry.
    pub fn global() -> &'static RwLock<PlatformRegistry> {
        &REGISTRY
    }

    fn register_builtin_platforms(&mut self) {
        for platform in [
            vendors::generic::platform(),
            vendors::cisco_ios::platform(),
            vendors::omnistack::platform(),
        ] {
            self.platforms.insert(platform.name.clone(), platform);
        }
    }

    /// Register a platform definition. Names must be unique.
    pub fn register(&mut self, platform: PlatformDefinition) -> Result<()> {
        if self.platforms.contains_key(&platform.name) {
            return Err(PlatformError::AlreadyRegistered {
                name: platform.name.clone(),
            }
            .into());
        }
        // Reject patterns that cannot compile up front.
        platform.compile_prompt()?;
        self.platforms.insert(platform.name.clone(), platform);
        Ok(())
    }

    /// Get a platform by name.
    pub fn get(&self, name: &str) -> Option<&PlatformDefinition> {
        self.platforms.get(name)
    }

    /// Check if a platform is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.platforms.contains_key(name)
    }

    /// List all registered platform names.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.platforms.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_registered() {
        let registry = PlatformRegistry::global().read().unwrap();
        let names: Vec<_> = registry.names().cloned().collect();
        assert!(names.starts_with(&[
            "generic".to_string(),
            "cisco_ios".to_string(),
            "omnistack".to_string(),
        ]));
        assert!(registry.contains("cisco_ios"));
        assert!(registry.get("juniper").is_none());
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = PlatformRegistry::new();
        registry.register(PlatformDefinition::new("lab")).unwrap();
        let err = registry.register(PlatformDefinition::new("lab")).unwrap_err();
        assert!(err.to_string().contains("already registered"));
    }

    #[test]
    fn test_register_rejects_bad_pattern() {
        let mut registry = PlatformRegistry::new();
        let platform = PlatformDefinition::new("lab").with_prompt_pattern("(");
        assert!(registry.register(platform).is_err());
        assert!(!registry.contains("lab"));
    }

    #[test]
    fn test_register_global() {
        PlatformRegistry::global()
            .write()
            .unwrap()
            .register(PlatformDefinition::new("registry_test_platform"))
            .unwrap();
        assert!(
            PlatformRegistry::global()
                .read()
                .unwrap()
                .contains("registry_test_platform")
        );
    }
}

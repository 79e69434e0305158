//! Stage registry
//!
//! Maps stage names to shared stage instances so pipelines can be described by name, as
//! the configuration file does.

use super::error::CleanupError;
use super::stage::CleanupStage;
use super::stages::{CollapseSpaces, TrimTrailingWhitespace};
use spanclean_config::StagesConfig;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of named cleanup stages
#[derive(Clone, Default)]
pub struct StageRegistry {
    stages: HashMap<String, Arc<dyn CleanupStage>>,
}

impl StageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stage under its own name
    ///
    /// If a stage with the same name already exists, it will be replaced.
    pub fn register<S: CleanupStage + 'static>(&mut self, stage: S) {
        self.register_shared(Arc::new(stage));
    }

    pub fn register_shared(&mut self, stage: Arc<dyn CleanupStage>) {
        self.stages.insert(stage.name().to_string(), stage);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn CleanupStage>> {
        self.stages.get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.stages.contains_key(name)
    }

    /// All registered stage names (sorted)
    pub fn list_stages(&self) -> Vec<String> {
        let mut names: Vec<_> = self.stages.keys().cloned().collect();
        names.sort();
        names
    }

    /// Look up a pipeline, in order
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Arc<dyn CleanupStage>>, CleanupError> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.get(name)
                    .ok_or_else(|| CleanupError::UnknownStage(name.to_string()))
            })
            .collect()
    }

    /// A registry holding the built-in stages, configured from `config`
    pub fn with_builtin(config: &StagesConfig) -> Self {
        let mut registry = Self::new();
        registry.register(TrimTrailingWhitespace::from_config(&config.trim_trailing_whitespace));
        registry.register(CollapseSpaces::from_config(&config.collapse_spaces));
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::stage::FnStage;

    fn builtin() -> StageRegistry {
        let config = spanclean_config::load_defaults().unwrap();
        StageRegistry::with_builtin(&config.stages)
    }

    #[test]
    fn test_registry_creation() {
        let registry = StageRegistry::new();
        assert!(registry.list_stages().is_empty());
    }

    #[test]
    fn test_builtin_stages() {
        let registry = builtin();
        assert_eq!(
            registry.list_stages(),
            vec!["collapse-spaces", "trim-trailing-whitespace"]
        );
        assert!(registry.has("collapse-spaces"));
        assert!(!registry.has("format-document"));
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = builtin();
        registry.register(FnStage::new("collapse-spaces", |d, _, _| Ok(d.clone())));
        assert_eq!(registry.list_stages().len(), 2);
    }

    #[test]
    fn test_resolve_keeps_order() {
        let registry = builtin();
        let stages = registry
            .resolve(&["trim-trailing-whitespace", "collapse-spaces", "trim-trailing-whitespace"])
            .unwrap();
        let names: Vec<&str> = stages.iter().map(|stage| stage.name()).collect();
        assert_eq!(
            names,
            vec!["trim-trailing-whitespace", "collapse-spaces", "trim-trailing-whitespace"]
        );
    }

    #[test]
    fn test_resolve_unknown_stage() {
        let registry = builtin();
        let error = registry
            .resolve(&["collapse-spaces", "sort-usings"])
            .err()
            .unwrap();
        assert_eq!(error, CleanupError::UnknownStage("sort-usings".to_string()));
    }
}

//! Definition discovery and construction contracts, plus an in-process
//! registry implementing both.

use crate::definition::DeploymentDefinition;
use crate::error::{Error, Result};

/// Produces the ordered identifiers of the deployment definitions a run
/// should execute. The list may be filtered or extended by observers of the
/// `definitions-discovered` event before use.
pub trait Discovery {
    fn find_executable_identifiers(&self) -> Result<Vec<String>>;
}

/// Builds deployment definitions from discovered identifiers.
pub trait DeploymentFactory {
    /// Capability check: does this identifier produce a deployment
    /// definition? Identifiers failing this are skipped with a warning, not
    /// treated as failures.
    fn is_definition(&self, identifier: &str) -> bool;

    /// Construct the definition. Fails with `definition.construction_failed`
    /// when the identifier cannot be instantiated.
    fn create(&self, identifier: &str) -> Result<Box<dyn DeploymentDefinition>>;
}

type Constructor = Box<dyn Fn() -> Result<Box<dyn DeploymentDefinition>>>;

/// Explicit identifier-to-constructor registry.
///
/// Registration order is discovery order. Serves as both the discovery and
/// factory collaborator for programs that assemble their definitions in
/// code rather than from manifest files.
#[derive(Default)]
pub struct DefinitionRegistry {
    entries: Vec<(String, Constructor)>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, identifier: impl Into<String>, constructor: F)
    where
        F: Fn() -> Result<Box<dyn DeploymentDefinition>> + 'static,
    {
        self.entries.push((identifier.into(), Box::new(constructor)));
    }
}

impl Discovery for DefinitionRegistry {
    fn find_executable_identifiers(&self) -> Result<Vec<String>> {
        Ok(self.entries.iter().map(|(id, _)| id.clone()).collect())
    }
}

impl DeploymentFactory for DefinitionRegistry {
    fn is_definition(&self, identifier: &str) -> bool {
        self.entries.iter().any(|(id, _)| id == identifier)
    }

    fn create(&self, identifier: &str) -> Result<Box<dyn DeploymentDefinition>> {
        let (_, constructor) = self
            .entries
            .iter()
            .find(|(id, _)| id == identifier)
            .ok_or_else(|| Error::definition_not_found(identifier))?;

        constructor().map_err(|e| Error::construction_failed(identifier, e.message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::TaskDefinition;
    use crate::error::ErrorCode;

    struct EmptyDeployment {
        identifier: String,
        tasks: Vec<Box<dyn TaskDefinition>>,
    }

    impl DeploymentDefinition for EmptyDeployment {
        fn identifier(&self) -> &str {
            &self.identifier
        }

        fn define(&mut self) -> Result<()> {
            Ok(())
        }

        fn tasks(&self) -> &[Box<dyn TaskDefinition>] {
            &self.tasks
        }
    }

    fn empty(identifier: &str) -> Result<Box<dyn DeploymentDefinition>> {
        Ok(Box::new(EmptyDeployment {
            identifier: identifier.to_string(),
            tasks: Vec::new(),
        }))
    }

    #[test]
    fn identifiers_keep_registration_order() {
        let mut registry = DefinitionRegistry::new();
        registry.register("b", || empty("b"));
        registry.register("a", || empty("a"));

        let identifiers = registry.find_executable_identifiers().unwrap();
        assert_eq!(identifiers, vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn is_definition_checks_registration() {
        let mut registry = DefinitionRegistry::new();
        registry.register("known", || empty("known"));
        assert!(registry.is_definition("known"));
        assert!(!registry.is_definition("unknown"));
    }

    #[test]
    fn create_fails_for_unknown_identifier() {
        let registry = DefinitionRegistry::new();
        let err = registry.create("missing").unwrap_err();
        assert_eq!(err.code, ErrorCode::DefinitionNotFound);
    }

    #[test]
    fn constructor_errors_become_construction_failures() {
        let mut registry = DefinitionRegistry::new();
        registry.register("broken", || {
            Err(Error::internal_unexpected("constructor blew up"))
        });

        let err = registry.create("broken").unwrap_err();
        assert_eq!(err.code, ErrorCode::DefinitionConstructionFailed);
        assert!(err.message.contains("broken"));
    }
}

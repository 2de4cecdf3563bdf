//! Maps a task definition to the dispatcher capable of executing it.

use crate::definition::TaskDefinition;
use crate::dispatch::Dispatcher;
use crate::error::{Error, Result};

/// What to do when more than one dispatcher can handle a task definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmbiguityPolicy {
    /// Use the first registered match.
    #[default]
    FirstMatch,
    /// Fail resolution with `dispatch.ambiguous`.
    Reject,
}

/// Ordered dispatcher registry with first-match resolution.
#[derive(Default)]
pub struct DispatcherResolver {
    dispatchers: Vec<Box<dyn Dispatcher>>,
    ambiguity: AmbiguityPolicy,
}

impl DispatcherResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ambiguity_policy(mut self, policy: AmbiguityPolicy) -> Self {
        self.ambiguity = policy;
        self
    }

    /// Register a dispatcher. Registration order decides first-match wins.
    pub fn register(&mut self, dispatcher: Box<dyn Dispatcher>) {
        self.dispatchers.push(dispatcher);
    }

    /// Find the dispatcher for a task definition.
    ///
    /// Fails with `dispatch.no_dispatcher` when nothing matches, and with
    /// `dispatch.ambiguous` when several match under [`AmbiguityPolicy::Reject`].
    pub fn resolve(&self, task: &dyn TaskDefinition) -> Result<&dyn Dispatcher> {
        let mut matches = self
            .dispatchers
            .iter()
            .filter(|dispatcher| dispatcher.can_dispatch(task));

        let first = matches.next().ok_or_else(|| Error::no_dispatcher(task.kind()))?;

        if self.ambiguity == AmbiguityPolicy::Reject {
            let rest = matches.count();
            if rest > 0 {
                return Err(Error::ambiguous_dispatch(task.kind(), rest + 1));
            }
        }

        Ok(first.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use super::*;
    use crate::dispatch::DispatchResult;
    use crate::error::ErrorCode;

    struct StubTask;

    impl TaskDefinition for StubTask {
        fn kind(&self) -> &str {
            "stub"
        }

        fn describe(&self) -> String {
            "stub task".to_string()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct StubDispatcher {
        capable: bool,
        exit_code: i32,
    }

    impl Dispatcher for StubDispatcher {
        fn can_dispatch(&self, _task: &dyn TaskDefinition) -> bool {
            self.capable
        }

        fn dispatch(&self, _task: &dyn TaskDefinition) -> Result<DispatchResult> {
            Ok(DispatchResult::new(self.exit_code, "", ""))
        }
    }

    #[test]
    fn resolve_fails_when_nothing_matches() {
        let mut resolver = DispatcherResolver::new();
        resolver.register(Box::new(StubDispatcher {
            capable: false,
            exit_code: 0,
        }));

        let err = resolver.resolve(&StubTask).unwrap_err();
        assert_eq!(err.code, ErrorCode::DispatchNoDispatcher);
        assert!(err.message.contains("stub"));
    }

    #[test]
    fn resolve_returns_first_match_by_default() {
        let mut resolver = DispatcherResolver::new();
        resolver.register(Box::new(StubDispatcher {
            capable: true,
            exit_code: 11,
        }));
        resolver.register(Box::new(StubDispatcher {
            capable: true,
            exit_code: 22,
        }));

        let dispatcher = resolver.resolve(&StubTask).unwrap();
        let result = dispatcher.dispatch(&StubTask).unwrap();
        assert_eq!(result.exit_code(), 11);
    }

    #[test]
    fn reject_policy_fails_on_multiple_matches() {
        let mut resolver =
            DispatcherResolver::new().with_ambiguity_policy(AmbiguityPolicy::Reject);
        resolver.register(Box::new(StubDispatcher {
            capable: true,
            exit_code: 0,
        }));
        resolver.register(Box::new(StubDispatcher {
            capable: true,
            exit_code: 0,
        }));

        let err = resolver.resolve(&StubTask).unwrap_err();
        assert_eq!(err.code, ErrorCode::DispatchAmbiguous);
    }

    #[test]
    fn reject_policy_allows_a_single_match() {
        let mut resolver =
            DispatcherResolver::new().with_ambiguity_policy(AmbiguityPolicy::Reject);
        resolver.register(Box::new(StubDispatcher {
            capable: true,
            exit_code: 0,
        }));
        resolver.register(Box::new(StubDispatcher {
            capable: false,
            exit_code: 0,
        }));

        assert!(resolver.resolve(&StubTask).is_ok());
    }
}

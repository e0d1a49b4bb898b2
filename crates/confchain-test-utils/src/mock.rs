//! [`MockResolver`]: a scripted resolver that records every call.

use std::sync::{Arc, Mutex};

use confchain_core::{ConfigResolver, Error, Lookup, ResolverHandle, Result, Value};

/// What `get_parameter` answers with.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Value(Value),
    NotFound,
    /// Fail with [`Error::ParameterNotFound`] instead of returning a miss.
    NotFoundError,
    /// Fail with [`Error::Resolver`] carrying this message.
    Fail(String),
}

/// A recorded call, with owned copies of its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetParameter {
        name: String,
        namespace: Option<String>,
        scope: Option<String>,
    },
    HasParameter {
        name: String,
        namespace: Option<String>,
        scope: Option<String>,
    },
    SetDefaultNamespace(String),
}

impl Call {
    fn get(name: &str, namespace: Option<&str>, scope: Option<&str>) -> Self {
        Self::GetParameter {
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
            scope: scope.map(str::to_string),
        }
    }

    fn has(name: &str, namespace: Option<&str>, scope: Option<&str>) -> Self {
        Self::HasParameter {
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
            scope: scope.map(str::to_string),
        }
    }
}

/// Resolver with fixed answers, for asserting on chain traversal.
///
/// # Example
///
/// ```rust,no_run
/// use confchain_core::ChainConfigResolver;
/// use confchain_test_utils::MockResolver;
///
/// let first = MockResolver::new("first").not_found().shared();
/// let second = MockResolver::new("second").returning("value").shared();
///
/// let mut chain = ChainConfigResolver::new();
/// chain.add_resolver(first.clone(), 10);
/// chain.add_resolver(second.clone(), 5);
///
/// assert_eq!(chain.get_parameter("foo", None, None).unwrap(), "value");
/// assert_eq!(first.get_calls(), 1);
/// ```
#[derive(Debug)]
pub struct MockResolver {
    label: String,
    reply: Reply,
    has: bool,
    calls: Mutex<Vec<Call>>,
}

impl MockResolver {
    /// A resolver that has nothing: misses on get, `false` on has.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            reply: Reply::NotFound,
            has: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer every `get_parameter` with `value` and every `has_parameter` with `true`.
    pub fn returning(mut self, value: impl Into<Value>) -> Self {
        self.reply = Reply::Value(value.into());
        self.has = true;
        self
    }

    /// Miss on every `get_parameter`.
    pub fn not_found(mut self) -> Self {
        self.reply = Reply::NotFound;
        self
    }

    /// Report every `get_parameter` as [`Error::ParameterNotFound`].
    pub fn not_found_error(mut self) -> Self {
        self.reply = Reply::NotFoundError;
        self
    }

    /// Fail every `get_parameter` with [`Error::Resolver`].
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.reply = Reply::Fail(message.into());
        self
    }

    /// Override the `has_parameter` answer.
    pub fn has(mut self, has: bool) -> Self {
        self.has = has;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Every call received, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn get_calls(&self) -> usize {
        self.count(|call| matches!(call, Call::GetParameter { .. }))
    }

    pub fn has_calls(&self) -> usize {
        self.count(|call| matches!(call, Call::HasParameter { .. }))
    }

    /// Namespaces received through `set_default_namespace`.
    pub fn namespaces(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|call| match call {
                Call::SetDefaultNamespace(namespace) => Some(namespace.clone()),
                _ => None,
            })
            .collect()
    }

    fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| predicate(call))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ConfigResolver for MockResolver {
    fn get_parameter(
        &self,
        name: &str,
        namespace: Option<&str>,
        scope: Option<&str>,
    ) -> Result<Lookup> {
        self.record(Call::get(name, namespace, scope));
        match &self.reply {
            Reply::Value(value) => Ok(Lookup::Found(value.clone())),
            Reply::NotFound => Ok(Lookup::NotFound),
            Reply::NotFoundError => Err(Error::parameter_not_found(name, namespace)),
            Reply::Fail(message) => Err(Error::resolver(self.label.clone(), message.clone())),
        }
    }

    fn has_parameter(&self, name: &str, namespace: Option<&str>, scope: Option<&str>) -> bool {
        self.record(Call::has(name, namespace, scope));
        self.has
    }

    fn set_default_namespace(&self, namespace: &str) {
        self.record(Call::SetDefaultNamespace(namespace.to_string()));
    }
}

/// Map resolver handles back to the labels of the mocks they point at.
///
/// Handles that belong to none of `mocks` are reported as `"?"`.
pub fn identify(resolvers: &[ResolverHandle], mocks: &[Arc<MockResolver>]) -> Vec<String> {
    resolvers
        .iter()
        .map(|handle| {
            mocks
                .iter()
                .find(|mock| std::ptr::addr_eq(Arc::as_ptr(handle), Arc::as_ptr(*mock)))
                .map_or_else(|| "?".to_string(), |mock| mock.label.clone())
        })
        .collect()
}

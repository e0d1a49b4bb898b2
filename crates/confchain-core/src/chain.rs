//! Priority-ordered resolver chain
//!
//! The `ChainConfigResolver` holds resolvers registered with an integer
//! priority and answers parameter queries by asking them in descending
//! priority order. The first resolver with an answer wins.
//!
//! Ordering is computed lazily: the first read after a registration sorts the
//! entries, and every later read reuses that order until the next
//! registration.

use std::cmp::Reverse;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::resolver::{ConfigResolver, Lookup, ResolverHandle, Value};
use crate::{Error, Result};

/// A resolver registered with its priority
struct Entry {
    resolver: ResolverHandle,
    priority: i32,
}

/// Chain of configuration resolvers queried in priority order
///
/// Higher priority wins. Resolvers sharing a priority are queried in the
/// order they were added.
///
/// # Example
///
/// ```ignore
/// use confchain_core::ChainConfigResolver;
///
/// let mut chain = ChainConfigResolver::new();
/// chain.add_resolver(site_settings, 100);
/// chain.add_resolver(defaults, 0);
///
/// let languages = chain.get_parameter("languages", Some("app"), Some("site_en"))?;
/// ```
pub struct ChainConfigResolver {
    /// Registrations in insertion order
    entries: Vec<Entry>,

    /// Resolvers sorted by descending priority; empty cell means stale
    sorted: OnceLock<Vec<ResolverHandle>>,

    default_namespace: RwLock<Option<String>>,

    #[cfg(test)]
    sort_count: std::sync::atomic::AtomicUsize,
}

impl ChainConfigResolver {
    /// Create an empty chain
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            sorted: OnceLock::new(),
            default_namespace: RwLock::new(None),
            #[cfg(test)]
            sort_count: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Register a resolver with the given priority.
    ///
    /// Any priority is accepted, including negative and duplicate values.
    /// The same resolver may be registered more than once. The cached order
    /// is discarded and recomputed on the next read.
    ///
    /// A default namespace set earlier is not pushed to `resolver`.
    pub fn add_resolver(&mut self, resolver: ResolverHandle, priority: i32) {
        self.entries.push(Entry { resolver, priority });
        self.sorted = OnceLock::new();
    }

    /// Register a resolver with priority 0.
    pub fn add_resolver_default(&mut self, resolver: ResolverHandle) {
        self.add_resolver(resolver, 0);
    }

    /// All registered resolvers, highest priority first.
    ///
    /// Within one epoch (no registration in between) every call returns the
    /// same slice without sorting again.
    pub fn all_resolvers(&self) -> &[ResolverHandle] {
        self.sorted.get_or_init(|| self.sort_resolvers())
    }

    fn sort_resolvers(&self) -> Vec<ResolverHandle> {
        #[cfg(test)]
        self.sort_count
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);

        tracing::trace!(entries = self.entries.len(), "Sorting resolvers");

        let mut ordered: Vec<&Entry> = self.entries.iter().collect();
        // sort_by_key is stable, so equal priorities keep insertion order
        ordered.sort_by_key(|entry| Reverse(entry.priority));
        ordered
            .into_iter()
            .map(|entry| Arc::clone(&entry.resolver))
            .collect()
    }

    /// Walk the chain until a resolver answers.
    ///
    /// Misses move on to the next resolver, whether reported as
    /// [`Lookup::NotFound`] or as [`Error::ParameterNotFound`]. Any other
    /// error stops the walk and is returned untouched.
    fn lookup(&self, name: &str, namespace: Option<&str>, scope: Option<&str>) -> Result<Lookup> {
        for (position, resolver) in self.all_resolvers().iter().enumerate() {
            tracing::trace!(position, name, ?namespace, ?scope, "Consulting resolver");
            match resolver.get_parameter(name, namespace, scope) {
                Ok(Lookup::Found(value)) => return Ok(Lookup::Found(value)),
                Ok(Lookup::NotFound) => {}
                Err(e) if e.is_parameter_not_found() => {
                    tracing::trace!(position, error = %e, "Resolver reported missing parameter");
                }
                Err(e) => return Err(e),
            }
        }

        tracing::debug!(
            name,
            ?namespace,
            ?scope,
            resolvers = self.entries.len(),
            "Parameter not found in any resolver"
        );
        Ok(Lookup::NotFound)
    }

    /// Get a parameter from the first resolver that has it.
    ///
    /// # Errors
    ///
    /// - [`Error::ParameterNotFound`] if every resolver missed
    /// - any other error a resolver returned, unmodified
    pub fn get_parameter(
        &self,
        name: &str,
        namespace: Option<&str>,
        scope: Option<&str>,
    ) -> Result<Value> {
        self.lookup(name, namespace, scope)?
            .into_result(name, namespace)
    }

    /// Whether any resolver has the parameter.
    ///
    /// Stops at the first resolver that reports it.
    pub fn has_parameter(&self, name: &str, namespace: Option<&str>, scope: Option<&str>) -> bool {
        self.all_resolvers()
            .iter()
            .any(|resolver| resolver.has_parameter(name, namespace, scope))
    }

    /// Remember `namespace` and pass it to every resolver registered so far.
    ///
    /// Resolvers added later do not receive it.
    pub fn set_default_namespace(&self, namespace: &str) {
        *self
            .default_namespace
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(namespace.to_owned());

        tracing::debug!(
            namespace,
            resolvers = self.entries.len(),
            "Broadcasting default namespace"
        );
        for entry in &self.entries {
            entry.resolver.set_default_namespace(namespace);
        }
    }

    /// The namespace last passed to [`set_default_namespace`](Self::set_default_namespace).
    ///
    /// # Errors
    ///
    /// [`Error::LogicViolation`] if no default namespace was ever set.
    pub fn default_namespace(&self) -> Result<String> {
        self.default_namespace
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| {
                Error::logic_violation("no default namespace has been set on the resolver chain")
            })
    }

    /// Number of registrations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no resolver is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ChainConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ChainConfigResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let priorities: Vec<i32> = self.entries.iter().map(|entry| entry.priority).collect();
        f.debug_struct("ChainConfigResolver")
            .field("priorities", &priorities)
            .field("sorted", &self.sorted.get().is_some())
            .field(
                "default_namespace",
                &*self
                    .default_namespace
                    .read()
                    .unwrap_or_else(PoisonError::into_inner),
            )
            .finish()
    }
}

/// A chain can itself be a member of another chain.
///
/// Exhausting this chain is reported to the outer chain as a miss.
impl ConfigResolver for ChainConfigResolver {
    fn get_parameter(
        &self,
        name: &str,
        namespace: Option<&str>,
        scope: Option<&str>,
    ) -> Result<Lookup> {
        self.lookup(name, namespace, scope)
    }

    fn has_parameter(&self, name: &str, namespace: Option<&str>, scope: Option<&str>) -> bool {
        ChainConfigResolver::has_parameter(self, name, namespace, scope)
    }

    fn set_default_namespace(&self, namespace: &str) {
        ChainConfigResolver::set_default_namespace(self, namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::Ordering;

    /// Minimal resolver: always answers with a fixed value, records namespaces
    struct Fixed {
        value: Option<Value>,
        namespaces: Mutex<Vec<String>>,
    }

    impl Fixed {
        fn handle(value: Option<Value>) -> Arc<Self> {
            Arc::new(Self {
                value,
                namespaces: Mutex::new(Vec::new()),
            })
        }
    }

    impl ConfigResolver for Fixed {
        fn get_parameter(&self, _: &str, _: Option<&str>, _: Option<&str>) -> Result<Lookup> {
            Ok(self.value.clone().into())
        }

        fn has_parameter(&self, _: &str, _: Option<&str>, _: Option<&str>) -> bool {
            self.value.is_some()
        }

        fn set_default_namespace(&self, namespace: &str) {
            self.namespaces.lock().unwrap().push(namespace.to_string());
        }
    }

    fn sorts(chain: &ChainConfigResolver) -> usize {
        chain.sort_count.load(Ordering::Relaxed)
    }

    #[test]
    fn test_new_chain_is_empty() {
        let chain = ChainConfigResolver::new();
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
        assert!(chain.all_resolvers().is_empty());
    }

    #[test]
    fn test_sorts_once_per_epoch() {
        let mut chain = ChainConfigResolver::new();
        chain.add_resolver(Fixed::handle(None), 10);
        chain.add_resolver(Fixed::handle(None), 50);
        chain.add_resolver(Fixed::handle(None), 100);
        assert_eq!(sorts(&chain), 0);

        let first = chain.all_resolvers().as_ptr();
        for _ in 0..5 {
            assert_eq!(chain.all_resolvers().as_ptr(), first);
        }
        assert_eq!(sorts(&chain), 1);
    }

    #[test]
    fn test_add_resolver_invalidates_order() {
        let mut chain = ChainConfigResolver::new();
        chain.add_resolver(Fixed::handle(None), 10);
        chain.all_resolvers();
        chain.all_resolvers();
        assert_eq!(sorts(&chain), 1);

        chain.add_resolver(Fixed::handle(None), 101);
        assert_eq!(chain.all_resolvers().len(), 2);
        assert_eq!(chain.all_resolvers().len(), 2);
        assert_eq!(sorts(&chain), 2);
    }

    #[test]
    fn test_queries_sort_lazily() {
        let mut chain = ChainConfigResolver::new();
        chain.add_resolver(Fixed::handle(Some(json!("low"))), 1);
        chain.add_resolver(Fixed::handle(Some(json!("high"))), 2);

        assert_eq!(chain.get_parameter("p", None, None).unwrap(), json!("high"));
        assert!(chain.has_parameter("p", None, None));
        assert_eq!(sorts(&chain), 1);
    }

    #[test]
    fn test_default_namespace_not_pushed_to_later_resolvers() {
        let mut chain = ChainConfigResolver::new();
        let early = Fixed::handle(None);
        let late = Fixed::handle(None);

        chain.add_resolver(early.clone(), 0);
        chain.set_default_namespace("foo");
        chain.add_resolver(late.clone(), 0);

        assert_eq!(*early.namespaces.lock().unwrap(), vec!["foo"]);
        assert!(late.namespaces.lock().unwrap().is_empty());
        assert_eq!(chain.default_namespace().unwrap(), "foo");
    }

    #[test]
    fn test_default_namespace_unset_is_logic_violation() {
        let chain = ChainConfigResolver::new();
        let err = chain.default_namespace().unwrap_err();
        assert!(matches!(err, Error::LogicViolation { .. }));
        assert!(!err.is_parameter_not_found());
    }

    #[test]
    fn test_debug_shows_priorities() {
        let mut chain = ChainConfigResolver::new();
        chain.add_resolver(Fixed::handle(None), -3);
        chain.add_resolver(Fixed::handle(None), 7);
        let debug = format!("{chain:?}");
        assert!(debug.contains("[-3, 7]"), "got: {debug}");
        assert!(debug.contains("sorted: false"), "got: {debug}");
    }
}

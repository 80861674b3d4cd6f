//! Named port registry.
//!
//! Maps controller service names (such as `"storage"`) to the integer ports
//! carried in begin and end actions. Ports are allocated from 1 upward and a
//! name may be re-bound between blocks, which is why the bridge resolves the
//! storage port every time it builds an action.

use blockbridge_core::{PortError, PortResolver, PortResult};
use blockbridge_types::StoragePort;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

#[derive(Debug, Default)]
struct RegistryInner {
    by_name: HashMap<String, StoragePort>,
    by_port: BTreeMap<StoragePort, String>,
    last_port: StoragePort,
}

impl RegistryInner {
    fn bind(&mut self, name: &str, port: StoragePort) {
        self.by_name.insert(name.to_string(), port);
        self.by_port.insert(port, name.to_string());
        self.last_port = self.last_port.max(port);
    }

    /// Port above the highest ever bound, or the lowest gap once that
    /// would overflow.
    fn next_free_port(&self) -> Option<StoragePort> {
        if let Some(port) = self.last_port.checked_add(1) {
            return Some(port);
        }

        let mut candidate: StoragePort = 1;
        for &bound in self.by_port.keys() {
            if bound > candidate {
                break;
            }
            candidate = candidate.checked_add(1)?;
        }
        Some(candidate)
    }
}

/// Registry of named controller service ports.
#[derive(Debug, Default)]
pub struct PortRegistry {
    inner: RwLock<RegistryInner>,
}

impl PortRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with explicit bindings.
    pub fn with_bindings<I, S>(bindings: I) -> PortResult<Self>
    where
        I: IntoIterator<Item = (S, StoragePort)>,
        S: AsRef<str>,
    {
        let registry = Self::new();
        for (name, port) in bindings {
            registry.register_at(name.as_ref(), port)?;
        }
        Ok(registry)
    }

    /// Register `name` on the next free port.
    ///
    /// Registering a name that is already bound returns its existing port.
    pub fn register(&self, name: &str) -> PortResult<StoragePort> {
        let mut inner = self.inner.write();
        if let Some(port) = inner.by_name.get(name) {
            return Ok(*port);
        }

        let port = inner.next_free_port().ok_or(PortError::Exhausted)?;
        inner.bind(name, port);
        debug!(name, port, "Registered controller port");
        Ok(port)
    }

    /// Bind `name` to a specific port.
    pub fn register_at(&self, name: &str, port: StoragePort) -> PortResult<()> {
        if port == 0 {
            return Err(PortError::Reserved);
        }

        let mut inner = self.inner.write();
        match inner.by_name.get(name) {
            Some(existing) if *existing == port => return Ok(()),
            Some(existing) => {
                return Err(PortError::AlreadyBound {
                    name: name.to_string(),
                    existing: *existing,
                })
            }
            None => {}
        }
        if let Some(owner) = inner.by_port.get(&port) {
            return Err(PortError::PortInUse {
                port,
                owner: owner.clone(),
            });
        }

        inner.bind(name, port);
        debug!(name, port, "Bound controller port");
        Ok(())
    }

    /// Remove a binding, returning the port it held.
    pub fn unregister(&self, name: &str) -> Option<StoragePort> {
        let mut inner = self.inner.write();
        let port = inner.by_name.remove(name)?;
        inner.by_port.remove(&port);
        debug!(name, port, "Unregistered controller port");
        Some(port)
    }

    /// Look up the port bound to `name`.
    pub fn lookup(&self, name: &str) -> Option<StoragePort> {
        self.inner.read().by_name.get(name).copied()
    }

    /// All bindings ordered by port.
    pub fn bindings(&self) -> Vec<(String, StoragePort)> {
        self.inner
            .read()
            .by_port
            .iter()
            .map(|(port, name)| (name.clone(), *port))
            .collect()
    }

    /// Number of bound names.
    pub fn len(&self) -> usize {
        self.inner.read().by_name.len()
    }

    /// Whether the registry has no bindings.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PortResolver for PortRegistry {
    fn resolve_port(&self, name: &str) -> PortResult<StoragePort> {
        self.lookup(name)
            .ok_or_else(|| PortError::Unknown(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_allocates_from_one() {
        let registry = PortRegistry::new();
        assert_eq!(registry.register("storage"), Ok(1));
        assert_eq!(registry.register("bank"), Ok(2));
        assert_eq!(registry.register("storage"), Ok(1));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_skips_explicit_ports() {
        let registry = PortRegistry::new();
        registry.register_at("vtransfer", 1).unwrap();
        registry.register_at("dibc", 3).unwrap();
        assert_eq!(registry.register("storage"), Ok(4));
    }

    #[test]
    fn test_register_after_highest_port_reuses_lowest_gap() {
        let registry = PortRegistry::new();
        registry.register_at("vtransfer", u32::MAX).unwrap();
        assert_eq!(registry.register("storage"), Ok(1));

        registry.register_at("dibc", 2).unwrap();
        assert_eq!(registry.register("bank"), Ok(3));

        registry.unregister("storage");
        assert_eq!(registry.register("timer"), Ok(1));
        assert_eq!(registry.lookup("vtransfer"), Some(u32::MAX));
    }

    #[test]
    fn test_register_at_conflicts() {
        let registry = PortRegistry::new();
        registry.register_at("storage", 5).unwrap();
        registry.register_at("storage", 5).unwrap();

        assert_eq!(
            registry.register_at("storage", 6),
            Err(PortError::AlreadyBound {
                name: "storage".to_string(),
                existing: 5
            })
        );
        assert_eq!(
            registry.register_at("bank", 5),
            Err(PortError::PortInUse {
                port: 5,
                owner: "storage".to_string()
            })
        );
        assert_eq!(registry.register_at("bank", 0), Err(PortError::Reserved));
    }

    #[test]
    fn test_resolve_follows_rebinding() {
        let registry = PortRegistry::with_bindings([("storage", 2)]).unwrap();
        assert_eq!(registry.resolve_port("storage"), Ok(2));

        assert_eq!(registry.unregister("storage"), Some(2));
        assert_eq!(
            registry.resolve_port("storage"),
            Err(PortError::Unknown("storage".to_string()))
        );

        registry.register_at("storage", 9).unwrap();
        assert_eq!(registry.resolve_port("storage"), Ok(9));
    }

    #[test]
    fn test_bindings_sorted_by_port() {
        let registry = PortRegistry::with_bindings([("b", 7), ("a", 2)]).unwrap();
        assert_eq!(
            registry.bindings(),
            vec![("a".to_string(), 2), ("b".to_string(), 7)]
        );
    }
}

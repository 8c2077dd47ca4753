// Executing Service Registry

use crate::domain::HostProfile;
use crate::port::{ExecutingService, ExecutionError, ShellKind};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Executing services keyed by executor name
#[derive(Clone, Default)]
pub struct ExecutingServices {
    services: HashMap<String, Arc<dyn ExecutingService>>,
}

impl ExecutingServices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service under its short name, replacing any previous one
    pub fn register(&mut self, service: Arc<dyn ExecutingService>) {
        debug!(executor = service.short_name(), "Registered executing service");
        self.services.insert(service.short_name().to_string(), service);
    }

    /// Build the registry for a host
    ///
    /// Windows hosts get `psh` and `cmd`, everything else gets `sh`; a shell
    /// is only registered if the host reports it.
    pub fn for_host<F>(host: &HostProfile, mut factory: F) -> Self
    where
        F: FnMut(ShellKind) -> Arc<dyn ExecutingService>,
    {
        let candidates: &[ShellKind] = if host.is_windows() {
            &[ShellKind::PowerShell, ShellKind::Cmd]
        } else {
            &[ShellKind::Sh]
        };

        let mut registry = Self::new();
        for kind in candidates {
            if host.has_shell(kind.short_name()) {
                registry.register(factory(*kind));
            }
        }
        registry
    }

    /// Service for an executor name
    ///
    /// # Errors
    /// - ExecutionError::UnsupportedExecutor if nothing is registered under `name`
    pub fn resolve(&self, name: &str) -> Result<&Arc<dyn ExecutingService>, ExecutionError> {
        self.services
            .get(name)
            .ok_or_else(|| ExecutionError::UnsupportedExecutor(name.to_string()))
    }

    /// Registered executor names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.services.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

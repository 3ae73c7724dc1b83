//! Ordered plugin registration and event resolution.

use parley_foundation::{Error, ErrorKind, Result};

use crate::declaration::Declarations;
use crate::event::Event;
use crate::plugin::DynPlugin;

/// Where an event resolved to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Registration index of the plugin.
    pub plugin: usize,
    /// Entry index within that plugin's table.
    pub entry: usize,
    /// Number of keywords the entry requires.
    pub specificity: usize,
}

/// Plugins in registration order.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn DynPlugin>>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a plugin. Names must be unique.
    pub fn register(&mut self, plugin: Box<dyn DynPlugin>) -> Result<usize> {
        if self.index_of(plugin.name()).is_some() {
            return Err(Error::new(ErrorKind::DuplicatePlugin(
                plugin.name().to_string(),
            )));
        }
        self.plugins.push(plugin);
        Ok(self.plugins.len() - 1)
    }

    /// Number of registered plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Registration index of the plugin named `name`.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.plugins.iter().position(|p| p.name() == name)
    }

    /// The plugin at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&dyn DynPlugin> {
        self.plugins.get(index).map(|p| &**p)
    }

    /// The plugin named `name`.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&dyn DynPlugin> {
        self.index_of(name).and_then(|i| self.get(i))
    }

    /// Mutable access to the plugin at `index`.
    pub fn plugin_mut(&mut self, index: usize) -> Option<&mut (dyn DynPlugin + 'static)> {
        self.plugins.get_mut(index).map(|p| &mut **p)
    }

    /// Plugins in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn DynPlugin> {
        self.plugins.iter().map(|p| &**p)
    }

    /// Mutable plugins in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (dyn DynPlugin + 'static)> {
        self.plugins.iter_mut().map(|p| &mut **p)
    }

    /// Every plugin's declarations, in registration order.
    #[must_use]
    pub fn declarations(&self) -> Vec<&Declarations> {
        self.plugins.iter().map(|p| p.declarations()).collect()
    }

    /// Finds the handler for `event`.
    ///
    /// An event naming a plugin consults only that plugin. Otherwise the
    /// most specific satisfied entry across all plugins wins; ties go to the
    /// earliest plugin, then its earliest entry.
    pub fn resolve(&self, event: &Event) -> Result<Resolution> {
        let no_handler =
            || Error::cannot_dispatch(event.predicate(), event.plugin_name().map(str::to_string));

        if let Some(name) = event.plugin_name() {
            let index = self.index_of(name).ok_or_else(no_handler)?;
            let candidate = self.plugins[index]
                .best_match(event)
                .ok_or_else(no_handler)?;
            return Ok(Resolution {
                plugin: index,
                entry: candidate.entry,
                specificity: candidate.specificity,
            });
        }

        let mut best: Option<Resolution> = None;
        for (index, plugin) in self.plugins.iter().enumerate() {
            let Some(candidate) = plugin.best_match(event) else {
                continue;
            };
            if best.is_none_or(|b| candidate.specificity > b.specificity) {
                best = Some(Resolution {
                    plugin: index,
                    entry: candidate.entry,
                    specificity: candidate.specificity,
                });
            }
        }
        best.ok_or_else(no_handler)
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.plugins.iter().map(|p| p.name()))
            .finish()
    }
}

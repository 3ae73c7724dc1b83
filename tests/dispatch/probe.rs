//! A configurable plugin that records which handler ran.

use parley_plugin::{
    Declarations, DispatchTable, HandlerResult, Invocation, Plugin, WorldContext,
};

/// Records `predicate:entry` for every handled event.
pub struct Probe {
    name: String,
    entries: Vec<(&'static str, Vec<&'static str>)>,
    pub calls: Vec<String>,
}

impl Probe {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Vec::new(),
            calls: Vec::new(),
        }
    }

    pub fn on(mut self, predicate: &'static str, keywords: &[&'static str]) -> Self {
        self.entries.push((predicate, keywords.to_vec()));
        self
    }

    fn record(&mut self, inv: &Invocation<'_>, ctx: &mut WorldContext<'_>) -> HandlerResult {
        let keywords: Vec<&str> = inv.keywords().collect();
        self.calls
            .push(format!("{}({})", inv.predicate(), keywords.join(",")));
        ctx.say(format!("{} handled {}", self.name, inv.predicate()));
        Ok(())
    }
}

impl Plugin for Probe {
    fn name(&self) -> &str {
        &self.name
    }

    fn declare(&self, decl: &mut Declarations) {
        for (predicate, _) in &self.entries {
            decl.add_predicate(*predicate);
        }
    }

    fn dispatch_table(&self) -> DispatchTable<Self> {
        let mut table = DispatchTable::new();
        for (predicate, keywords) in &self.entries {
            table.add(predicate, keywords.iter().copied(), Self::record);
        }
        table
    }
}

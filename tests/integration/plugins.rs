//! Small plugins that record what their handlers saw.

use parley_engine::Engine;
use parley_foundation::{Arguments, EntityId};
use parley_plugin::{
    DeclarationBundle, Declarations, DispatchTable, DynPlugin, HandlerResult, Invocation, Plugin,
    VerbForms, WorldContext,
};
use parley_runtime::Processor;

pub fn running_engine() -> Engine {
    let engine = Engine::pattern();
    engine.start().unwrap();
    engine
}

pub fn ready(engine: &Engine, plugins: Vec<Box<dyn DynPlugin>>) -> Processor {
    let mut processor = Processor::with_plugins(engine, plugins).unwrap();
    processor.finish_setup().unwrap();
    processor
}

fn named_thing(ctx: &mut WorldContext<'_>, property: &str, name: &str) -> HandlerResult {
    let entity = ctx.new_entity();
    ctx.set_string_value(entity, name)?;
    ctx.assert_event(property, Arguments::new().with("subj", [entity]))
}

// =============================================================================
// Walker
// =============================================================================

/// Walks between rooms; remembers every `go` it handled.
#[derive(Default)]
pub struct Walker {
    pub visits: Vec<(Vec<EntityId>, Vec<EntityId>)>,
}

impl Walker {
    fn go(&mut self, inv: &Invocation<'_>, _ctx: &mut WorldContext<'_>) -> HandlerResult {
        self.visits
            .push((inv.argument("subj").to_vec(), inv.argument("dest").to_vec()));
        Ok(())
    }
}

impl Plugin for Walker {
    fn name(&self) -> &str {
        "walker"
    }

    fn declare(&self, decl: &mut Declarations) {
        decl.include(&DeclarationBundle::base())
            .include(&DeclarationBundle::english())
            .auto_add_count_noun("room")
            .add_intransitive_verb(&VerbForms::regular("go"), "go(subj,dest)");
    }

    fn dispatch_table(&self) -> DispatchTable<Self> {
        DispatchTable::new().on("go", ["subj", "dest"], Self::go)
    }

    fn setup(&mut self, ctx: &mut WorldContext<'_>) -> HandlerResult {
        named_thing(ctx, "room", "docs")?;
        named_thing(ctx, "room", "attic")
    }
}

// =============================================================================
// Viewer
// =============================================================================

/// Handles `show` with a fixed keyword set.
pub struct Viewer {
    name: &'static str,
    keywords: &'static [&'static str],
    pub shown: usize,
}

impl Viewer {
    pub fn new(name: &'static str, keywords: &'static [&'static str]) -> Self {
        Self {
            name,
            keywords,
            shown: 0,
        }
    }

    fn show(&mut self, _inv: &Invocation<'_>, ctx: &mut WorldContext<'_>) -> HandlerResult {
        self.shown += 1;
        ctx.say(format!("{} showed it", self.name));
        Ok(())
    }
}

impl Plugin for Viewer {
    fn name(&self) -> &str {
        self.name
    }

    fn declare(&self, decl: &mut Declarations) {
        decl.add_predicate("show");
    }

    fn dispatch_table(&self) -> DispatchTable<Self> {
        DispatchTable::new().on("show", self.keywords.iter().copied(), Self::show)
    }
}

// =============================================================================
// Maker
// =============================================================================

/// Makes a numbered widget from every blueprint it is given.
#[derive(Default)]
pub struct Maker {
    pub made: usize,
    pub analyses: usize,
}

impl Maker {
    fn make(&mut self, inv: &Invocation<'_>, ctx: &mut WorldContext<'_>) -> HandlerResult {
        for &blueprint in inv.argument("obj") {
            let name = ctx.string_value(blueprint)?.unwrap_or("widget").to_string();
            self.made += 1;
            named_thing(ctx, "widget", &format!("{name}-{}", self.made))?;
        }
        Ok(())
    }
}

impl Plugin for Maker {
    fn name(&self) -> &str {
        "maker"
    }

    fn declare(&self, decl: &mut Declarations) {
        decl.include(&DeclarationBundle::base())
            .include(&DeclarationBundle::english())
            .auto_add_count_noun("widget")
            .auto_add_transitive_verb("make");
    }

    fn dispatch_table(&self) -> DispatchTable<Self> {
        DispatchTable::new().on("make", ["subj", "obj"], Self::make)
    }

    fn setup(&mut self, ctx: &mut WorldContext<'_>) -> HandlerResult {
        named_thing(ctx, "widget", "sprocket")
    }

    fn analyze_world(&mut self, _ctx: &mut WorldContext<'_>) -> HandlerResult {
        self.analyses += 1;
        Ok(())
    }
}

// =============================================================================
// Bell and Listener
// =============================================================================

/// Tolling a bell asserts `resonating`; checking reports whether it holds.
#[derive(Default)]
pub struct Bell {
    pub tolled: usize,
    pub checks: Vec<bool>,
}

impl Bell {
    fn toll(&mut self, inv: &Invocation<'_>, ctx: &mut WorldContext<'_>) -> HandlerResult {
        for &bell in inv.argument("obj") {
            self.tolled += 1;
            ctx.assert_event("resonating", Arguments::new().with("subj", [bell]))?;
        }
        Ok(())
    }

    fn check(&mut self, inv: &Invocation<'_>, ctx: &mut WorldContext<'_>) -> HandlerResult {
        for &bell in inv.argument("obj") {
            let partial = Arguments::new().with("subj", [bell]);
            self.checks.push(ctx.world().holds("resonating", &partial));
        }
        Ok(())
    }
}

impl Plugin for Bell {
    fn name(&self) -> &str {
        "bell"
    }

    fn declare(&self, decl: &mut Declarations) {
        decl.include(&DeclarationBundle::base())
            .include(&DeclarationBundle::english())
            .add_predicate("resonating")
            .auto_add_transitive_verb("toll")
            .auto_add_transitive_verb("check");
    }

    fn dispatch_table(&self) -> DispatchTable<Self> {
        DispatchTable::new()
            .on("toll", ["subj", "obj"], Self::toll)
            .on("check", ["subj", "obj"], Self::check)
    }

    fn setup(&mut self, ctx: &mut WorldContext<'_>) -> HandlerResult {
        let gong = ctx.new_entity();
        ctx.set_string_value(gong, "gong")
    }
}

/// Counts every `resonating` event dispatched to it.
#[derive(Default)]
pub struct Listener {
    pub heard: usize,
}

impl Listener {
    fn hear(&mut self, _inv: &Invocation<'_>, _ctx: &mut WorldContext<'_>) -> HandlerResult {
        self.heard += 1;
        Ok(())
    }
}

impl Plugin for Listener {
    fn name(&self) -> &str {
        "listener"
    }

    fn declare(&self, decl: &mut Declarations) {
        decl.add_predicate("resonating");
    }

    fn dispatch_table(&self) -> DispatchTable<Self> {
        DispatchTable::new().on("resonating", ["subj"], Self::hear)
    }
}

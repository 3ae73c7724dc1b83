//! A demo plugin managing a virtual directory tree.
//!
//! Everything the shell knows lives in the world model, so snapshots and
//! reloads need no plugin-side state:
//!
//! - `directory(subj=[d])`: `d` is a directory
//! - `contains(container=[d], content=[x])`: `x` sits inside `d`
//! - `current(subj=[d])` / `previous(subj=[d])`: where `go` and `go back` lead
//! - the `up` and `back` entities are named pseudo-directories
//!
//! ```text
//! > make a directory named src
//! I made src.
//! > go to src
//! I went to src.
//! > go up
//! I went to up.
//! ```

use parley_foundation::{Arguments, EntityId, Result};
use parley_plugin::{
    Category, DeclarationBundle, Declarations, DispatchTable, HandlerResult, Invocation, Plugin,
    VerbForms, WorldContext,
};
use parley_storage::WorldModel;

/// Registered name of the shell plugin.
pub const SHELL_PLUGIN: &str = "shell";

const DIRECTORY: &str = "directory";
const CONTAINS: &str = "contains";
const CURRENT: &str = "current";
const PREVIOUS: &str = "previous";
const UP: &str = "up";
const BACK: &str = "back";

/// Name of the top directory created at setup.
pub const ROOT_NAME: &str = "root";
/// Name of the starting directory created at setup.
pub const HOME_NAME: &str = "home";

/// The demo shell.
#[derive(Debug, Default)]
pub struct ShellPlugin {
    analyses: usize,
    handled: usize,
}

impl ShellPlugin {
    /// Creates the plugin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the world description was regenerated.
    #[must_use]
    pub fn analyses(&self) -> usize {
        self.analyses
    }

    /// How many events the handlers accepted.
    #[must_use]
    pub fn handled(&self) -> usize {
        self.handled
    }

    // =========================================================================
    // Handlers
    // =========================================================================

    fn go(&mut self, inv: &Invocation<'_>, ctx: &mut WorldContext<'_>) -> HandlerResult {
        let dest = inv.single("dest")?;
        let here = current_directory(ctx.world());
        let target = match pseudo_name(ctx.world(), dest) {
            Some(UP) => {
                let here = here.ok_or_else(|| inv.invalid("I am not in any directory"))?;
                parent(ctx.world(), here)
                    .ok_or_else(|| inv.invalid(format!("{} has no parent", ctx.display_name(here))))?
            }
            Some(_) => previous_directory(ctx.world())
                .ok_or_else(|| inv.invalid("there is nowhere to go back to"))?,
            None if is_directory(ctx.world(), dest) => dest,
            None => {
                return Err(inv.invalid(format!("{} is not a directory", ctx.display_name(dest))));
            }
        };

        if let Some(here) = here {
            mark(ctx, PREVIOUS, here)?;
        }
        mark(ctx, CURRENT, target)?;
        self.handled += 1;
        Ok(())
    }

    fn show(&mut self, inv: &Invocation<'_>, ctx: &mut WorldContext<'_>) -> HandlerResult {
        for &shown in inv.argument("obj") {
            let line = listing(ctx, shown);
            ctx.say(line);
        }
        self.handled += 1;
        Ok(())
    }

    fn show_here(&mut self, inv: &Invocation<'_>, ctx: &mut WorldContext<'_>) -> HandlerResult {
        let here = current_directory(ctx.world()).ok_or_else(|| inv.invalid("I am not in any directory"))?;
        let line = listing(ctx, here);
        ctx.say(line);
        self.handled += 1;
        Ok(())
    }

    fn make(&mut self, inv: &Invocation<'_>, ctx: &mut WorldContext<'_>) -> HandlerResult {
        let here = current_directory(ctx.world()).ok_or_else(|| inv.invalid("I am not in any directory"))?;
        for &made in inv.argument("obj") {
            if !is_directory(ctx.world(), made) {
                return Err(inv.invalid(format!(
                    "I can only make directories, not {}",
                    ctx.display_name(made)
                )));
            }
            if parent(ctx.world(), made).is_some() || made == here {
                return Err(inv.invalid(format!("{} already exists", ctx.display_name(made))));
            }
            if let Some(name) = ctx.string_value(made)? {
                if holds_name(ctx.world(), here, name) {
                    return Err(inv.invalid(format!(
                        "{} already has a directory named {name}",
                        ctx.display_name(here)
                    )));
                }
            }
            ctx.assert_event(CONTAINS, containment(here, made))?;
        }
        self.handled += 1;
        Ok(())
    }

    fn relocate(&mut self, inv: &Invocation<'_>, ctx: &mut WorldContext<'_>) -> HandlerResult {
        let dest = inv.single("dest")?;
        if !is_directory(ctx.world(), dest) {
            return Err(inv.invalid(format!("{} is not a directory", ctx.display_name(dest))));
        }
        for &moved in inv.argument("obj") {
            if moved == dest || is_within(ctx.world(), dest, moved) {
                return Err(inv.invalid(format!(
                    "cannot move {} into itself",
                    ctx.display_name(moved)
                )));
            }
            ctx.retract(CONTAINS, &Arguments::new().with("content", [moved]))?;
            ctx.assert_event(CONTAINS, containment(dest, moved))?;
        }
        self.handled += 1;
        Ok(())
    }

    fn duplicate(&mut self, inv: &Invocation<'_>, ctx: &mut WorldContext<'_>) -> HandlerResult {
        let result = inv.single("result")?;
        if !is_directory(ctx.world(), result) {
            return Err(inv.invalid(format!("{} is not a directory", ctx.display_name(result))));
        }
        for &original in inv.argument("original") {
            if original == result || is_within(ctx.world(), result, original) {
                return Err(inv.invalid(format!(
                    "cannot copy {} into itself",
                    ctx.display_name(original)
                )));
            }
            copy_tree(ctx, original, result)?;
        }
        self.handled += 1;
        Ok(())
    }
}

impl Plugin for ShellPlugin {
    fn name(&self) -> &str {
        SHELL_PLUGIN
    }

    fn declare(&self, decl: &mut Declarations) {
        decl.include(&DeclarationBundle::base())
            .include(&DeclarationBundle::english())
            .add_relation(CONTAINS)
            .add_predicate(CURRENT)
            .add_predicate(PREVIOUS)
            .auto_add_count_noun(DIRECTORY)
            .add_count_noun("folder", "folders", DIRECTORY)
            .add_lexical_entry(UP, Category::Name, UP)
            .add_lexical_entry(BACK, Category::Name, BACK)
            .add_intransitive_verb(&VerbForms::regular("go"), "go(subj,dest)")
            .auto_add_transitive_verb("show")
            .auto_add_transitive_verb("make")
            .auto_add_transitive_verb("move")
            .add_transitive_verb(&VerbForms::regular("copy"), "copy(copier,original,to=result)");
    }

    fn dispatch_table(&self) -> DispatchTable<Self> {
        DispatchTable::new()
            .on("go", ["subj", "dest"], Self::go)
            .on("show", ["subj"], Self::show_here)
            .on("show", ["subj", "obj"], Self::show)
            .on("make", ["subj", "obj"], Self::make)
            .on("move", ["subj", "obj", "dest"], Self::relocate)
            .on("copy", ["copier", "original", "result"], Self::duplicate)
    }

    fn setup(&mut self, ctx: &mut WorldContext<'_>) -> Result<()> {
        let root = new_directory(ctx, ROOT_NAME)?;
        let home = new_directory(ctx, HOME_NAME)?;
        ctx.assert_event(CONTAINS, containment(root, home))?;
        for name in [UP, BACK] {
            let entity = ctx.new_entity();
            ctx.set_string_value(entity, name)?;
        }
        mark(ctx, CURRENT, home)
    }

    fn analyze_world(&mut self, ctx: &mut WorldContext<'_>) -> Result<()> {
        self.analyses += 1;
        if current_directory(ctx.world()).is_none() {
            let home = ctx
                .world()
                .entities_with(DIRECTORY, "subj")
                .find(|d| matches!(ctx.world().string_value(*d), Ok(Some(HOME_NAME))));
            if let Some(home) = home {
                mark(ctx, CURRENT, home)?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// World queries
// =============================================================================

fn subject(entity: EntityId) -> Arguments {
    Arguments::new().with("subj", [entity])
}

fn containment(container: EntityId, content: EntityId) -> Arguments {
    Arguments::new()
        .with("container", [container])
        .with("content", [content])
}

fn is_directory(world: &WorldModel, entity: EntityId) -> bool {
    world.holds(DIRECTORY, &subject(entity))
}

/// `up` or `back` when `entity` is one of the pseudo-directories.
fn pseudo_name(world: &WorldModel, entity: EntityId) -> Option<&'static str> {
    if is_directory(world, entity) {
        return None;
    }
    match world.string_value(entity) {
        Ok(Some(UP)) => Some(UP),
        Ok(Some(BACK)) => Some(BACK),
        _ => None,
    }
}

/// Current directory of the shell.
#[must_use]
pub fn current_directory(world: &WorldModel) -> Option<EntityId> {
    world.entities_with(CURRENT, "subj").next()
}

fn previous_directory(world: &WorldModel) -> Option<EntityId> {
    world.entities_with(PREVIOUS, "subj").next()
}

/// The directory holding `entity`.
#[must_use]
pub fn parent(world: &WorldModel, entity: EntityId) -> Option<EntityId> {
    let partial = Arguments::new().with("content", [entity]);
    world
        .find_facts(CONTAINS, &partial)
        .find_map(|f| f.arguments.get("container").and_then(|c| c.first().copied()))
}

/// Everything directly inside `directory`, in assertion order.
#[must_use]
pub fn contents(world: &WorldModel, directory: EntityId) -> Vec<EntityId> {
    let partial = Arguments::new().with("container", [directory]);
    world
        .find_facts(CONTAINS, &partial)
        .filter_map(|f| f.arguments.get("content"))
        .flat_map(|c| c.iter().copied())
        .collect()
}

/// Returns true if `directory` already contains something called `name`.
fn holds_name(world: &WorldModel, directory: EntityId, name: &str) -> bool {
    contents(world, directory)
        .into_iter()
        .any(|e| world.string_value(e).ok().flatten() == Some(name))
}

/// Returns true if `entity` is `ancestor` or sits somewhere below it.
fn is_within(world: &WorldModel, entity: EntityId, ancestor: EntityId) -> bool {
    let mut cursor = Some(entity);
    while let Some(at) = cursor {
        if at == ancestor {
            return true;
        }
        cursor = parent(world, at);
    }
    false
}

fn listing(ctx: &WorldContext<'_>, entity: EntityId) -> String {
    let name = ctx.display_name(entity);
    if !is_directory(ctx.world(), entity) {
        return name;
    }
    let names: Vec<String> = contents(ctx.world(), entity)
        .into_iter()
        .map(|e| ctx.display_name(e))
        .collect();
    if names.is_empty() {
        format!("{name} is empty")
    } else {
        format!("{name}: {}", names.join(", "))
    }
}

// =============================================================================
// World changes
// =============================================================================

fn new_directory(ctx: &mut WorldContext<'_>, name: &str) -> Result<EntityId> {
    let entity = ctx.new_entity();
    ctx.set_string_value(entity, name)?;
    ctx.assert_event(DIRECTORY, subject(entity))?;
    Ok(entity)
}

/// Replaces the single `predicate` fact with one naming `entity`.
fn mark(ctx: &mut WorldContext<'_>, predicate: &str, entity: EntityId) -> Result<()> {
    ctx.retract(predicate, &Arguments::new())?;
    ctx.assert_event(predicate, subject(entity))
}

fn copy_tree(ctx: &mut WorldContext<'_>, original: EntityId, into: EntityId) -> Result<()> {
    let copy = ctx.new_entity();
    if let Some(name) = ctx.string_value(original)?.map(str::to_string) {
        ctx.set_string_value(copy, name)?;
    }
    if is_directory(ctx.world(), original) {
        ctx.assert_event(DIRECTORY, subject(copy))?;
    }
    ctx.assert_event(CONTAINS, containment(into, copy))?;
    for child in contents(ctx.world(), original) {
        copy_tree(ctx, child, copy)?;
    }
    Ok(())
}

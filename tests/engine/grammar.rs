//! Grammar compilation across several plugins

use parley_engine::Grammar;
use parley_foundation::ErrorCategory;
use parley_plugin::{
    Category, DeclarationBundle, Declarations, DynPlugin, Inflection, PluginHost, SymbolKind,
};
use parley_runtime::ShellPlugin;

fn shell_declarations() -> Declarations {
    PluginHost::new(ShellPlugin::new()).declarations().clone()
}

fn notes() -> Declarations {
    let mut decl = Declarations::new();
    decl.include(&DeclarationBundle::english())
        .auto_add_count_noun("note")
        .auto_add_transitive_verb("show")
        .auto_add_transitive_verb("write");
    decl
}

#[test]
fn shell_grammar_covers_its_vocabulary() {
    let shell = shell_declarations();
    let grammar = Grammar::compile(&[("shell", &shell)]).unwrap();
    let signature = &grammar.signature;

    assert_eq!(signature.kind("contains"), Some(SymbolKind::Relation));
    assert_eq!(signature.kind("directory"), Some(SymbolKind::Property));
    assert_eq!(signature.kind("copy"), Some(SymbolKind::Predicate));
    assert_eq!(signature.kind("value"), Some(SymbolKind::Predicate));
    assert_eq!(signature.kind("same"), Some(SymbolKind::Relation));

    let folders = grammar.lexicon.get("folders", Category::CountNoun).unwrap();
    assert_eq!(folders.semantics, "directory");
    assert!(folders.is(Inflection::Plural));
    assert_eq!(grammar.lexicon.get("up", Category::Name).unwrap().semantics, "up");
}

#[test]
fn shared_words_merge_across_plugins() {
    let shell = shell_declarations();
    let notes = notes();
    let grammar = Grammar::compile(&[("shell", &shell), ("notes", &notes)]).unwrap();

    assert_eq!(grammar.signature.get("show").unwrap().plugins, ["shell", "notes"]);
    assert_eq!(grammar.signature.get("write").unwrap().plugins, ["notes"]);
    let to = grammar.lexicon.get("to", Category::Preposition).unwrap();
    assert_eq!(to.plugins, ["shell", "notes"]);
    assert_eq!(
        grammar.lexicon.verb_sense("write").unwrap().past.as_deref(),
        Some("wrote")
    );
}

#[test]
fn conflicting_symbol_kinds_are_a_setup_conflict() {
    let shell = shell_declarations();
    let mut clash = Declarations::new();
    clash.add_relation("directory");
    let err = Grammar::compile(&[("shell", &shell), ("clash", &clash)]).unwrap_err();

    assert_eq!(err.category(), ErrorCategory::SetupConflict);
    assert!(err.is_fatal());
    assert!(err.to_string().contains("directory"));
}

#[test]
fn conflicting_word_meanings_are_a_setup_conflict() {
    let shell = shell_declarations();
    let mut clash = Declarations::new();
    clash.add_count_noun("folder", "folders", "binder");
    let err = Grammar::compile(&[("shell", &shell), ("clash", &clash)]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::SetupConflict);
}

#[test]
fn compile_order_decides_plugin_lists_only() {
    let shell = shell_declarations();
    let notes = notes();
    let forward = Grammar::compile(&[("shell", &shell), ("notes", &notes)]).unwrap();
    let backward = Grammar::compile(&[("notes", &notes), ("shell", &shell)]).unwrap();

    let kinds = |g: &Grammar| -> Vec<(String, SymbolKind)> {
        g.signature
            .iter()
            .map(|(s, e)| (s.to_string(), e.kind))
            .collect()
    };
    assert_eq!(kinds(&forward), kinds(&backward));
    assert_eq!(forward.lexicon.len(), backward.lexicon.len());
    assert_ne!(forward.signature, backward.signature);
}

#[test]
fn representations_list_every_entry() {
    let shell = shell_declarations();
    let grammar = Grammar::compile(&[("shell", &shell)]).unwrap();

    let signature = grammar.signature.representation();
    assert_eq!(signature.lines().count(), grammar.signature.len());
    assert!(signature.contains("relation contains [shell]"));

    let lexicon = grammar.lexicon.representation();
    assert_eq!(lexicon.lines().count(), grammar.lexicon.len());
    assert!(lexicon.contains("folder count-noun"));
    assert!(lexicon.contains("-> copy(copier,original,to=result)"));
}

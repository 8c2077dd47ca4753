// Knowledge Service - placeholder extraction and combinatorial fact substitution

use crate::domain::fact::{Fact, FactStore};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

/// Placeholder grammar: `#{trait}`
pub const FACT_PATTERN: &str = r"#\{(.*?)\}";

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(FACT_PATTERN).expect("fact pattern is a valid regex"))
}

/// Traits referenced by a command template, in order of appearance
///
/// Duplicates are kept: a trait used twice is returned twice.
pub fn required_traits(command: &str) -> Vec<String> {
    placeholder()
        .captures_iter(command)
        .filter_map(|caps| caps.get(1))
        .map(|m| {
            debug!(command = %command, fact = %m.as_str(), "Command requires fact");
            m.as_str().to_string()
        })
        .collect()
}

/// Expand a template into every concrete command the facts allow
///
/// Depth-first cartesian product: the first required trait is the outermost
/// loop. A required trait without facts yields no commands at all; a
/// template without placeholders yields itself.
pub fn replace_facts(command: &str, facts: &FactStore) -> Vec<String> {
    let traits = required_traits(command);
    let mut chosen: Vec<&Fact> = Vec::with_capacity(traits.len());
    let mut results = Vec::new();
    expand(command, &traits, facts, &mut chosen, &mut results);
    results
}

fn expand<'a>(
    template: &str,
    traits: &[String],
    facts: &'a FactStore,
    chosen: &mut Vec<&'a Fact>,
    results: &mut Vec<String>,
) {
    let depth = chosen.len();
    if depth == traits.len() {
        results.push(substitute(template, chosen));
        return;
    }

    for fact in facts.get(&traits[depth]) {
        chosen.push(fact);
        expand(template, traits, facts, chosen, results);
        chosen.pop();
    }
}

/// Single-pass substitution; for a repeated trait the deepest choice wins
fn substitute(template: &str, chosen: &[&Fact]) -> String {
    let values: HashMap<&str, &str> = chosen
        .iter()
        .map(|fact| (fact.trait_name.as_str(), fact.value.as_str()))
        .collect();

    placeholder()
        .replace_all(template, |caps: &Captures| {
            let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            match values.get(name) {
                Some(value) => (*value).to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

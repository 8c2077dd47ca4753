// YAML data loaders (abilities, adversary, fact source)

use adversim_core::domain::{Ability, AbilityRecord, Adversary, Source};
use adversim_core::port::IdProvider;
use adversim_core::{AppError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, trace};
use walkdir::WalkDir;

/// An ability file holds a list of abilities or a single one
#[derive(Deserialize)]
#[serde(untagged)]
enum AbilityFile {
    Many(Vec<AbilityRecord>),
    One(Box<AbilityRecord>),
}

fn load_error(path: &Path, error: impl std::fmt::Display) -> AppError {
    AppError::Config(format!("{}: {}", path.display(), error))
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    trace!(path = %path.display(), "Loading YAML file");
    let content = std::fs::read_to_string(path).map_err(|e| load_error(path, e))?;
    serde_yaml::from_str(&content).map_err(|e| load_error(path, e))
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yml") | Some("yaml")
    )
}

/// Load every ability under `dir` (recursive, `*.yml` / `*.yaml`)
///
/// Files are visited in name order so ability order is stable. Any invalid
/// file fails the whole load.
pub fn load_abilities(dir: &Path, id_provider: &dyn IdProvider) -> Result<Vec<Ability>> {
    if !dir.is_dir() {
        return Err(load_error(dir, "abilities directory not found"));
    }

    let mut abilities = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| load_error(dir, e))?;
        if !entry.file_type().is_file() || !is_yaml(entry.path()) {
            continue;
        }

        let records = match read_yaml::<AbilityFile>(entry.path())? {
            AbilityFile::Many(records) => records,
            AbilityFile::One(record) => vec![*record],
        };
        for record in records {
            let ability = Ability::from_record(record, id_provider).map_err(|e| load_error(entry.path(), e))?;
            debug!(ability_id = %ability.id, name = %ability.name, "Loaded ability");
            abilities.push(ability);
        }
    }

    info!(dir = %dir.display(), count = abilities.len(), "Abilities loaded");
    Ok(abilities)
}

pub fn load_adversary(path: &Path) -> Result<Adversary> {
    let adversary: Adversary = read_yaml(path)?;
    info!(
        adversary_id = %adversary.id,
        name = %adversary.name,
        abilities = adversary.atomic_ordering.len(),
        "Adversary loaded"
    );
    Ok(adversary)
}

pub fn load_source(path: &Path) -> Result<Source> {
    let source: Source = read_yaml(path)?;
    info!(path = %path.display(), facts = source.facts.len(), "Fact source loaded");
    Ok(source)
}

//! Splits a monolithic cassette into per-port cassette files.
//!
//! Usage: `cassette_split <input.yaml> <output_dir>`
//!
//! Writes `<output_dir>/<port>.cassette.yaml` for every port that has
//! interactions, in the layout `CassetteConfig` expects for per-port replay.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::{env, fs, process};

use fleetdesk::cassette::format::{Cassette, Interaction};

fn split(cassette: &Cassette) -> BTreeMap<String, Cassette> {
    let mut by_port: BTreeMap<String, Vec<Interaction>> = BTreeMap::new();
    for interaction in &cassette.interactions {
        by_port.entry(interaction.port.clone()).or_default().push(interaction.clone());
    }

    by_port
        .into_iter()
        .map(|(port, interactions)| {
            let renumbered = interactions
                .into_iter()
                .zip(0..)
                .map(|(interaction, seq)| Interaction { seq, ..interaction })
                .collect();
            let per_port = Cassette {
                name: format!("{}-{port}", cassette.name),
                recorded_at: cassette.recorded_at,
                source: cassette.source.clone(),
                interactions: renumbered,
            };
            (port, per_port)
        })
        .collect()
}

fn split_file(input: &Path, output_dir: &Path) -> Result<Vec<PathBuf>, String> {
    let content = fs::read_to_string(input)
        .map_err(|e| format!("failed to read {}: {e}", input.display()))?;
    let cassette: Cassette = serde_yaml::from_str(&content)
        .map_err(|e| format!("failed to parse {}: {e}", input.display()))?;

    fs::create_dir_all(output_dir)
        .map_err(|e| format!("failed to create {}: {e}", output_dir.display()))?;

    let mut written = Vec::new();
    for (port, per_port) in split(&cassette) {
        let path = output_dir.join(format!("{port}.cassette.yaml"));
        let yaml = serde_yaml::to_string(&per_port)
            .map_err(|e| format!("failed to serialize {port} cassette: {e}"))?;
        fs::write(&path, yaml).map_err(|e| format!("failed to write {}: {e}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: cassette_split <input.yaml> <output_dir>");
        process::exit(1);
    }

    match split_file(Path::new(&args[1]), Path::new(&args[2])) {
        Ok(paths) => {
            for path in paths {
                println!("Wrote {}", path.display());
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

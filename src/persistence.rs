// File: src/persistence.rs
use crate::core::tables::CostTables;
use crate::error::Result;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Writes compiled tables to `path`: serialized into a temp file in the
/// same directory, then renamed over the target.
pub fn save_tables(tables: &CostTables, path: &Path) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    let mut writer = BufWriter::new(&temp_file);
    bincode::serialize_into(&mut writer, tables)?;
    writer.flush()?;
    drop(writer);

    temp_file.persist(path).map_err(|e| e.error)?;
    debug!(path = %path.display(), "saved table cache");
    Ok(())
}

pub fn load_tables(path: &Path) -> Result<CostTables> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let tables: CostTables = bincode::deserialize_from(reader)?;
    Ok(tables)
}

/// Loads tables for a run.
///
/// With a JSON source, a cache at least as new as the source is used as is;
/// otherwise the source is compiled and the cache rewritten. Without a
/// source the cache alone is tried, then the built-in uniform tables.
pub fn load_or_compile(source: Option<&Path>, cache: Option<&Path>) -> Result<CostTables> {
    if let Some(cache) = cache {
        if cache_is_fresh(source, cache) {
            match load_tables(cache) {
                Ok(tables) => {
                    debug!(path = %cache.display(), "using table cache");
                    return Ok(tables);
                }
                Err(e) => warn!(path = %cache.display(), error = %e, "ignoring unreadable table cache"),
            }
        }
    }

    let tables = match source {
        Some(source) => CostTables::from_json_file(source)?,
        None => CostTables::uniform(),
    };

    if let (Some(cache), Some(_)) = (cache, source) {
        if let Err(e) = save_tables(&tables, cache) {
            warn!(path = %cache.display(), error = %e, "could not write table cache");
        }
    }
    Ok(tables)
}

fn cache_is_fresh(source: Option<&Path>, cache: &Path) -> bool {
    let Ok(cache_modified) = fs::metadata(cache).and_then(|m| m.modified()) else {
        return false;
    };
    match source {
        None => true,
        Some(source) => fs::metadata(source)
            .and_then(|m| m.modified())
            .is_ok_and(|source_modified| cache_modified >= source_modified),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_survive_a_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tables.bin");
        let mut tables = CostTables::uniform();
        tables.vowel.insert('\u{1161}', '\u{1165}', 0.25);

        save_tables(&tables, &path).unwrap();
        assert_eq!(load_tables(&path).unwrap(), tables);
    }

    #[test]
    fn compiles_the_source_and_writes_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("tables.json");
        let cache = dir.path().join("tables.bin");
        fs::write(&source, r#"{ "vowel": { "\u1161": { "\u1165": 0.4 } } }"#).unwrap();

        let tables = load_or_compile(Some(&source), Some(&cache)).unwrap();
        assert_eq!(tables.vowel.get('\u{1161}', '\u{1165}'), Some(0.4));
        assert!(cache.exists());
        assert_eq!(load_or_compile(Some(&source), Some(&cache)).unwrap(), tables);
    }

    #[test]
    fn falls_back_to_uniform_tables() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("missing.bin");
        let tables = load_or_compile(None, Some(&cache)).unwrap();
        assert_eq!(tables, CostTables::uniform());
        assert!(!cache.exists());
    }

    #[test]
    fn garbage_cache_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("tables.bin");
        fs::write(&cache, b"not bincode").unwrap();
        assert_eq!(load_or_compile(None, Some(&cache)).unwrap(), CostTables::uniform());
        assert!(load_tables(&cache).is_err());
    }
}

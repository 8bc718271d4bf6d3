//! Roster files.
//!
//! A roster is the ordered actor list a model is built from. Files are JSON
//! (a bare array, or an object with an `actors` array) or TOML (`[[actors]]`
//! tables); the format is picked from the file extension.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ActorSpec;
use crate::error::{BdmError, Result};

/// Ordered actor list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    /// Actors, in index order
    pub actors: Vec<ActorSpec>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RosterFile {
    List(Vec<ActorSpec>),
    Table(Roster),
}

impl Roster {
    /// Create from actor records
    pub fn new(actors: Vec<ActorSpec>) -> Self {
        Self { actors }
    }

    /// Load a roster file, TOML if the extension says so, JSON otherwise
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            Self::from_toml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    /// Parse JSON, either `[...]` or `{"actors": [...]}`
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(match serde_json::from_str::<RosterFile>(content)? {
            RosterFile::List(actors) => Self::new(actors),
            RosterFile::Table(roster) => roster,
        })
    }

    /// Parse TOML with `[[actors]]` tables
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Check there are at least two actors, each valid, with unique names
    pub fn validate(&self) -> Result<()> {
        if self.actors.len() < 2 {
            return Err(BdmError::EmptyRoster(self.actors.len()));
        }

        let mut seen = HashSet::with_capacity(self.actors.len());
        for spec in &self.actors {
            spec.validate()?;
            if !seen.insert(spec.name.as_str()) {
                return Err(BdmError::DuplicateActor(spec.name.clone()));
            }
        }
        Ok(())
    }

    /// Smallest and largest position
    pub fn position_bounds(&self) -> Option<(f64, f64)> {
        let mut iter = self.actors.iter().map(|a| a.x);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), x| (lo.min(x), hi.max(x))))
    }

    /// Number of actors
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// True if there are no actors
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Iterate over actor records
    pub fn iter(&self) -> impl Iterator<Item = &ActorSpec> {
        self.actors.iter()
    }
}

impl From<Vec<ActorSpec>> for Roster {
    fn from(actors: Vec<ActorSpec>) -> Self {
        Self::new(actors)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn three() -> Roster {
        Roster::new(vec![
            ActorSpec::new("A", 0.2, 1.0, 1.0),
            ActorSpec::new("B", 0.5, 1.0, 1.0),
            ActorSpec::new("C", 0.8, 1.0, 1.0),
        ])
    }

    #[test]
    fn test_validate_ok() {
        assert!(three().validate().is_ok());
    }

    #[test]
    fn test_validate_duplicate_name() {
        let mut roster = three();
        roster.actors[2].name = "A".to_string();

        let err = roster.validate().unwrap_err();
        assert!(matches!(err, BdmError::DuplicateActor(name) if name == "A"));
    }

    #[test]
    fn test_validate_too_small() {
        let roster = Roster::new(vec![ActorSpec::new("A", 0.2, 1.0, 1.0)]);
        assert!(matches!(roster.validate(), Err(BdmError::EmptyRoster(1))));
    }

    #[test]
    fn test_position_bounds() {
        assert_eq!(three().position_bounds(), Some((0.2, 0.8)));
        assert_eq!(Roster::default().position_bounds(), None);
    }

    #[test]
    fn test_json_list_and_table() {
        let list = r#"[{"name":"A","x":0.2,"c":1.0,"s":1.0},{"name":"B","x":0.5,"c":2.0,"s":0.5}]"#;
        let table = r#"{"actors":[{"name":"A","x":0.2,"c":1.0,"s":1.0},{"name":"B","x":0.5,"c":2.0,"s":0.5}]}"#;

        let from_list = Roster::from_json(list).unwrap();
        let from_table = Roster::from_json(table).unwrap();
        assert_eq!(from_list, from_table);
        assert_eq!(from_list.actors[1].c, 2.0);
    }

    #[test]
    fn test_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
            [[actors]]
            name = "A"
            x = 0.2
            c = 1.0
            s = 1.0

            [[actors]]
            name = "B"
            x = 0.8
            c = 1.5
            s = 0.7
            "#
        )
        .unwrap();

        let roster = Roster::from_file(file.path()).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.actors[1].name, "B");
        assert_eq!(roster.actors[1].s, 0.7);
    }

    #[test]
    fn test_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"[{{"name":"A","x":0.0,"c":1.0,"s":1.0}}]"#).unwrap();

        let roster = Roster::from_file(file.path()).unwrap();
        assert_eq!(roster.len(), 1);
    }
}

//! Level files and the built-in campaign
//!
//! This is the loader side: it turns JSON level files (or the built-in
//! table) into [`LevelDefinition`]s. The simulation never reads files itself.
//!
//! File format (camelCase keys; PascalCase accepted). A file that leaves out
//! the player or base coordinates gets the bottom-center layout; an
//! explicit `null` is rejected.
//!
//! ```json
//! {
//!   "name": "Level 1",
//!   "playerX": 5, "playerY": 11,
//!   "baseX": 6, "baseY": 11,
//!   "enemies": [{ "x": 2, "y": 1 }],
//!   "walls": [{ "x": 2, "y": 4, "isBreakable": true }]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LevelError;
use crate::sim::{Cell, LevelDefinition, WallCell};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CellData {
    #[serde(alias = "X")]
    x: i32,
    #[serde(alias = "Y")]
    y: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WallData {
    #[serde(alias = "X")]
    x: i32,
    #[serde(alias = "Y")]
    y: i32,
    #[serde(default = "breakable_by_default", alias = "IsBreakable")]
    is_breakable: bool,
}

fn breakable_by_default() -> bool {
    true
}

fn default_player_x() -> Option<i32> {
    Some(5)
}

fn default_base_x() -> Option<i32> {
    Some(6)
}

fn default_bottom_row() -> Option<i32> {
    Some(11)
}

/// On-disk shape of a level
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LevelFile {
    #[serde(default, alias = "Name")]
    name: String,
    #[serde(default = "default_player_x", alias = "PlayerX")]
    player_x: Option<i32>,
    #[serde(default = "default_bottom_row", alias = "PlayerY")]
    player_y: Option<i32>,
    #[serde(default = "default_base_x", alias = "BaseX")]
    base_x: Option<i32>,
    #[serde(default = "default_bottom_row", alias = "BaseY")]
    base_y: Option<i32>,
    /// `null` and missing both mean "none"
    #[serde(default, alias = "Enemies")]
    enemies: Option<Vec<CellData>>,
    #[serde(default, alias = "Walls")]
    walls: Option<Vec<WallData>>,
}

fn cell(x: Option<i32>, y: Option<i32>) -> Option<Cell> {
    Some(Cell::new(x?, y?))
}

impl LevelFile {
    fn into_definition(self) -> LevelDefinition {
        LevelDefinition {
            name: self.name,
            player: cell(self.player_x, self.player_y),
            base: cell(self.base_x, self.base_y),
            enemies: self
                .enemies
                .unwrap_or_default()
                .into_iter()
                .map(|c| Cell::new(c.x, c.y))
                .collect(),
            walls: self
                .walls
                .unwrap_or_default()
                .into_iter()
                .map(|w| WallCell {
                    x: w.x,
                    y: w.y,
                    breakable: w.is_breakable,
                })
                .collect(),
        }
    }

    fn from_definition(level: &LevelDefinition) -> Self {
        Self {
            name: level.name.clone(),
            player_x: level.player.map(|c| c.x),
            player_y: level.player.map(|c| c.y),
            base_x: level.base.map(|c| c.x),
            base_y: level.base.map(|c| c.y),
            enemies: Some(
                level
                    .enemies
                    .iter()
                    .map(|c| CellData { x: c.x, y: c.y })
                    .collect(),
            ),
            walls: Some(
                level
                    .walls
                    .iter()
                    .map(|w| WallData {
                        x: w.x,
                        y: w.y,
                        is_breakable: w.breakable,
                    })
                    .collect(),
            ),
        }
    }
}

/// Parse and validate a level from JSON
pub fn parse_level(json: &str) -> Result<LevelDefinition, LevelError> {
    let file: LevelFile = serde_json::from_str(json)?;
    let level = file.into_definition();
    level.validate()?;
    Ok(level)
}

/// Serialize a level in the file format
pub fn to_json(level: &LevelDefinition) -> Result<String, LevelError> {
    Ok(serde_json::to_string_pretty(&LevelFile::from_definition(level))?)
}

/// Read, parse and validate a level file.
/// A file without a name is named after its file stem.
pub fn load_level_file(path: impl AsRef<Path>) -> Result<LevelDefinition, LevelError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let mut level = parse_level(&json)?;
    if level.name.is_empty() {
        level.name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    log::info!("Loaded level file {} (\"{}\")", path.display(), level.name);
    Ok(level)
}

/// Number of built-in levels
pub fn builtin_count() -> u32 {
    2
}

/// Built-in level `number` (1-based)
pub fn builtin(number: u32) -> Option<LevelDefinition> {
    let breakable = |x, y| WallCell {
        x,
        y,
        breakable: true,
    };

    match number {
        1 => Some(LevelDefinition {
            name: "Level 1".to_string(),
            player: Some(Cell::new(5, 11)),
            base: Some(Cell::new(6, 11)),
            enemies: vec![Cell::new(2, 1), Cell::new(5, 1), Cell::new(8, 1)],
            walls: [4, 8]
                .into_iter()
                .flat_map(|y| (2..=5).map(move |x| breakable(x, y)))
                .collect(),
        }),
        2 => Some(LevelDefinition {
            name: "Level 2".to_string(),
            player: Some(Cell::new(4, 11)),
            base: Some(Cell::new(7, 11)),
            enemies: vec![
                Cell::new(1, 1),
                Cell::new(4, 1),
                Cell::new(7, 1),
                Cell::new(10, 1),
            ],
            walls: [3, 9]
                .into_iter()
                .flat_map(|y| (1..=11).step_by(2).map(move |x| breakable(x, y)))
                .collect(),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_valid() {
        for n in 1..=builtin_count() {
            let level = builtin(n).unwrap();
            assert!(level.validate().is_ok(), "level {n} invalid");
        }
        assert!(builtin(0).is_none());
        assert!(builtin(builtin_count() + 1).is_none());
    }

    #[test]
    fn test_builtin_layouts() {
        let one = builtin(1).unwrap();
        assert_eq!(one.enemies.len(), 3);
        assert_eq!(one.walls.len(), 8);
        assert!(one.walls.contains(&WallCell {
            x: 5,
            y: 8,
            breakable: true
        }));

        let two = builtin(2).unwrap();
        assert_eq!(two.enemies.len(), 4);
        assert_eq!(two.walls.len(), 12);
        assert!(two.walls.iter().all(|w| w.x % 2 == 1));
    }

    #[test]
    fn test_parse_camel_case() {
        let level = parse_level(
            r#"{
                "name": "Custom",
                "playerX": 5, "playerY": 11,
                "baseX": 6, "baseY": 11,
                "enemies": [{ "x": 3, "y": 1 }],
                "walls": [{ "x": 2, "y": 4 }, { "x": 3, "y": 4, "isBreakable": false }]
            }"#,
        )
        .unwrap();
        assert_eq!(level.name, "Custom");
        assert_eq!(level.player, Some(Cell::new(5, 11)));
        assert_eq!(level.enemies, vec![Cell::new(3, 1)]);
        assert!(level.walls[0].breakable);
        assert!(!level.walls[1].breakable);
    }

    #[test]
    fn test_parse_pascal_case_and_null_lists() {
        let level = parse_level(
            r#"{
                "Name": "Old",
                "PlayerX": 1, "PlayerY": 11,
                "BaseX": 6, "BaseY": 11,
                "Enemies": null,
                "Walls": [{ "X": 4, "Y": 4, "IsBreakable": true }],
                "HasWalls": true
            }"#,
        )
        .unwrap();
        assert_eq!(level.name, "Old");
        assert!(level.enemies.is_empty());
        assert_eq!(level.walls.len(), 1);
    }

    #[test]
    fn test_missing_start_keys_use_bottom_center() {
        let level =
            parse_level(r#"{ "name": "NoStart", "enemies": [{ "x": 3, "y": 1 }], "walls": [] }"#)
                .unwrap();
        assert_eq!(level.player, Some(Cell::new(5, 11)));
        assert_eq!(level.base, Some(Cell::new(6, 11)));
        assert_eq!(level.enemies, vec![Cell::new(3, 1)]);
    }

    #[test]
    fn test_null_player_is_an_error() {
        let err = parse_level(r#"{ "name": "X", "playerX": null, "playerY": 11 }"#).unwrap_err();
        assert!(matches!(err, LevelError::MissingPlayer { .. }));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(parse_level("{ nope"), Err(LevelError::Parse(_))));
    }

    #[test]
    fn test_file_format_round_trip() {
        let level = builtin(2).unwrap();
        let json = to_json(&level).unwrap();
        assert!(json.contains("\"playerX\""));
        assert!(json.contains("\"isBreakable\""));
        assert_eq!(parse_level(&json).unwrap(), level);
    }
}

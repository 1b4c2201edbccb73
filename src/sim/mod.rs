//! Game logic
//!
//! Everything here talks to the engine through the `Engine` trait only:
//! - Level layouts are static data
//! - Interaction rules are pure functions over `LevelState`
//! - Stages are built fresh on every switch and own their entities

pub mod assets;
pub mod layout;
pub mod level;
pub mod preload;
pub mod rules;
pub mod sequencer;
pub mod stage;
pub mod state;
pub mod timer;

pub use assets::{AssetEntry, AssetKind, MANIFEST};
pub use layout::{LEVELS, LevelDef, LevelLayout, level_def};
pub use level::{LevelComplete, LevelController};
pub use preload::{AssetLoadError, AssetSource, DirAssetSource, LoadFailure, LoadReport, PreloadStage};
pub use rules::Directions;
pub use sequencer::{Sequencer, Stage, TickInput, WinStage};
pub use stage::StageKey;
pub use state::{Coin, Facing, LevelState};
pub use timer::{TimerId, Timers};

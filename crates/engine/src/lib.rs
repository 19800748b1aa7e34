use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod world;

pub use app::{
    run_app, text_width, wrap_text, AppError, AtlasError, Frame, Game, GameCommand, InputKey,
    InputSnapshot, KeyEventManager, KeySource, KeyStates, LoopConfig, PlayerCamera, Renderer,
    Rgba, Stage, StageChangeHook, Stager, TileAtlas, Viewport, GLYPH_ADVANCE, LINE_ADVANCE,
    TEXT_SCALE,
};
pub use world::{
    resolve_move, CollisionIndex, Direction, EventManager, Layer, LayerRole, MeetEvent,
    MoveOutcome, Player, ProximityEvent, Rect, RegionEvent, TileId, TileMap, TileMapError,
    TileProperties, WorldBounds, EMPTY_TILE,
};

pub const ROOT_ENV_VAR: &str = "EXPLORER_ROOT";
const ASSETS_DIR_NAME: &str = "assets";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub assets_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error(
        "EXPLORER_ROOT is set but does not point to a directory with an assets/ folder: {path}"
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not find an assets/ directory in {cwd} or above {exe_dir}.\n\
Set {env_var} explicitly, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/lonely-explorer\""
    )]
    RootNotFound {
        cwd: PathBuf,
        exe_dir: PathBuf,
        env_var: &'static str,
    },
}

impl AppPaths {
    pub fn from_root(root: PathBuf) -> Self {
        let assets_dir = root.join(ASSETS_DIR_NAME);
        Self { root, assets_dir }
    }

    pub fn asset(&self, file_name: &str) -> PathBuf {
        self.assets_dir.join(file_name)
    }
}

/// Finds the directory holding `assets/`: `EXPLORER_ROOT` first, then the
/// working directory, then every ancestor of the executable.
pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    resolve_root().map(AppPaths::from_root)
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let normalized = normalize_path(Path::new(&value));
            if is_root_marker(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        Err(env::VarError::NotPresent) => {
            let cwd = env::current_dir().unwrap_or_default();
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe.parent().map(Path::to_path_buf).unwrap_or_default();
            let candidates = std::iter::once(cwd.as_path()).chain(exe_dir.ancestors());
            find_root(candidates).ok_or_else(|| StartupError::RootNotFound {
                cwd: cwd.clone(),
                exe_dir: exe_dir.clone(),
                env_var: ROOT_ENV_VAR,
            })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn find_root<'a>(candidates: impl IntoIterator<Item = &'a Path>) -> Option<PathBuf> {
    candidates
        .into_iter()
        .find(|candidate| is_root_marker(candidate))
        .map(normalize_path)
}

fn is_root_marker(path: &Path) -> bool {
    !path.as_os_str().is_empty() && path.join(ASSETS_DIR_NAME).is_dir()
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

use engine::{
    resolve_app_paths, AppError, AtlasError, Game, LoopConfig, StartupError, TileAtlas, TileMap,
    TileMapError,
};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::{loop_config_from_env, GameConfig};
use super::explorer::{ExplorerGame, Story, StoryError};

/// Anything that stops the game before or while the window runs.
#[derive(Debug, Error)]
pub(crate) enum LaunchError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Map(#[from] TileMapError),
    #[error(transparent)]
    Atlas(#[from] AtlasError),
    #[error(transparent)]
    Story(#[from] StoryError),
    #[error(transparent)]
    App(#[from] AppError),
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) game: Box<dyn Game>,
}

pub(crate) fn build_app() -> Result<AppWiring, LaunchError> {
    init_tracing();
    info!("=== Lonely Explorer Startup ===");

    let paths = resolve_app_paths()?;
    info!(root = %paths.root.display(), "app_root_resolved");

    let game_config = GameConfig::from_env();
    let map = TileMap::load(&paths.asset(&game_config.map_file))?;
    let atlas = TileAtlas::load(
        &paths.asset(&game_config.atlas_file),
        map.tile_width(),
        map.tile_height(),
    )?;
    let story = Story::load(&paths.asset(&game_config.story_file))?;
    let game = ExplorerGame::new(&game_config, map, atlas, story);

    Ok(AppWiring {
        config: loop_config_from_env(),
        game: Box::new(game),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Stage {
    #[default]
    MainMenu,
    Menu,
    Settings,
    Scene,
    Dialog,
    Journal,
    Game,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::MainMenu => "main_menu",
            Stage::Menu => "menu",
            Stage::Settings => "settings",
            Stage::Scene => "scene",
            Stage::Dialog => "dialog",
            Stage::Journal => "journal",
            Stage::Game => "game",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let stage = match raw.trim().to_ascii_lowercase().as_str() {
            "main_menu" | "mainmenu" => Stage::MainMenu,
            "menu" => Stage::Menu,
            "settings" => Stage::Settings,
            "scene" => Stage::Scene,
            "dialog" => Stage::Dialog,
            "journal" => Stage::Journal,
            "game" => Stage::Game,
            _ => return None,
        };
        Some(stage)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type StageChangeHook = Box<dyn FnMut(Stage, Stage)>;

/// Current/previous stage pair.
///
/// The history is a single slot: `recovery_last_stage` swaps the two values, so
/// calling it twice lands back where it started.
pub struct Stager {
    stage: Stage,
    last_stage: Stage,
    on_change: Option<StageChangeHook>,
}

impl Stager {
    pub fn new(initial: Stage) -> Self {
        Self {
            stage: initial,
            last_stage: initial,
            on_change: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn last_stage(&self) -> Stage {
        self.last_stage
    }

    pub fn set_stage(&mut self, new_stage: Stage) {
        self.last_stage = self.stage;
        self.stage = new_stage;
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(self.last_stage, new_stage);
        }
    }

    /// Swaps current and previous. Does not notify the change hook.
    pub fn recovery_last_stage(&mut self) {
        std::mem::swap(&mut self.stage, &mut self.last_stage);
    }

    pub fn set_on_change(&mut self, on_change: impl FnMut(Stage, Stage) + 'static) {
        self.on_change = Some(Box::new(on_change));
    }
}

impl Default for Stager {
    fn default() -> Self {
        Self::new(Stage::default())
    }
}

impl fmt::Debug for Stager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stager")
            .field("stage", &self.stage)
            .field("last_stage", &self.last_stage)
            .field("has_on_change", &self.on_change.is_some())
            .finish()
    }
}

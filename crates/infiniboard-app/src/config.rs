//! Command-line configuration.

use crate::error::{AppError, AppResult};
use clap::{Args, Parser, Subcommand};
use infiniboard_core::constants::DEFAULT_GRID_SIZE;
use infiniboard_core::storage::{AutoSaveManager, FileStorage, create_autosave_manager};
use infiniboard_core::elements::AdvanceEstimate;
use infiniboard_core::{Canvas, GridSettingsPatch, WebhookClient};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "infiniboard", version, about = "Headless Infiniboard whiteboard shell")]
pub struct Cli {
    #[command(flatten)]
    pub config: AppConfig,

    #[command(subcommand)]
    pub command: Command,
}

/// Settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct AppConfig {
    /// Endpoint receiving `{action, data}` save/load/list calls.
    #[arg(long, env = "INFINIBOARD_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Directory for local sessions. Defaults to the user data directory.
    #[arg(long, env = "INFINIBOARD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 1280.0)]
    pub width: f64,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 800.0)]
    pub height: f64,

    /// Hide the background grid.
    #[arg(long, default_value_t = false)]
    pub no_grid: bool,

    #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
    pub grid_size: f64,

    /// Snap drawing and dragging to the grid.
    #[arg(long, default_value_t = false)]
    pub snap: bool,

    /// Size text by an average glyph advance, as a fraction of the font
    /// size, instead of a fixed 100-unit width.
    #[arg(long)]
    pub text_em_ratio: Option<f64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            data_dir: None,
            width: 1280.0,
            height: 800.0,
            no_grid: false,
            grid_size: DEFAULT_GRID_SIZE,
            snap: false,
            text_em_ratio: None,
        }
    }
}

impl AppConfig {
    /// Fresh session sized and gridded per this configuration.
    pub fn new_canvas(&self) -> Canvas {
        let mut canvas = Canvas::new();
        canvas.set_viewport_size(self.width, self.height);
        canvas.set_grid_settings(GridSettingsPatch {
            enabled: Some(!self.no_grid),
            size: Some(self.grid_size),
            snap: Some(self.snap),
        });
        if let Some(em_ratio) = self.text_em_ratio {
            canvas.set_text_measure(Box::new(AdvanceEstimate { em_ratio }));
        }
        canvas
    }

    pub fn webhook(&self) -> AppResult<WebhookClient> {
        let url = self
            .webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(AppError::MissingWebhookUrl)?;
        Ok(WebhookClient::new(url)?)
    }

    pub fn autosave_manager(&self) -> AppResult<AutoSaveManager<FileStorage>> {
        Ok(create_autosave_manager(self.data_dir.as_deref())?)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Feed a recorded JSON event script through the interaction engine.
    Replay {
        /// Event script: a JSON array of input events.
        script: PathBuf,

        /// Where to write the resulting session snapshot.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Start from this snapshot instead of an empty canvas.
        #[arg(long, conflicts_with = "resume")]
        from: Option<PathBuf>,

        /// Start from the last locally saved session.
        #[arg(long, default_value_t = false)]
        resume: bool,

        /// Image inserted whenever the script opens the image picker.
        #[arg(long)]
        image: Option<PathBuf>,

        /// Also store the result as a local session under this id.
        #[arg(long)]
        session: Option<String>,
    },
    /// Render a session snapshot to SVG.
    Export {
        snapshot: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        /// Frame the content instead of the saved viewport, longest side in pixels.
        #[arg(long)]
        fit: Option<f64>,

        /// Device pixel ratio of the viewport export.
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
    },
    /// List drawings stored behind the webhook.
    List,
    /// Fetch a drawing and write it as a session snapshot.
    Pull {
        id: String,

        #[arg(short, long)]
        output: PathBuf,
    },
    /// Save a session snapshot to the webhook under `name`.
    Push {
        snapshot: PathBuf,

        #[arg(long)]
        name: String,
    },
    /// Print the keyboard shortcuts understood by event scripts.
    Keys,
}

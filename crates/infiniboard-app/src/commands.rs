//! Subcommand implementations.

use crate::config::{AppConfig, Cli, Command};
use crate::error::{AppError, AppResult};
use crate::shortcuts::ShortcutRegistry;
use infiniboard_core::media::data_uri_from_file;
use infiniboard_core::remote::load_into;
use infiniboard_core::{
    Canvas, DocumentSummary, InputEvent, InteractionEngine, RemoteStore, SessionSnapshot, TextEntryEvent,
};
use infiniboard_render::{RenderContext, Renderer, RendererError, SvgRenderer, THUMBNAIL_SIZE};
use kurbo::Size;
use serde_json::Value;
use std::path::Path;

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> AppResult<()> {
    let config = cli.config;
    match cli.command {
        Command::Replay {
            script,
            output,
            from,
            resume,
            image,
            session,
        } => {
            let events = read_script(&script)?;
            let mut canvas = config.new_canvas();
            if let Some(from) = from {
                canvas.restore_session(read_snapshot(&from)?);
            } else if resume {
                match config.autosave_manager()?.restore_last().await {
                    Some(snapshot) => canvas.restore_session(snapshot),
                    None => log::warn!("no previous session to resume, starting empty"),
                }
            }
            let image = image.as_deref().map(data_uri_from_file).transpose()?;

            let handled = replay(&mut canvas, &events, image.as_deref())?;
            log::info!("replayed {handled} events, {} elements", canvas.len());

            let snapshot = canvas.session_snapshot();
            if let Some(id) = session {
                let mut autosave = config.autosave_manager()?;
                autosave.set_session_id(Some(id));
                autosave.save(&snapshot).await?;
            }
            match output {
                Some(path) => write_snapshot(&path, &snapshot),
                None => {
                    println!("{}", to_pretty_json(&snapshot)?);
                    Ok(())
                }
            }
        }
        Command::Export {
            snapshot,
            output,
            fit,
            scale,
        } => {
            let snapshot = read_snapshot(&snapshot)?;
            let svg = export_svg(&config, snapshot, fit, scale)?;
            std::fs::write(&output, svg).map_err(|e| AppError::io(&output, e))?;
            log::info!("exported {}", output.display());
            Ok(())
        }
        Command::List => {
            let remote = config.webhook()?;
            for summary in list_remote(&remote).await? {
                println!(
                    "{}\t{}\t{} elements\t{}",
                    summary.id, summary.name, summary.element_count, summary.updated_at
                );
            }
            Ok(())
        }
        Command::Pull { id, output } => {
            let remote = config.webhook()?;
            let canvas = pull(&config, &remote, &id).await?;
            write_snapshot(&output, &canvas.session_snapshot())
        }
        Command::Push { snapshot, name } => {
            let remote = config.webhook()?;
            let mut canvas = config.new_canvas();
            canvas.restore_session(read_snapshot(&snapshot)?);
            let result = push(&canvas, &remote, &name).await?;
            if !result.is_null() {
                println!("{}", to_pretty_json(&result)?);
            }
            Ok(())
        }
        Command::Keys => {
            ShortcutRegistry::print_all();
            Ok(())
        }
    }
}

/// Feed `events` through a fresh interaction engine. Image picker
/// requests insert `image` at the viewport centre. An interaction still in
/// progress at the end of the script is finished: pending text is
/// committed and any other gesture is cancelled.
///
/// Returns the number of events handled.
pub fn replay(canvas: &mut Canvas, events: &[InputEvent], image: Option<&str>) -> AppResult<usize> {
    let mut engine = InteractionEngine::new();
    for event in events {
        engine.handle(canvas, event);
        if engine.take_image_picker_request() {
            match image {
                Some(uri) => {
                    canvas.upload_image(uri)?;
                }
                None => log::warn!("script opened the image picker but no image was given"),
            }
        }
    }

    if engine.is_text_input_focused() {
        engine.text_event(canvas, &TextEntryEvent::Submit);
    } else if !engine.is_idle() {
        log::debug!("cancelling unfinished interaction {:?}", engine.state());
        engine.cancel(canvas);
    }
    Ok(events.len())
}

/// Render a snapshot: the saved viewport at the configured size times
/// `scale`, or the content framed to `fit` pixels.
pub fn export_svg(config: &AppConfig, snapshot: SessionSnapshot, fit: Option<f64>, scale: f64) -> AppResult<String> {
    let mut canvas = config.new_canvas();
    canvas.restore_session(snapshot);
    canvas.clear_selection();

    let svg = match fit {
        Some(max_size) => SvgRenderer::render_fitted(&canvas, max_size)?,
        None => {
            let mut renderer = SvgRenderer::new();
            let ctx = RenderContext::new(&canvas, Size::new(config.width, config.height))
                .with_scale_factor(scale)
                .without_selection();
            renderer.build_scene(&ctx);
            renderer.take_document()
        }
    };
    Ok(svg)
}

pub async fn list_remote(remote: &dyn RemoteStore) -> AppResult<Vec<DocumentSummary>> {
    Ok(remote.list().await?)
}

/// Fetch drawing `id` into a fresh session.
pub async fn pull(config: &AppConfig, remote: &dyn RemoteStore, id: &str) -> AppResult<Canvas> {
    let mut canvas = config.new_canvas();
    load_into(&mut canvas, remote, id).await?;
    log::info!("pulled drawing {id} ({} elements)", canvas.len());
    Ok(canvas)
}

/// Save the scene under `name` with an SVG thumbnail. Empty scenes are
/// saved without one.
pub async fn push(canvas: &Canvas, remote: &dyn RemoteStore, name: &str) -> AppResult<Value> {
    let thumbnail = match SvgRenderer::thumbnail(canvas, THUMBNAIL_SIZE) {
        Ok(uri) => Some(uri),
        Err(RendererError::EmptyScene) => None,
        Err(e) => return Err(e.into()),
    };
    let request = canvas.save_request(name, thumbnail)?;
    Ok(remote.save(&request).await?)
}

pub fn read_script(path: &Path) -> AppResult<Vec<InputEvent>> {
    let json = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    serde_json::from_str(&json).map_err(|e| AppError::json(path, e))
}

pub fn read_snapshot(path: &Path) -> AppResult<SessionSnapshot> {
    let json = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    SessionSnapshot::from_json(&json).map_err(|e| AppError::json(path, e))
}

pub fn write_snapshot(path: &Path, snapshot: &SessionSnapshot) -> AppResult<()> {
    let json = snapshot.to_json().map_err(|e| AppError::json(path, e))?;
    std::fs::write(path, json).map_err(|e| AppError::io(path, e))?;
    log::info!("wrote session snapshot to {}", path.display());
    Ok(())
}

fn to_pretty_json(value: &impl serde::Serialize) -> AppResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::json("<stdout>", e))
}

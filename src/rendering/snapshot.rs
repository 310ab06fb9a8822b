//! Headless rendering: run a session for a fixed number of frames and write the
//! resulting buffer as a PNG. No window, GPU or event loop is involved.

use std::path::Path;

use anyhow::Context;
use bevy::prelude::*;

use crate::core::config::MetaballsConfig;
use crate::core::session::Session;

/// Encode the session's current buffer as an RGBA PNG at `out`.
pub fn save_png(session: &Session, out: &Path) -> anyhow::Result<()> {
    if session.width() == 0 || session.height() == 0 {
        anyhow::bail!(
            "cannot write an empty {}x{} snapshot",
            session.width(),
            session.height()
        );
    }
    let img = image::RgbaImage::from_raw(
        session.width(),
        session.height(),
        session.pixels().to_vec(),
    )
    .context("pixel buffer does not match surface size")?;
    img.save_with_format(out, image::ImageFormat::Png)
        .with_context(|| format!("write snapshot {}", out.display()))?;
    Ok(())
}

/// Advance a fresh session `frames` times, rasterize the final state and save it.
pub fn render_snapshot(
    cfg: &MetaballsConfig,
    size: UVec2,
    frames: u32,
    out: &Path,
) -> anyhow::Result<Session> {
    let mut session = Session::new(cfg, size)?;
    for _ in 0..frames {
        session.tick();
    }
    session.rasterize();
    save_png(&session, out)?;
    Ok(session)
}

//! Host surface glue: finds the window named by `element_id`, creates the session and
//! shows its pixel buffer through a window-sized sprite. Resize events reallocate the
//! buffer; a disposed session tears its entities down once.

use bevy::asset::RenderAssetUsages;
use bevy::image::ImageSampler;
use bevy::prelude::*;
use bevy::render::camera::RenderTarget;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::window::{WindowRef, WindowResized};

use crate::core::config::MetaballsConfig;
use crate::core::session::{MetaballsHandle, Session};

/// Entities and assets presenting one session.
#[derive(Resource, Debug, Clone)]
pub struct SurfaceTarget {
    pub window: Entity,
    pub image: Handle<Image>,
    pub sprite: Entity,
    pub camera: Entity,
}

#[derive(Component)]
pub struct MetaballsSurface;

#[derive(Component)]
pub struct MetaballsCamera;

/// Logical window size in whole pixels (the space pointer coordinates arrive in).
pub fn logical_size(window: &Window) -> UVec2 {
    UVec2::new(window.width().max(0.0) as u32, window.height().max(0.0) as u32)
}

/// The window whose `name` equals `element_id`, with its logical size.
pub fn find_surface<'a>(
    windows: impl IntoIterator<Item = (Entity, &'a Window)>,
    element_id: &str,
) -> Option<(Entity, UVec2)> {
    windows
        .into_iter()
        .find(|(_, w)| w.name.as_deref() == Some(element_id))
        .map(|(e, w)| (e, logical_size(w)))
}

/// RGBA8 texture holding `pixels`; zero-sized surfaces get a 1x1 transparent image.
pub fn surface_image(size: UVec2, pixels: &[u8]) -> Image {
    let size = if size.x == 0 || size.y == 0 {
        UVec2::ONE
    } else {
        size
    };
    let mut data = vec![0u8; size.x as usize * size.y as usize * 4];
    if pixels.len() == data.len() {
        data.copy_from_slice(pixels);
    }
    let mut image = Image::new(
        Extent3d {
            width: size.x,
            height: size.y,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    );
    image.sampler = ImageSampler::nearest();
    image
}

pub fn session_running(session: Option<Res<Session>>) -> bool {
    session.is_some_and(|s| !s.is_disposed())
}

/// Startup: attach to the configured window. Without a matching window (or with a
/// rejected config) only an inert handle is inserted.
pub fn attach_surface(
    mut commands: Commands,
    cfg: Res<MetaballsConfig>,
    windows: Query<(Entity, &Window)>,
    mut images: ResMut<Assets<Image>>,
) {
    let Some((window, size)) = find_surface(windows.iter(), &cfg.element_id) else {
        warn!(
            "no window named {:?}; metaballs effect stays inert",
            cfg.element_id
        );
        commands.insert_resource(MetaballsHandle::default());
        return;
    };
    let session = match Session::new(&cfg, size) {
        Ok(session) => session,
        Err(e) => {
            error!("metaballs disabled: {e}");
            commands.insert_resource(MetaballsHandle::default());
            return;
        }
    };
    let image = images.add(surface_image(size, session.pixels()));
    let camera = commands
        .spawn((
            Camera2d,
            Camera {
                target: RenderTarget::Window(WindowRef::Entity(window)),
                ..default()
            },
            MetaballsCamera,
        ))
        .id();
    let sprite = commands
        .spawn((
            Sprite {
                image: image.clone(),
                custom_size: Some(size.as_vec2()),
                ..default()
            },
            Transform::default(),
            MetaballsSurface,
        ))
        .id();
    info!(
        width = size.x,
        height = size.y,
        balls = session.balls().len(),
        "metaballs attached to window {:?}",
        cfg.element_id
    );
    commands.insert_resource(session.handle());
    commands.insert_resource(SurfaceTarget {
        window,
        image,
        sprite,
        camera,
    });
    commands.insert_resource(session);
}

pub fn resize_surface(
    mut resize_events: EventReader<WindowResized>,
    target: Res<SurfaceTarget>,
    mut session: ResMut<Session>,
) {
    let Some(last) = resize_events
        .read()
        .filter(|e| e.window == target.window)
        .last()
    else {
        return;
    };
    let size = UVec2::new(last.width.max(0.0) as u32, last.height.max(0.0) as u32);
    if size != session.size() {
        debug!(width = size.x, height = size.y, "metaballs surface resized");
        session.resize(size);
    }
}

pub fn rasterize_session(mut session: ResMut<Session>) {
    session.rasterize();
}

/// Copy the freshly rasterized buffer into the window image. A zero-sized surface hides
/// the sprite until the window has an area again.
pub fn present_session(
    session: Res<Session>,
    target: Res<SurfaceTarget>,
    mut images: ResMut<Assets<Image>>,
    mut sprites: Query<(&mut Sprite, &mut Visibility), With<MetaballsSurface>>,
) {
    let size = session.size();
    let empty = size.x == 0 || size.y == 0;
    let Ok((mut sprite, mut visibility)) = sprites.get_mut(target.sprite) else {
        return;
    };
    visibility.set_if_neq(if empty {
        Visibility::Hidden
    } else {
        Visibility::Inherited
    });
    if empty {
        return;
    }
    let Some(image) = images.get_mut(&target.image) else {
        return;
    };
    let fits = image.width() == size.x && image.height() == size.y;
    if let Some(data) = image.data.as_mut() {
        if fits && data.len() == session.pixels().len() {
            data.copy_from_slice(session.pixels());
            return;
        }
    }
    *image = surface_image(size, session.pixels());
    sprite.custom_size = Some(size.as_vec2());
}

/// Remove everything a disposed session owns. Runs once; later calls find nothing.
pub fn teardown_disposed(
    mut commands: Commands,
    handle: Res<MetaballsHandle>,
    target: Option<Res<SurfaceTarget>>,
    mut images: ResMut<Assets<Image>>,
) {
    if !handle.is_disposed() {
        return;
    }
    if let Some(target) = target {
        commands.entity(target.sprite).despawn();
        commands.entity(target.camera).despawn();
        images.remove(&target.image);
        commands.remove_resource::<SurfaceTarget>();
    }
    commands.remove_resource::<Session>();
    commands.remove_resource::<MetaballsHandle>();
    info!("metaballs disposed");
}

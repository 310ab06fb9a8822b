//! Central system ordering labels to make the frame sequence explicit.
//! Stages (high-level):
//! 1. Interaction (pointer press / drag / release, resize)
//! 2. Rasterize (field evaluation into the session buffer)
//! 3. Present (buffer copied into the window image)
//! 4. Integrate (ball motion + boundary collisions)
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum MetaballsSet {
    Interaction,
    Rasterize,
    Present,
    Integrate,
}

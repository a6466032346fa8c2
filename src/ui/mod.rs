//! Headless presentation layer: a per-tick snapshot of what an overlay would
//! draw, plus a short toast queue.

mod hud;
mod toast;

pub use hud::{needle_angle, rotations_text, stress_level, wheel_scale, FishingHud, StressLevel};
pub use toast::{Toast, Toasts};

use bevy::prelude::*;

use crate::fishing::FishingSet;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FishingHud>()
            .init_resource::<Toasts>()
            .add_systems(
                Update,
                (
                    hud::update_fishing_hud,
                    toast::collect_toasts,
                    toast::expire_toasts,
                )
                    .chain()
                    .in_set(FishingSet::Display),
            );
    }
}

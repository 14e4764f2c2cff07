//! Color resolution.
//!
//! Every renderer asks the [`StyleResolver`] for its colors, so the
//! priority between decorations is decided in exactly one place:
//!
//! | step      | stroke            | fill               | text                 |
//! |-----------|-------------------|--------------------|----------------------|
//! | selected  | global selection  | -                  | -                    |
//! | disease   | global disease    | -                  | global disease       |
//! | fade-out  | `fade_out_stroke` | `fade_out_fill`    | `fade_out_text`      |
//! | hit       | `lighter_stroke`  | `lighter_fill`     | analysis `hit_text`  |
//! | not hit   | `lighter_stroke`  | `lighter_fill`     | `lighter_text`       |
//! | normal    | `stroke`          | `fill`             | `text`               |
//!
//! The first step that applies and defines a channel wins. Selection also
//! disables the disease step, so a selected disease element is painted
//! exactly like a selected healthy one.

use pathview_core::{color::Color, semantic::RenderableClass};

use crate::{
    index::{ElementState, RenderState},
    profile::{ClassPalette, ColorProfile},
};

/// The three colors of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedStyle {
    pub fill: Color,
    pub stroke: Color,
    pub text: Color,
}

/// Maps element decoration state and class to colors of one profile.
#[derive(Debug, Clone, Copy)]
pub struct StyleResolver<'p> {
    profile: &'p ColorProfile,
}

impl<'p> StyleResolver<'p> {
    pub fn new(profile: &'p ColorProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &'p ColorProfile {
        self.profile
    }

    /// Render state with the disease step removed when selection applies.
    fn effective(state: ElementState) -> RenderState {
        if !state.selected {
            return state.render;
        }
        match state.render {
            RenderState::Disease => RenderState::Normal,
            RenderState::HitDisease => RenderState::Hit,
            RenderState::NotHitDisease => RenderState::NotHit,
            other => other,
        }
    }

    pub fn stroke_color(&self, class: RenderableClass, state: ElementState) -> Color {
        if state.selected {
            return self.profile.selection();
        }
        let palette = self.profile.palette(class);
        match Self::effective(state) {
            s if s.is_disease() => self.profile.disease(),
            RenderState::FadeOut => palette.fade_out_stroke,
            s if s.is_hit() || s.is_not_hit() => palette.lighter_stroke,
            _ => palette.stroke,
        }
    }

    pub fn fill_color(&self, class: RenderableClass, state: ElementState) -> Color {
        let palette = self.profile.palette(class);
        Self::state_fill(palette, Self::effective(state))
    }

    fn state_fill(palette: &ClassPalette, state: RenderState) -> Color {
        match state {
            RenderState::FadeOut => palette.fade_out_fill,
            s if s.is_hit() || s.is_not_hit() => palette.lighter_fill,
            _ => palette.fill,
        }
    }

    pub fn text_color(&self, class: RenderableClass, state: ElementState) -> Color {
        let palette = self.profile.palette(class);
        match Self::effective(state) {
            s if s.is_disease() => self.profile.disease(),
            RenderState::FadeOut => palette.fade_out_text,
            s if s.is_hit() => self.profile.analysis().hit_text,
            s if s.is_not_hit() => palette.lighter_text,
            _ => palette.text,
        }
    }

    pub fn resolve(&self, class: RenderableClass, state: ElementState) -> ResolvedStyle {
        ResolvedStyle {
            fill: self.fill_color(class, state),
            stroke: self.stroke_color(class, state),
            text: self.text_color(class, state),
        }
    }

    pub fn halo_color(&self) -> Color {
        self.profile.halo()
    }

    pub fn flag_color(&self) -> Color {
        self.profile.flag()
    }
}

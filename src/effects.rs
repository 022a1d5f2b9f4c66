//! Entrance animations and the navbar scroll state.
//!
//! The CSS starts `.animated-rotate` / `.animated-translateY` elements hidden;
//! they are revealed one after another by writing their final inline styles.

/// Gap between consecutive reveals.
pub const REVEAL_STAGGER_MS: u32 = 150;

/// Scroll offset past which the navbar turns opaque.
pub const SCROLLED_THRESHOLD_PX: f64 = 10.0;

pub const REVEAL_SELECTOR: &str = ".animated-rotate, .animated-translateY";
pub const NAVBAR_ID: &str = "mainNavbar";
pub const SCROLLED_CLASS: &str = "scrolled";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    Rotate,
    TranslateY,
}

impl Reveal {
    /// Which reveal an element gets, from its `class` attribute.
    pub fn from_class_list(classes: &str) -> Option<Self> {
        let has = |name: &str| classes.split_whitespace().any(|c| c == name);
        if has("animated-rotate") {
            Some(Reveal::Rotate)
        } else if has("animated-translateY") {
            Some(Reveal::TranslateY)
        } else {
            None
        }
    }

    /// Inline style properties that bring the element to its final state.
    pub fn final_styles(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Reveal::Rotate => &[
                ("transition", "all 0.6s cubic-bezier(0.25, 0.46, 0.45, 0.94)"),
                ("opacity", "1"),
                ("scale", "1"),
                ("rotate", "y 0deg"),
            ],
            Reveal::TranslateY => &[
                ("transition", "all 0.6s ease"),
                ("opacity", "1"),
                ("translate", "0 0"),
            ],
        }
    }
}

pub fn reveal_delay(index: usize) -> u32 {
    u32::try_from(index)
        .unwrap_or(u32::MAX)
        .saturating_mul(REVEAL_STAGGER_MS)
}

pub fn is_scrolled(scroll_y: f64) -> bool {
    scroll_y > SCROLLED_THRESHOLD_PX
}

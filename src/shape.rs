//! Spinner shapes: static frame tables.
//!
//! A shape is pure configuration. The spinner walks its frames in order
//! at a fixed interval and wraps back to the first frame after the last.

use std::time::Duration;

/// An animation: ordered frames plus the time each frame stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub frames: &'static [&'static str],
    pub interval: Duration,
}

impl Shape {
    /// Frame for a step counter, wrapping cyclically.
    pub fn frame(&self, step: usize) -> &'static str {
        if self.frames.is_empty() {
            return "";
        }
        self.frames[step % self.frames.len()]
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Look up one of the built-in shapes by its lowercase name.
    pub fn by_name(name: &str) -> Option<Shape> {
        SHAPES
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, shape)| *shape)
    }
}

impl Default for Shape {
    fn default() -> Self {
        LINE
    }
}

const fn per_second(frames: u64) -> Duration {
    Duration::from_nanos(1_000_000_000 / frames)
}

// ============================================================================
// BUILT-IN SHAPES
// ============================================================================

pub const LINE: Shape = Shape {
    frames: &["|", "/", "-", "\\"],
    interval: per_second(10),
};

pub const DOT: Shape = Shape {
    frames: &["⣾ ", "⣽ ", "⣻ ", "⢿ ", "⡿ ", "⣟ ", "⣯ ", "⣷ "],
    interval: per_second(10),
};

pub const MINI_DOT: Shape = Shape {
    frames: &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"],
    interval: per_second(12),
};

pub const JUMP: Shape = Shape {
    frames: &["⢄", "⢂", "⢁", "⡁", "⡈", "⡐", "⡠"],
    interval: per_second(10),
};

pub const PULSE: Shape = Shape {
    frames: &["█", "▓", "▒", "░"],
    interval: per_second(8),
};

pub const POINTS: Shape = Shape {
    frames: &["∙∙∙", "●∙∙", "∙●∙", "∙∙●"],
    interval: per_second(7),
};

pub const GLOBE: Shape = Shape {
    frames: &["🌍", "🌎", "🌏"],
    interval: per_second(4),
};

pub const MOON: Shape = Shape {
    frames: &["🌑", "🌒", "🌓", "🌔", "🌕", "🌖", "🌗", "🌘"],
    interval: per_second(8),
};

pub const MONKEY: Shape = Shape {
    frames: &["🙈", "🙉", "🙊"],
    interval: per_second(3),
};

pub const METER: Shape = Shape {
    frames: &["▱▱▱", "▰▱▱", "▰▰▱", "▰▰▰", "▰▰▱", "▰▱▱", "▱▱▱"],
    interval: per_second(7),
};

pub const HAMBURGER: Shape = Shape {
    frames: &["☱", "☲", "☴", "☲"],
    interval: per_second(3),
};

pub const RUNNING: Shape = Shape {
    frames: &["🚶", "🏃"],
    interval: per_second(6),
};

/// Every built-in shape with its lookup name.
pub const SHAPES: &[(&str, Shape)] = &[
    ("line", LINE),
    ("dot", DOT),
    ("minidot", MINI_DOT),
    ("jump", JUMP),
    ("pulse", PULSE),
    ("points", POINTS),
    ("globe", GLOBE),
    ("moon", MOON),
    ("monkey", MONKEY),
    ("meter", METER),
    ("hamburger", HAMBURGER),
    ("running", RUNNING),
];

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_wrap_after_last() {
        assert_eq!(LINE.frame(0), "|");
        assert_eq!(LINE.frame(3), "\\");
        assert_eq!(LINE.frame(4), "|");
        assert_eq!(LINE.frame(9), "/");
    }

    #[test]
    fn intervals_follow_frame_rates() {
        assert_eq!(DOT.interval, Duration::from_millis(100));
        assert_eq!(PULSE.interval, Duration::from_millis(125));
        assert_eq!(GLOBE.interval, Duration::from_millis(250));
    }

    #[test]
    fn every_builtin_shape_has_frames() {
        for (name, shape) in SHAPES {
            assert!(!shape.is_empty(), "{name} has no frames");
            assert!(shape.interval > Duration::ZERO, "{name} has no interval");
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(Shape::by_name("Dot"), Some(DOT));
        assert_eq!(Shape::by_name("MINIDOT"), Some(MINI_DOT));
        assert_eq!(Shape::by_name("nope"), None);
    }

    #[test]
    fn empty_shape_renders_nothing() {
        let shape = Shape {
            frames: &[],
            interval: per_second(1),
        };
        assert_eq!(shape.frame(5), "");
    }
}

use crate::roadmap::phases::Segment;

pub const PRIMARY_FILL_ALPHA: f64 = 0.75;
pub const ROLLOFF_FILL_ALPHA: f64 = 0.25;
pub const ROLLOFF_BORDER_ALPHA: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseColor {
    Mobilize,
    Iaas,
    Migration,
    DataStorage,
    Draas,
    Optimization,
    Default,
}

const PREFIXES: [(&str, PhaseColor); 6] = [
    ("mobilize", PhaseColor::Mobilize),
    ("infrastructure as a service", PhaseColor::Iaas),
    ("migration", PhaseColor::Migration),
    ("data storage", PhaseColor::DataStorage),
    ("disaster recovery as a service", PhaseColor::Draas),
    ("optimization", PhaseColor::Optimization),
];

impl PhaseColor {
    /// Case-insensitive prefix match on the phase name.
    pub fn for_phase(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.is_empty() {
            return PhaseColor::Default;
        }
        match PREFIXES.iter().find(|(prefix, _)| name.starts_with(prefix)) {
            Some((_, color)) => *color,
            None => {
                tracing::warn!(phase = %name, "no colour for phase, using default");
                PhaseColor::Default
            }
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            PhaseColor::Mobilize => "#3B4430",
            PhaseColor::Iaas => "#D93434",
            PhaseColor::Migration => "#CC7722",
            PhaseColor::DataStorage => "#008080",
            PhaseColor::Draas => "#243A73",
            PhaseColor::Optimization => "#2F3A4C",
            PhaseColor::Default => "#808080",
        }
    }
}

/// `#RRGGBB` to a CSS `rgba()`; anything unparseable becomes black.
pub fn hex_to_rgba(hex: &str, alpha: f64) -> String {
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|digits| u8::from_str_radix(digits, 16).ok())
    };
    if !hex.starts_with('#') {
        return format!("rgba(0,0,0,{})", alpha);
    }
    match (channel(1..3), channel(3..5), channel(5..7)) {
        (Some(r), Some(g), Some(b)) => format!("rgba({}, {}, {}, {})", r, g, b, alpha),
        _ => format!("rgba(0,0,0,{})", alpha),
    }
}

pub fn segment_fill(segment: &Segment) -> String {
    let hex = PhaseColor::for_phase(&segment.label).hex();
    let alpha = if segment.is_rolloff {
        ROLLOFF_FILL_ALPHA
    } else {
        PRIMARY_FILL_ALPHA
    };
    hex_to_rgba(hex, alpha)
}

pub fn segment_border(segment: &Segment) -> String {
    let hex = PhaseColor::for_phase(&segment.label).hex();
    if segment.is_rolloff {
        hex_to_rgba(hex, ROLLOFF_BORDER_ALPHA)
    } else {
        hex.to_string()
    }
}

//! Distinct color picking for new habits
//!
//! A new habit gets the curated palette color whose hue sits furthest from
//! every hue already in use. Once the palette is used up, random hues are
//! drawn and the best-separated one is rendered at a fixed saturation and
//! lightness.

use rand::Rng;

/// Curated vivid colors, in preference order
pub const PALETTE: [&str; 14] = [
    "#35c5ff", "#ff8c42", "#7ed957", "#b084f5", "#ff5a5f", "#2ee6c5", "#ffb400", "#4d7cff", "#ff7ac6",
    "#a3e635", "#6d5dfe", "#f5e663", "#e35bf0", "#3ddc84",
];

/// Random hues drawn once the palette is exhausted
pub const FALLBACK_TRIALS: usize = 40;

/// Saturation (percent) of generated colors
pub const FALLBACK_SATURATION: f64 = 82.0;

/// Lightness (percent) of generated colors
pub const FALLBACK_LIGHTNESS: f64 = 56.0;

/// Parse `#rrggbb` (any case) into its channels
pub fn parse_hex(s: &str) -> Option<(u8, u8, u8)> {
    let hex = s.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Canonical lowercase `#rrggbb`, or None if unparseable
pub fn normalize_hex(s: &str) -> Option<String> {
    parse_hex(s).map(|(r, g, b)| format!("#{:02x}{:02x}{:02x}", r, g, b))
}

/// Hue in degrees `[0, 360)`, saturation and lightness in percent
pub fn hex_to_hsl(s: &str) -> Option<(f64, f64, f64)> {
    let (r, g, b) = parse_hex(s)?;
    let (r, g, b) = (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let lightness = (max + min) / 2.0;

    if delta == 0.0 {
        return Some((0.0, 0.0, lightness * 100.0));
    }

    let saturation = delta / (1.0 - (2.0 * lightness - 1.0).abs());
    let hue = if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    Some((hue.rem_euclid(360.0), saturation * 100.0, lightness * 100.0))
}

/// Render hue/saturation/lightness (degrees, percent, percent) as `#rrggbb`
pub fn hsl_to_hex(hue: f64, saturation: f64, lightness: f64) -> String {
    let h = hue.rem_euclid(360.0);
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let l = (lightness / 100.0).clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    format!("#{:02x}{:02x}{:02x}", to_u8(r), to_u8(g), to_u8(b))
}

/// Circular distance between two hues, in `[0, 180]`
pub fn hue_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).abs().rem_euclid(360.0);
    d.min(360.0 - d)
}

/// Smallest distance from `hue` to any used hue; unbounded when none are used
fn separation(hue: f64, used_hues: &[f64]) -> f64 {
    used_hues
        .iter()
        .map(|u| hue_distance(*u, hue))
        .fold(f64::INFINITY, f64::min)
}

/// Outcome of the random-hue fallback search
#[derive(Debug, Clone)]
pub(crate) struct HueSearch {
    pub hue: f64,
    pub score: f64,
    /// Best score seen after each trial
    pub best_by_trial: Vec<f64>,
}

pub(crate) fn search_random_hue<R: Rng + ?Sized>(used_hues: &[f64], rng: &mut R, trials: usize) -> HueSearch {
    let mut best = HueSearch {
        hue: 0.0,
        score: f64::NEG_INFINITY,
        best_by_trial: Vec::with_capacity(trials),
    };

    for _ in 0..trials {
        let hue = rng.random_range(0.0..360.0);
        let score = separation(hue, used_hues);
        if score > best.score {
            best.hue = hue;
            best.score = score;
        }
        best.best_by_trial.push(best.score);
    }

    best
}

/// Pick a color for a new habit, maximally distinct in hue from `used`
pub fn pick_color<S: AsRef<str>>(used: &[S]) -> String {
    pick_color_with(used, &mut rand::rng())
}

/// [`pick_color`] with an injectable random source
///
/// Only the exhausted-palette fallback draws from `rng`; while palette
/// entries remain the result depends on `used` alone.
pub fn pick_color_with<S, R>(used: &[S], rng: &mut R) -> String
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    let used_hues: Vec<f64> = used
        .iter()
        .filter_map(|c| hex_to_hsl(c.as_ref()))
        .map(|(h, _, _)| h)
        .collect();
    let used_lower: Vec<String> = used.iter().map(|c| c.as_ref().trim().to_lowercase()).collect();

    let mut best: Option<(&str, f64)> = None;
    for candidate in PALETTE.into_iter().filter(|c| !used_lower.iter().any(|u| u == c)) {
        let Some((hue, _, _)) = hex_to_hsl(candidate) else {
            continue;
        };
        let score = separation(hue, &used_hues);
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((candidate, score));
        }
    }

    if let Some((color, _)) = best {
        return color.to_string();
    }

    let search = search_random_hue(&used_hues, rng, FALLBACK_TRIALS);
    tracing::debug!(hue = search.hue, score = search.score, "pick_color: palette exhausted");
    hsl_to_hex(search.hue, FALLBACK_SATURATION, FALLBACK_LIGHTNESS)
}

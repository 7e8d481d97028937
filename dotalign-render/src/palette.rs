//! Colour ramps for heatmaps and path overlays.

/// Anchor colours of the diverging cool-warm ramp, low to high.
const COOLWARM: [(u8, u8, u8); 5] = [
    (0x3b, 0x4c, 0xc0),
    (0x7b, 0x9f, 0xf9),
    (0xdd, 0xdc, 0xdc),
    (0xf4, 0x9a, 0x7b),
    (0xb4, 0x04, 0x26),
];

/// Anchor colours of the viridis ramp, low to high.
const VIRIDIS: [(u8, u8, u8); 5] = [
    (0x44, 0x01, 0x54),
    (0x3b, 0x52, 0x8b),
    (0x21, 0x91, 0x8c),
    (0x5e, 0xc9, 0x62),
    (0xfd, 0xe7, 0x25),
];

fn interpolate(stops: &[(u8, u8, u8)], t: f64) -> (u8, u8, u8) {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (stops.len() - 1) as f64;
    let lo = (scaled.floor() as usize).min(stops.len() - 2);
    let frac = scaled - lo as f64;

    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (a, b) = (stops[lo], stops[lo + 1]);
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

pub fn to_hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Cool-warm colour for `t` in `[0, 1]`.
pub fn coolwarm(t: f64) -> String {
    to_hex(interpolate(&COOLWARM, t))
}

/// Viridis colour for `t` in `[0, 1]`.
pub fn viridis(t: f64) -> String {
    to_hex(interpolate(&VIRIDIS, t))
}

/// `n` evenly spaced viridis colours, first at 0.0 and last at 1.0.
pub fn viridis_samples(n: usize) -> Vec<String> {
    match n {
        0 => Vec::new(),
        1 => vec![viridis(0.0)],
        _ => (0..n).map(|k| viridis(k as f64 / (n - 1) as f64)).collect(),
    }
}

/// Map `value` into `[0, 1]` over `(lo, hi)`; a flat range maps to the midpoint.
pub fn normalize(value: f64, (lo, hi): (f64, f64)) -> f64 {
    if hi > lo {
        (value - lo) / (hi - lo)
    } else {
        0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_endpoints() {
        assert_eq!(coolwarm(0.0), "#3b4cc0");
        assert_eq!(coolwarm(1.0), "#b40426");
        assert_eq!(viridis(0.0), "#440154");
        assert_eq!(viridis(1.0), "#fde725");
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(coolwarm(-3.0), coolwarm(0.0));
        assert_eq!(coolwarm(7.0), coolwarm(1.0));
        assert_eq!(viridis(f64::NAN), viridis(0.0));
    }

    #[test]
    fn test_viridis_samples() {
        assert!(viridis_samples(0).is_empty());
        assert_eq!(viridis_samples(1), vec!["#440154".to_string()]);
        let three = viridis_samples(3);
        assert_eq!(three[0], "#440154");
        assert_eq!(three[1], "#21918c");
        assert_eq!(three[2], "#fde725");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(5.0, (0.0, 10.0)), 0.5);
        assert_eq!(normalize(3.0, (3.0, 3.0)), 0.5);
    }
}

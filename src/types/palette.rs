use serde::Serialize;

type Rgb = (u8, u8, u8);

const EMBER: [Rgb; 3] = [(0xB8, 0x1D, 0x2E), (0xE8, 0x5D, 0x2A), (0xF2, 0xA5, 0x41)];

/// Named colour ramp used for bar fills and the CDF stroke.
#[derive(Debug, Clone, Serialize)]
pub struct Palette {
    pub name: &'static str,
    pub stops: Vec<Rgb>,
}

impl Palette {
    pub fn get(name: &str) -> Option<Self> {
        let (name, stops) = match name {
            "ember" => ("ember", EMBER.to_vec()),
            "ocean" => ("ocean", vec![(0x1B, 0x3A, 0x6B), (0x2C, 0x7D, 0xA0), (0x6C, 0xC4, 0xD9)]),
            "forest" => ("forest", vec![(0x23, 0x4D, 0x20), (0x4F, 0x8A, 0x3C), (0xA3, 0xC9, 0x6B)]),
            "slate" => ("slate", vec![(0x2F, 0x3E, 0x46), (0x52, 0x79, 0x6F), (0x84, 0xA9, 0x8C)]),
            _ => return None,
        };
        Some(Self { name, stops })
    }

    pub fn default() -> Self {
        Self {
            name: "ember",
            stops: EMBER.to_vec(),
        }
    }

    /// Colour for item `index` of `count`, spread evenly across the ramp.
    pub fn color_at(&self, index: usize, count: usize) -> String {
        let t = if count <= 1 {
            0.0
        } else {
            index as f64 / (count - 1) as f64
        };
        self.interpolate(t)
    }

    /// Hex colour at position `t` in `0..=1` along the ramp.
    pub fn interpolate(&self, t: f64) -> String {
        let (r, g, b) = match self.stops.as_slice() {
            [] => (0x44, 0x44, 0x44),
            [only] => *only,
            stops => {
                let scaled = t.clamp(0.0, 1.0) * (stops.len() - 1) as f64;
                let lower = (scaled as usize).min(stops.len() - 2);
                let frac = scaled - lower as f64;
                let (from, to) = (stops[lower], stops[lower + 1]);
                (
                    mix(from.0, to.0, frac),
                    mix(from.1, to.1, frac),
                    mix(from.2, to.2, frac),
                )
            }
        };
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }
}

fn mix(from: u8, to: u8, frac: f64) -> u8 {
    (f64::from(from) + (f64::from(to) - f64::from(from)) * frac).round() as u8
}

use vello::peniko::Color;

use crate::tree::arena::{NodeId, WeightedTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Hue per top-level branch, shaded by depth.
    #[default]
    Branch,
    /// Hue hashed from each node's own name.
    NameHash,
    /// Gray ramp by depth only.
    Depth,
}

#[derive(Debug, Clone, Copy)]
pub struct ColorSettings {
    pub mode: ColorMode,
    pub vibrancy: f32,
    /// Outline color for internal nodes.
    pub outline: AppColor,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            mode: ColorMode::Branch,
            vibrancy: 1.10,
            outline: AppColor::new(0.08, 0.08, 0.10),
        }
    }
}

/// Our custom color representation for easy manipulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl AppColor {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Convert to vello's peniko Color (AlphaColor<Srgb>).
    pub fn to_peniko(self) -> Color {
        Color::new([self.r, self.g, self.b, self.a])
    }

    pub fn darken(self, amount: f32) -> Self {
        Self {
            r: (self.r - amount).max(0.0),
            g: (self.g - amount).max(0.0),
            b: (self.b - amount).max(0.0),
            a: self.a,
        }
    }
}

/// Fill color for `node`, drawn at `depth` below the layout root.
pub fn node_color(
    tree: &WeightedTree,
    node: NodeId,
    depth: u16,
    settings: &ColorSettings,
) -> AppColor {
    let fade = (depth as f32 * 0.04).min(0.30);
    let base = match settings.mode {
        ColorMode::Branch => {
            let branch = top_level_ancestor(tree, node);
            hsv_to_rgb(hash01(&tree.get(branch).name), 0.62, 0.88)
        }
        ColorMode::NameHash => hsv_to_rgb(hash01(&tree.get(node).name), 0.70, 0.86),
        ColorMode::Depth => AppColor::new(0.78, 0.78, 0.80),
    };
    apply_vibrancy(base.darken(fade), settings.vibrancy)
}

/// The ancestor directly below the root, or the node itself at depth <= 1.
fn top_level_ancestor(tree: &WeightedTree, node: NodeId) -> NodeId {
    let mut current = node;
    while let Some(parent) = tree.get(current).parent {
        if tree.get(parent).parent.is_none() {
            return current;
        }
        current = parent;
    }
    current
}

pub fn mode_name(mode: ColorMode) -> &'static str {
    match mode {
        ColorMode::Branch => "Branch",
        ColorMode::NameHash => "Name Hash",
        ColorMode::Depth => "Depth",
    }
}

/// Inverse of a command-line spelling: `branch`, `name` or `depth`.
pub fn parse_mode(name: &str) -> Option<ColorMode> {
    match name.to_ascii_lowercase().as_str() {
        "branch" => Some(ColorMode::Branch),
        "name" | "name-hash" => Some(ColorMode::NameHash),
        "depth" => Some(ColorMode::Depth),
        _ => None,
    }
}

fn apply_vibrancy(color: AppColor, vibrancy: f32) -> AppColor {
    let (h, s, v) = rgb_to_hsv(color);
    let s = (s * vibrancy.clamp(0.6, 2.0)).clamp(0.0, 1.0);
    hsv_to_rgb(h, s, v)
}

fn rgb_to_hsv(c: AppColor) -> (f32, f32, f32) {
    let max = c.r.max(c.g.max(c.b));
    let min = c.r.min(c.g.min(c.b));
    let d = max - min;
    let h = if d <= 1e-6 {
        0.0
    } else if (max - c.r).abs() <= 1e-6 {
        ((c.g - c.b) / d).rem_euclid(6.0) / 6.0
    } else if (max - c.g).abs() <= 1e-6 {
        (((c.b - c.r) / d) + 2.0) / 6.0
    } else {
        (((c.r - c.g) / d) + 4.0) / 6.0
    };
    let s = if max <= 1e-6 { 0.0 } else { d / max };
    (h, s, max)
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> AppColor {
    let h6 = (h * 6.0).rem_euclid(6.0);
    let i = h6.floor() as i32;
    let f = h6 - i as f32;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);
    let (r, g, b) = match i {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    AppColor { r, g, b, a: 1.0 }
}

/// FNV-1a folded into [0, 1].
fn hash01(s: &str) -> f32 {
    let mut h: u32 = 2166136261;
    for &b in s.as_bytes() {
        h ^= b as u32;
        h = h.wrapping_mul(16777619);
    }
    ((h >> 8) as f32) / ((u32::MAX >> 8) as f32)
}

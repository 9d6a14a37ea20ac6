//! Color map system.

use std::collections::HashMap;

use glam::Vec3;

/// Name of the default color map.
pub const JET: &str = "jet";

/// A color map for mapping scalar values to colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    /// Color map name.
    pub name: String,
    /// Color samples (evenly spaced from 0 to 1).
    pub colors: Vec<Vec3>,
}

impl ColorMap {
    /// Creates a new color map.
    pub fn new(name: impl Into<String>, colors: Vec<Vec3>) -> Self {
        Self {
            name: name.into(),
            colors,
        }
    }

    /// The blue-cyan-green-yellow-red ramp.
    ///
    /// Knots every 0.125 make linear interpolation reproduce the five bands
    /// exactly: dark blue to blue on `[0, 0.125]`, blue to cyan up to 0.375,
    /// cyan to yellow via green up to 0.625, yellow to red up to 0.875 and red
    /// to dark red on the rest.
    pub fn jet() -> Self {
        Self::new(
            JET,
            vec![
                Vec3::new(0.0, 0.0, 0.5),
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(0.0, 0.5, 1.0),
                Vec3::new(0.0, 1.0, 1.0),
                Vec3::new(0.5, 1.0, 0.5),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(1.0, 0.5, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.5, 0.0, 0.0),
            ],
        )
    }

    /// Samples the map at `t`, clamped to `[0, 1]`.
    ///
    /// Interpolation is linear between neighbouring knots, so a map whose
    /// knots sit on the break points of a piecewise-linear ramp (as [`jet`](Self::jet)
    /// does at every 0.125) reproduces that ramp exactly.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn sample(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);

        if self.colors.is_empty() {
            return Vec3::ZERO;
        }

        if self.colors.len() == 1 {
            return self.colors[0];
        }

        let n = self.colors.len() - 1;
        let idx = (t * n as f32).floor() as usize;
        let idx = idx.min(n - 1);
        let frac = t * n as f32 - idx as f32;

        self.colors[idx].lerp(self.colors[idx + 1], frac)
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::jet()
    }
}

/// Registry for managing color maps.
#[derive(Default)]
pub struct ColorMapRegistry {
    color_maps: HashMap<String, ColorMap>,
}

impl ColorMapRegistry {
    /// Creates a new color map registry with default color maps.
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register_defaults();
        registry
    }

    fn register_defaults(&mut self) {
        self.register(ColorMap::jet());

        self.register(ColorMap::new(
            "viridis",
            vec![
                Vec3::new(0.267, 0.004, 0.329),
                Vec3::new(0.282, 0.140, 0.457),
                Vec3::new(0.253, 0.265, 0.529),
                Vec3::new(0.206, 0.371, 0.553),
                Vec3::new(0.163, 0.471, 0.558),
                Vec3::new(0.127, 0.566, 0.550),
                Vec3::new(0.134, 0.658, 0.517),
                Vec3::new(0.266, 0.749, 0.440),
                Vec3::new(0.477, 0.821, 0.318),
                Vec3::new(0.741, 0.873, 0.150),
                Vec3::new(0.993, 0.906, 0.144),
            ],
        ));

        self.register(ColorMap::new(
            "coolwarm",
            vec![
                Vec3::new(0.230, 0.299, 0.754),
                Vec3::new(0.552, 0.690, 0.996),
                Vec3::new(0.866, 0.866, 0.866),
                Vec3::new(0.956, 0.604, 0.486),
                Vec3::new(0.706, 0.016, 0.150),
            ],
        ));
    }

    /// Registers a color map, replacing one of the same name.
    pub fn register(&mut self, color_map: ColorMap) {
        self.color_maps.insert(color_map.name.clone(), color_map);
    }

    /// Gets a color map by name.
    pub fn get(&self, name: &str) -> Option<&ColorMap> {
        self.color_maps.get(name)
    }

    /// Gets a color map by name, falling back to jet for unknown names.
    pub fn get_or_default(&self, name: &str) -> ColorMap {
        self.get(name).cloned().unwrap_or_else(|| {
            log::warn!("unknown color map '{name}', using '{JET}'");
            ColorMap::jet()
        })
    }

    /// Returns all color map names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.color_maps.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-6
    }

    /// The five linear bands written out directly.
    fn band(t: f32) -> Vec3 {
        if t <= 0.125 {
            Vec3::new(0.0, 0.0, 0.5 + t / 0.25)
        } else if t <= 0.375 {
            Vec3::new(0.0, (t - 0.125) / 0.25, 1.0)
        } else if t <= 0.625 {
            Vec3::new((t - 0.375) / 0.25, 1.0, 1.0 - (t - 0.375) / 0.25)
        } else if t <= 0.875 {
            Vec3::new(1.0, 1.0 - (t - 0.625) / 0.25, 0.0)
        } else {
            Vec3::new(1.0 - (t - 0.875) / 0.25, 0.0, 0.0)
        }
    }

    #[test]
    fn test_jet_matches_bands() {
        let jet = ColorMap::jet();
        for i in 0..=200 {
            let t = i as f32 / 200.0;
            assert!(close(jet.sample(t), band(t)), "t = {t}");
        }
    }

    #[test]
    fn test_jet_endpoints() {
        let jet = ColorMap::jet();
        assert_eq!(jet.sample(0.0), Vec3::new(0.0, 0.0, 0.5));
        assert_eq!(jet.sample(1.0), Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(jet.sample(-3.0), jet.sample(0.0));
        assert_eq!(jet.sample(7.0), jet.sample(1.0));
    }

    #[test]
    fn test_registry() {
        let registry = ColorMapRegistry::new();
        assert!(registry.get(JET).is_some());
        assert!(registry.get("viridis").is_some());
        assert!(registry.get("nope").is_none());
        assert_eq!(registry.get_or_default("nope"), ColorMap::jet());
        assert_eq!(registry.names().count(), 3);
    }

    #[test]
    fn test_sample_hits_knots() {
        let jet = ColorMap::jet();
        for (i, knot) in jet.colors.iter().enumerate() {
            let t = i as f32 / 8.0;
            assert!(close(jet.sample(t), *knot), "knot {i}");
        }
    }

    #[test]
    fn test_degenerate_maps() {
        assert_eq!(ColorMap::new("empty", vec![]).sample(0.5), Vec3::ZERO);
        assert_eq!(ColorMap::new("one", vec![Vec3::X]).sample(0.5), Vec3::X);
    }
}

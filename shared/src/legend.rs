use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::colors::{LAB_BRIGHTEN_STEP, brighten, hex_string, lightness, parse_color};
use crate::map::RegionGroups;

/// Brighten amount between consecutive legend stops.
pub const BRIGHTEN_INCREMENT: f64 = 0.5;

/// Interior stops used once the max reaches [`FULL_LEGEND_MAX`].
pub const MAX_INTERIOR_STOPS: usize = 3;

pub const FULL_LEGEND_MAX: f64 = 5.0;

/// Min/max over every parseable numeric label.
///
/// An empty range (nothing parsed) is `(+inf, -inf)` and must not be
/// written into a legend; use [`NumericRange::or`] to substitute known bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub const EMPTY: Self = Self {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    fn include(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// This range, or `(min, max)` when nothing was parsed.
    pub fn or(self, min: f64, max: f64) -> Self {
        if self.is_empty() { Self { min, max } } else { self }
    }
}

/// Scan every region in every group for numeric labels.
/// Labels that are empty or fail to parse are skipped.
pub fn compute_global_numeric_range(groups: &RegionGroups) -> NumericRange {
    groups
        .regions()
        .filter_map(|region| region.numeric_value())
        .fold(NumericRange::EMPTY, |mut range, value| {
            range.include(value);
            range
        })
}

/// A single legend entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendStop {
    pub color: String,
    pub value: f64,
}

/// Ordered color -> value mapping. Serialized as a JSON object whose key
/// order is the stop order (max first).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChoroplethItems(Vec<LegendStop>);

impl ChoroplethItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a stop. An existing color keeps its position and takes the
    /// new value.
    pub fn insert(&mut self, color: String, value: f64) {
        match self.0.iter_mut().find(|stop| stop.color == color) {
            Some(stop) => stop.value = value,
            None => self.0.push(LegendStop { color, value }),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LegendStop> {
        self.0.iter()
    }

    pub fn contains(&self, color: &str) -> bool {
        self.0.iter().any(|stop| stop.color == color)
    }

    pub fn get(&self, color: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|stop| stop.color == color)
            .map(|stop| stop.value)
    }

    pub fn first(&self) -> Option<&LegendStop> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&LegendStop> {
        self.0.last()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().map(|stop| stop.value)
    }

    pub fn colors(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|stop| stop.color.as_str())
    }
}

impl<'a> IntoIterator for &'a ChoroplethItems {
    type Item = &'a LegendStop;
    type IntoIter = std::slice::Iter<'a, LegendStop>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for ChoroplethItems {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for stop in &self.0 {
            map.serialize_entry(&stop.color, &stop.value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ChoroplethItems {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ItemsVisitor;

        impl<'de> Visitor<'de> for ItemsVisitor {
            type Value = ChoroplethItems;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of color to legend value")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut items = ChoroplethItems::new();
                while let Some((color, value)) = access.next_entry::<String, f64>()? {
                    items.insert(color, value);
                }
                Ok(items)
            }
        }

        deserializer.deserialize_map(ItemsVisitor)
    }
}

fn interior_stop_count(max: f64) -> usize {
    if max >= FULL_LEGEND_MAX {
        return MAX_INTERIOR_STOPS;
    }
    // i = 1 .. while i < max
    let count = max.ceil() - 1.0;
    if count <= 0.0 {
        0
    } else {
        (count as usize).min(MAX_INTERIOR_STOPS)
    }
}

/// Build the graduated legend for `hue` over `[min, max]`.
///
/// The first stop is the unmodified hue at `max`, followed by up to three
/// interior stops one unit apart, each a brighten step lighter, and a final
/// stop at `min`. Interior values at or below `min`, or not below the
/// previous stop, are not emitted. Every stop gets its own color.
pub fn build_choropleth_items(hue: &str, min: f64, max: f64) -> Result<ChoroplethItems, String> {
    let base = parse_color(hue).ok_or_else(|| format!("invalid hue: {hue:?}"))?;

    let mut values = vec![max];
    for i in 1..=interior_stop_count(max) {
        let value = max - i as f64;
        let previous = values[values.len() - 1];
        if value <= min || value >= previous {
            break;
        }
        values.push(value);
    }
    values.push(min);

    let increment = shade_increment(base, values.len() - 1);
    let mut items = ChoroplethItems::new();
    for (step, value) in values.into_iter().enumerate() {
        let color = unused_shade(&items, brighten(base, increment * step as f64));
        items.insert(color, value);
    }
    Ok(items)
}

/// Brighten amount between stops, shrunk so the last stop stays within the
/// hue's remaining L* headroom.
fn shade_increment(base: (u8, u8, u8), steps: usize) -> f64 {
    let headroom = f64::from(100.0 - lightness(base)).max(0.0);
    let full = f64::from(LAB_BRIGHTEN_STEP) * BRIGHTEN_INCREMENT * steps as f64;
    if full <= headroom {
        BRIGHTEN_INCREMENT
    } else {
        BRIGHTEN_INCREMENT * headroom / full
    }
}

/// The color as a string, or its nearest 8-bit neighbour not yet used by
/// `items`. Neighbours are tried toward white first, then toward black.
fn unused_shade(items: &ChoroplethItems, (r, g, b): (u8, u8, u8)) -> String {
    let lighter =
        (1..=u8::MAX).map(|k| (r.saturating_add(k), g.saturating_add(k), b.saturating_add(k)));
    let darker =
        (1..=u8::MAX).map(|k| (r.saturating_sub(k), g.saturating_sub(k), b.saturating_sub(k)));
    std::iter::once((r, g, b))
        .chain(lighter)
        .chain(darker)
        .map(hex_string)
        .find(|color| !items.contains(color))
        .unwrap_or_else(|| hex_string((r, g, b)))
}

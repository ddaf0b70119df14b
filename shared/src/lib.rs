pub mod colors;
pub mod legend;
pub mod map;

pub use colors::{brighten, hex_string, parse_color};
pub use legend::{
    ChoroplethItems, LegendStop, NumericRange, build_choropleth_items,
    compute_global_numeric_range,
};
pub use map::{
    ChoroplethLegend, ColorLegend, ColorType, DEFAULT_HUE, Legend, MapDocument, Region,
    RegionGroups,
};

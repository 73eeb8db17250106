use crate::levels::LEVEL_COUNT;

pub const PINE_VERSION: &str = "//@version=5";

/// Labels for the five levels, lowest first.
pub const LEVEL_LABELS: [&str; LEVEL_COUNT] =
    ["Level -2", "Level -1", "Base Level", "Level +1", "Level +2"];

const SUPPORT_COLOR: &str = "color.green";
const BASE_COLOR: &str = "color.yellow";
const RESISTANCE_COLOR: &str = "color.red";

fn level_color(index: usize) -> &'static str {
    match index {
        0 | 1 => SUPPORT_COLOR,
        2 => BASE_COLOR,
        _ => RESISTANCE_COLOR,
    }
}

/// Renders the levels as a TradingView indicator. Lines are emitted in index
/// order, so the first `hline` is always "Level -2".
pub fn render_pine(
    symbol: &str,
    base_price: f64,
    base: u64,
    levels: &[u64; LEVEL_COUNT],
) -> String {
    let symbol = symbol.to_uppercase();
    let mut out = format!(
        "{PINE_VERSION}\n\
         indicator(\"Sqrt Levels - {symbol}\", overlay=true)\n\
         \n\
         // Symbol: {symbol}\n\
         // Base price: {base_price}\n\
         // Base (floor of sqrt): {base}\n\
         \n"
    );

    for (i, (level, label)) in levels.iter().zip(LEVEL_LABELS).enumerate() {
        let style = if i == 2 {
            "hline.style_solid"
        } else {
            "hline.style_dashed"
        };
        out.push_str(&format!(
            "hline({}, title=\"{}\", color={}, linestyle={}, linewidth=1)\n",
            level,
            label,
            level_color(i),
            style
        ));
    }

    out
}

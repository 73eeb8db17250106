use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LevelError, LevelResult};
use crate::script::render_pine;

/// Number of levels on either side of the base, plus the base itself.
pub const LEVEL_COUNT: usize = 5;

/// Largest base whose `(base + 2)^2` still fits in a `u64`.
const MAX_BASE: u64 = u32::MAX as u64 - 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSet {
    pub symbol: String,
    pub base_price: f64,
    pub base: u64,
    pub raw_levels: [u64; LEVEL_COUNT],
    pub adjusted_levels: [u64; LEVEL_COUNT],
    pub script: String,
}

impl LevelSet {
    pub fn support(&self) -> &[u64] {
        &self.adjusted_levels[..2]
    }

    pub fn base_level(&self) -> u64 {
        self.adjusted_levels[2]
    }

    pub fn resistance(&self) -> &[u64] {
        &self.adjusted_levels[3..]
    }
}

/// Derives the five square levels around `floor(sqrt(base_price))` and renders
/// them as a Pine Script snippet for `symbol`.
///
/// Fails with [`LevelError::PriceTooLow`] when the base is below 2, which is
/// any price under 4. At exactly 4 the adjusted levels are `[1, 1, 5, 9, 17]`;
/// the repeated 1 is kept as is.
pub fn generate_levels(base_price: f64, symbol: &str) -> LevelResult<LevelSet> {
    if !base_price.is_finite() {
        return Err(LevelError::InvalidPrice(format!(
            "{} is not a finite number",
            base_price
        )));
    }

    let base = floor_sqrt(base_price)?;
    if base < 2 {
        return Err(LevelError::PriceTooLow {
            symbol: symbol.to_string(),
        });
    }

    let raw_levels = raw_levels(base)?;
    let adjusted_levels = raw_levels.map(make_odd);
    debug!(
        "Levels for {} @ {}: base={} raw={:?} adjusted={:?}",
        symbol, base_price, base, raw_levels, adjusted_levels
    );

    let script = render_pine(symbol, base_price, base, &adjusted_levels);

    Ok(LevelSet {
        symbol: symbol.to_string(),
        base_price,
        base,
        raw_levels,
        adjusted_levels,
        script,
    })
}

/// `floor(sqrt(price))`, with zero for non-positive prices.
pub fn floor_sqrt(price: f64) -> LevelResult<u64> {
    if price <= 0.0 {
        return Ok(0);
    }

    let root = price.sqrt().floor();
    if root > MAX_BASE as f64 {
        return Err(LevelError::PriceOutOfRange(format!(
            "{} is too large to derive levels from",
            price
        )));
    }

    // base^2 is an integer, so comparing against floor(price) is exact
    let floor = price.floor() as u128;
    let square = |b: u64| (b as u128) * (b as u128);

    let mut base = root as u64;
    while base > 0 && square(base) > floor {
        base -= 1;
    }
    while base < MAX_BASE && square(base + 1) <= floor {
        base += 1;
    }
    Ok(base)
}

fn raw_levels(base: u64) -> LevelResult<[u64; LEVEL_COUNT]> {
    let mut levels = [0u64; LEVEL_COUNT];
    for (i, level) in levels.iter_mut().enumerate() {
        // base >= 2, so base + i - 2 never underflows
        let root = base + i as u64 - 2;
        *level = root.checked_mul(root).ok_or_else(|| {
            LevelError::PriceOutOfRange(format!("level {}^2 overflows", root))
        })?;
    }
    Ok(levels)
}

fn make_odd(level: u64) -> u64 {
    if level % 2 == 0 {
        level + 1
    } else {
        level
    }
}

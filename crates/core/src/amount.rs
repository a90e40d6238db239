//! Ticket amount parsing and key-component rendering.

use crate::error::{Error, Result};
use crate::types::TicketValue;
use tracing::error;

/// Magnitude marker: each trailing `M` multiplies by one thousand.
const MAGNITUDE_MARKER: char = 'M';

/// Normalize a ticket amount to a number.
///
/// Numbers pass through unchanged. Text ending in `M` is the remainder scaled
/// by 1000, and the marker stacks (`"5MM"` is five million). Anything else
/// fails with [`Error::Format`].
pub fn normalize_amount(value: &TicketValue) -> Result<f64> {
    match value {
        TicketValue::Number(n) => Ok(n.into_inner()),
        TicketValue::Text(text) => normalize_text(text),
    }
}

fn normalize_text(text: &str) -> Result<f64> {
    let digits = text.trim_end_matches(MAGNITUDE_MARKER);
    let markers = text.len() - digits.len();

    let scaled = match digits.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => i32::try_from(markers)
            .ok()
            .map(|n| v * 1000f64.powi(n))
            .filter(|x| x.is_finite()),
        _ => None,
    };

    scaled.ok_or_else(|| {
        error!(input = %text, "invalid numeric ticket amount");
        Error::format(format!("invalid numeric ticket amount: {:?}", text))
    })
}

/// Render a number for use in keys and reference numbers.
///
/// Values are rounded to 6 decimals; integral results print without a
/// fraction (`226819.0` -> `"226819"`).
pub fn render_number(x: f64) -> String {
    let rounded = (x * 1e6).round() / 1e6;
    if rounded.fract() == 0.0 && rounded.abs() < 1e15 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

/// String form of a ticket value inside a group key.
pub fn key_component(value: &TicketValue) -> String {
    match value {
        TicketValue::Text(text) => text.clone(),
        TicketValue::Number(n) => render_number(n.into_inner()),
    }
}

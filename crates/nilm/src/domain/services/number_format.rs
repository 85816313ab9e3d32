//! Number rendering that matches what dashboard readers (and the model) see
//! in the browser: fixed-point rounding with ties away from zero, and the
//! shortest round-trip form without a trailing `.0` for integral values.

use serde::Serializer;

/// Fixed-point rendering with `digits` decimals; exact ties round away from zero.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return plain_number(value);
    }

    let magnitude = value.abs();
    let exact = format!("{:.64}", magnitude);
    let is_tie = exact
        .split_once('.')
        .and_then(|(_, fraction)| fraction.get(digits..))
        .map(|tail| {
            let mut rest = tail.chars();
            rest.next() == Some('5') && rest.all(|d| d == '0')
        })
        .unwrap_or(false);

    let rounded = if is_tie {
        // Nudge past the tie so the formatter rounds up
        format!("{:.*}", digits, f64::from_bits(magnitude.to_bits() + 1))
    } else {
        format!("{:.*}", digits, magnitude)
    };

    if value < 0.0 {
        format!("-{rounded}")
    } else {
        rounded
    }
}

/// Shortest representation: `40`, `40.5`, `0.15`, `1e+21`.
pub fn plain_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let exp = format!("{:e}", value);
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        };
    }

    value.to_string()
}

/// Serialize an optional reading as a JSON number without a spurious `.0`
pub fn serialize_plain_number<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 9_007_199_254_740_992.0 => {
            serializer.serialize_i64(*v as i64)
        }
        Some(v) => serializer.serialize_f64(*v),
        None => serializer.serialize_none(),
    }
}

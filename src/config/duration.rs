use std::time::Duration;

use anyhow::{bail, Result};

/// Parses durations written the way `15s`, `1m30s`, `250ms` or `1.5h` are.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let text = input.trim();
    if text.is_empty() {
        bail!("Empty duration");
    }
    if text == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total_nanos: f64 = 0.0;
    let mut rest = text;

    while !rest.is_empty() {
        let number_len = rest
            .find(|ch: char| !(ch.is_ascii_digit() || ch == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);
        if number.is_empty() || number == "." {
            bail!("Invalid duration: {input}");
        }
        let value: f64 = number
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration: {input}"))?;

        let unit_len = tail
            .find(|ch: char| ch.is_ascii_digit() || ch == '.')
            .unwrap_or(tail.len());
        let (unit, remaining) = tail.split_at(unit_len);
        let Some(scale) = unit_scale(unit) else {
            if unit.is_empty() {
                bail!("Missing unit in duration: {input}");
            }
            bail!("Unknown unit {unit:?} in duration: {input}");
        };

        total_nanos += value * scale;
        rest = remaining;
    }

    Ok(Duration::from_nanos(total_nanos.round() as u64))
}

fn unit_scale(unit: &str) -> Option<f64> {
    let scale = match unit {
        "ns" => 1.0,
        "us" | "µs" | "μs" => 1_000.0,
        "ms" => 1_000_000.0,
        "s" => 1_000_000_000.0,
        "m" => 60.0 * 1_000_000_000.0,
        "h" => 3_600.0 * 1_000_000_000.0,
        _ => return None,
    };
    Some(scale)
}

/// Splits a comma separated key list into lowercase key names.
pub fn parse_keys(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|key| key.trim().to_lowercase())
        .filter(|key| !key.is_empty())
        .collect()
}

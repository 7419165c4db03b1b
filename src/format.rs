// src/format.rs
//! Compact counters for badges: 999 -> "999", 1500 -> "1.5k", 2_000_000 -> "2m".

pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        with_suffix(n, 1_000_000, 'm')
    } else if n >= 1_000 {
        with_suffix(n, 1_000, 'k')
    } else {
        n.to_string()
    }
}

/// One decimal place, ties rounded up (1250 -> "1.3k").
fn with_suffix(n: u64, div: u64, suffix: char) -> String {
    let (n, div) = (u128::from(n), u128::from(div));
    let tenths = (n * 10 + div / 2) / div;
    match tenths % 10 {
        0 => format!("{}{suffix}", tenths / 10),
        frac => format!("{}.{frac}{suffix}", tenths / 10),
    }
}

//! Unit-aware display formatting

use crate::models::ResourceQuantity;
use crate::quantity::Unit;

const KIB: f64 = 1024.0;
const MIB: f64 = KIB * 1024.0;
const GIB: f64 = MIB * 1024.0;

/// Display text for an absent limit
pub const UNLIMITED: &str = "unlimited";

/// Format a suggestion value.
///
/// CPU renders as "1.50 cores" from 1000 millicores up, otherwise "250m".
/// Bytes render as GiB with two decimals, else MiB or KiB rounded up.
pub fn format_suggested(value: f64, unit: Unit) -> String {
    match unit {
        Unit::Millicores => {
            if value >= 1000.0 {
                format!("{:.2} cores", value / 1000.0)
            } else {
                format!("{}m", value.ceil() as i64)
            }
        }
        Unit::Bytes => {
            let gib = value / GIB;
            if gib >= 1.0 {
                return format!("{:.2} GiB", gib);
            }
            let mib = value / MIB;
            if mib >= 1.0 {
                return format!("{} MiB", mib.ceil() as i64);
            }
            format!("{} KiB", (value / KIB).ceil() as i64)
        }
    }
}

/// Format a byte count for tables ("1.50 Gi", "512 Mi", "4 Ki", "12 B")
pub fn format_bytes(bytes: i64) -> String {
    let b = bytes as f64;
    if b >= GIB {
        format!("{:.2} Gi", b / GIB)
    } else if b >= MIB {
        format!("{} Mi", bytes / MIB as i64)
    } else if b >= KIB {
        format!("{} Ki", bytes / KIB as i64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format millicores for tables ("500m" or "1.50")
pub fn format_millicores(millicores: i64) -> String {
    if millicores >= 1000 {
        format!("{:.2}", millicores as f64 / 1000.0)
    } else {
        format!("{}m", millicores)
    }
}

/// Table cell for a declared or observed quantity.
///
/// Numeric values use [`format_millicores`] or [`format_bytes`]; a
/// quantity known only by its text shows the text, a missing one "-".
pub fn format_quantity(quantity: Option<&ResourceQuantity>, unit: Unit) -> String {
    let Some(q) = quantity else {
        return "-".to_string();
    };
    let value = match unit {
        Unit::Millicores => q.millicores.map(format_millicores),
        Unit::Bytes => q.bytes.map(format_bytes),
    };
    match value {
        Some(text) => text,
        None if q.raw.is_empty() => "-".to_string(),
        None => q.raw.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_quantity_cells() {
        let cpu = ResourceQuantity::from_millicores(1500);
        assert_eq!(format_quantity(Some(&cpu), Unit::Millicores), "1.50");
        let mem = ResourceQuantity::from_bytes(512 * 1024 * 1024);
        assert_eq!(format_quantity(Some(&mem), Unit::Bytes), "512 Mi");
        let textual = ResourceQuantity {
            raw: "lots".to_string(),
            millicores: None,
            bytes: None,
        };
        assert_eq!(format_quantity(Some(&textual), Unit::Bytes), "lots");
        assert_eq!(format_quantity(None, Unit::Millicores), "-");
    }

    #[test]
    fn test_cpu_formatting() {
        assert_eq!(format_suggested(672.0, Unit::Millicores), "672m");
        assert_eq!(format_suggested(1000.0, Unit::Millicores), "1.00 cores");
        assert_eq!(format_suggested(2500.0, Unit::Millicores), "2.50 cores");
    }

    #[test]
    fn test_byte_formatting_thresholds() {
        assert_eq!(format_suggested(1600.0 * MIB, Unit::Bytes), "1.56 GiB");
        assert_eq!(format_suggested(GIB, Unit::Bytes), "1.00 GiB");
        assert_eq!(format_suggested(532.2 * MIB, Unit::Bytes), "533 MiB");
        assert_eq!(format_suggested(MIB, Unit::Bytes), "1 MiB");
        assert_eq!(format_suggested(1500.0, Unit::Bytes), "2 KiB");
        assert_eq!(format_suggested(0.0, Unit::Bytes), "0 KiB");
    }

    #[test]
    fn test_table_formatting() {
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024 / 2), "1.50 Gi");
        assert_eq!(format_bytes(512 * 1024 * 1024), "512 Mi");
        assert_eq!(format_bytes(4096), "4 Ki");
        assert_eq!(format_bytes(12), "12 B");
        assert_eq!(format_millicores(500), "500m");
        assert_eq!(format_millicores(1500), "1.50");
    }
}

use std::fmt::{self, Formatter};

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// 格式化后的文件大小, 保留两位小数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteSize {
    pub value: String,
    pub unit: &'static str,
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

/// 按照1000进制换算字节数, 最大单位为TB
pub fn format_bytes(bytes: u64) -> ByteSize {
    let mut value = bytes as f64;
    let mut unit_index = 0;
    while value >= 1000.0 && unit_index < UNITS.len() - 1 {
        value /= 1000.0;
        unit_index += 1;
    }
    ByteSize {
        value: format!("{:.2}", value),
        unit: UNITS[unit_index],
    }
}

#[cfg(test)]
mod units_test {
    use super::*;

    fn pair(bytes: u64) -> (String, &'static str) {
        let size = format_bytes(bytes);
        (size.value, size.unit)
    }

    #[test]
    fn test_format_small_values() {
        assert_eq!(pair(0), ("0.00".to_string(), "B"));
        assert_eq!(pair(999), ("999.00".to_string(), "B"));
    }

    #[test]
    fn test_format_scaled_values() {
        assert_eq!(pair(1500), ("1.50".to_string(), "KB"));
        assert_eq!(pair(1_000_000), ("1.00".to_string(), "MB"));
        assert_eq!(pair(2_500_000_000), ("2.50".to_string(), "GB"));
    }

    #[test]
    fn test_format_stops_at_terabytes() {
        assert_eq!(pair(5_000_000_000_000_000), ("5000.00".to_string(), "TB"));
    }

    #[test]
    fn test_unit_is_monotonic() {
        let mut last = 0;
        let mut bytes: u64 = 1;
        while bytes < u64::MAX / 3 {
            let size = format_bytes(bytes);
            let index = UNITS.iter().position(|u| *u == size.unit).unwrap();
            assert!(index >= last);
            if size.unit != "TB" {
                assert!((bytes as f64) / 1000f64.powi(index as i32) < 1000.0);
            }
            last = index;
            bytes = bytes * 3 + 7;
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(format_bytes(1500).to_string(), "1.50 KB");
    }
}

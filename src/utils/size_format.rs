/// 大小单位，从字节到 TB
const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// 将字节数格式化为友好显示格式 (例如: "1.95 KB")
///
/// 按 1024 逐级换算，选择使缩放值小于 1024 的最大单位；TB 为最后一级。
/// 字节显示为整数，其余单位保留两位小数。
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;

    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{:.0} {}", value, UNITS[unit])
    } else {
        format!("{:.2} {}", value, UNITS[unit])
    }
}

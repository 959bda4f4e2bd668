use crate::domain::model::{CpuSpec, GpuSpec};

/// Chipset, drives and fans.
pub const BASELINE_DRAW_WATTS: u32 = 50;

/// Headroom applied on top of the summed draw.
pub const SIZING_MARGIN: f64 = 1.5;

/// Minimum PSU wattage for a CPU/GPU pair: `ceil((cpu + gpu + 50) * 1.5)`.
pub fn required_wattage(cpu: &CpuSpec, gpu: &GpuSpec) -> u32 {
    required_wattage_for_tdp(cpu.tdp_watts, gpu.tdp_watts)
}

pub fn required_wattage_for_tdp(cpu_tdp: u32, gpu_tdp: u32) -> u32 {
    let draw = u64::from(cpu_tdp) + u64::from(gpu_tdp) + u64::from(BASELINE_DRAW_WATTS);
    // integer form of ceil(draw * 1.5)
    let sized = (draw * 3).div_ceil(2);
    u32::try_from(sized).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_wattage_reference_values() {
        assert_eq!(required_wattage_for_tdp(105, 263), 627);
        assert_eq!(required_wattage_for_tdp(0, 0), 75);
        // 65 + 0 + 50 = 115 → 172.5 → 173
        assert_eq!(required_wattage_for_tdp(65, 0), 173);
    }

    #[test]
    fn test_required_wattage_matches_float_formula() {
        for cpu in [35u32, 65, 125, 253] {
            for gpu in [0u32, 75, 200, 285, 450] {
                let expected = ((f64::from(cpu + gpu + BASELINE_DRAW_WATTS)) * SIZING_MARGIN).ceil();
                assert_eq!(f64::from(required_wattage_for_tdp(cpu, gpu)), expected);
            }
        }
    }
}

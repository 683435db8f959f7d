/// Points awarded for a match finish rank. Everything past 8th place scores
/// nothing, rank 0 marks "not applicable" (daily-total rows).
pub static PLACEMENT_POINTS: phf::Map<u32, u32> = phf::phf_map! {
    1u32 => 10,
    2u32 => 6,
    3u32 => 5,
    4u32 => 4,
    5u32 => 3,
    6u32 => 2,
    7u32 => 1,
    8u32 => 1,
};

pub fn placement_points(placement: u32) -> u32 {
    PLACEMENT_POINTS.get(&placement).copied().unwrap_or(0)
}

use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
///
/// Used for every probability and stat multiplier in the engine so that
/// a seeded session replays identically on any platform.
pub type Fixed64 = I32F32;

/// Turns are the atomic unit of game time.
pub type Turns = u32;

/// Convert an f64 to Fixed64. Use only for initialization, never in game logic.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Convert Fixed64 to f64. Use only for display/FFI, never in game logic.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

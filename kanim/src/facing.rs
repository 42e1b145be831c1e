//! Facing masks and animation name suffixes
//!
//! A clip's facing byte says which view directions it was drawn for. The
//! eight direction bits combine into a few well-known groups; a clip whose
//! mask is exactly one of the listed codes is exported with the matching
//! suffix so clips sharing a name stay distinct.

pub const FACING_RIGHT: u8 = 1 << 0;
pub const FACING_UP: u8 = 1 << 1;
pub const FACING_LEFT: u8 = 1 << 2;
pub const FACING_DOWN: u8 = 1 << 3;
pub const FACING_UPRIGHT: u8 = 1 << 4;
pub const FACING_UPLEFT: u8 = 1 << 5;
pub const FACING_DOWNRIGHT: u8 = 1 << 6;
pub const FACING_DOWNLEFT: u8 = 1 << 7;

pub const FACING_SIDE: u8 = FACING_LEFT | FACING_RIGHT;
pub const FACING_UPSIDE: u8 = FACING_UPLEFT | FACING_UPRIGHT;
pub const FACING_DOWNSIDE: u8 = FACING_DOWNLEFT | FACING_DOWNRIGHT;
pub const FACING_45S: u8 = FACING_UPLEFT | FACING_UPRIGHT | FACING_DOWNLEFT | FACING_DOWNRIGHT;
pub const FACING_90S: u8 = FACING_UP | FACING_DOWN | FACING_LEFT | FACING_RIGHT;

/// Every mask that carries a suffix, first match wins
pub const SUFFIXES: [(u8, &str); 13] = [
    (FACING_RIGHT, "_right"),
    (FACING_UP, "_up"),
    (FACING_LEFT, "_left"),
    (FACING_DOWN, "_down"),
    (FACING_UPRIGHT, "_upright"),
    (FACING_UPLEFT, "_upleft"),
    (FACING_DOWNRIGHT, "_downright"),
    (FACING_DOWNLEFT, "_downleft"),
    (FACING_SIDE, "_side"),
    (FACING_UPSIDE, "_upside"),
    (FACING_DOWNSIDE, "_downside"),
    (FACING_45S, "_45s"),
    (FACING_90S, "_90s"),
];

pub fn suffix(facing: u8) -> Option<&'static str> {
    SUFFIXES
        .iter()
        .find(|(code, _)| *code == facing)
        .map(|(_, suffix)| *suffix)
}

/// `name` plus the suffix for `facing`, or `name` unchanged
pub fn animation_name(name: &str, facing: u8) -> String {
    match suffix(facing) {
        Some(suffix) => format!("{}{}", name, suffix),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_directions() {
        assert_eq!(animation_name("walk", FACING_RIGHT), "walk_right");
        assert_eq!(animation_name("walk", FACING_UP), "walk_up");
        assert_eq!(animation_name("walk", FACING_DOWNLEFT), "walk_downleft");
    }

    #[test]
    fn test_groups() {
        assert_eq!(animation_name("idle", 0b0000_0101), "idle_side");
        assert_eq!(animation_name("idle", 0b1111_0000), "idle_45s");
        assert_eq!(animation_name("idle", 0b0000_1111), "idle_90s");
        assert_eq!(animation_name("idle", FACING_UPSIDE), "idle_upside");
        assert_eq!(animation_name("idle", FACING_DOWNSIDE), "idle_downside");
    }

    #[test]
    fn test_unmatched_mask_keeps_name() {
        assert_eq!(animation_name("run", 0xFF), "run");
        assert_eq!(animation_name("run", 0), "run");
        assert_eq!(animation_name("run", FACING_UP | FACING_RIGHT), "run");
    }

    #[test]
    fn test_codes_are_distinct() {
        for (i, (a, _)) in SUFFIXES.iter().enumerate() {
            for (b, _) in &SUFFIXES[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}

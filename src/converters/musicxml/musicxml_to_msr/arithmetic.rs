//! Pitch and duration arithmetic
//!
//! Pure functions: divisions to whole notes, note types and dots to whole
//! notes and back, and rounding of out-of-set alterations.

use num_rational::Ratio;

use crate::msr::types::{Alteration, NoteType, Rational};

/// Duration in divisions (per quarter note) as whole notes.
/// `None` when either value does not fit the rational's range.
pub fn divisions_to_whole_notes(duration: u32, divisions: u32) -> Option<Rational> {
    let denominator = divisions.max(1).checked_mul(4)?;
    Some(Rational::new(i32::try_from(duration).ok()?, i32::try_from(denominator).ok()?))
}

/// Dot multiplier: 1, 3/2, 7/4, 15/8, ...
pub fn dot_multiplier(dots: u8) -> Rational {
    let dots = dots.min(8) as u32;
    Rational::new((1 << (dots + 1)) - 1, 1 << dots)
}

/// Display duration of a graphic type with dots
pub fn display_whole_notes(note_type: NoteType, dots: u8) -> Rational {
    note_type.whole_notes() * dot_multiplier(dots)
}

/// Factor applied to members of an actual:normal tuplet (2/3 for a triplet)
pub fn tuplet_factor(actual: u32, normal: u32) -> Rational {
    match (i32::try_from(normal), i32::try_from(actual)) {
        (Ok(normal), Ok(actual)) if normal > 0 && actual > 0 => Rational::new(normal, actual),
        _ => Rational::from_integer(1),
    }
}

/// Ratio of a tuplet nested in `enclosing`, given the combined
/// `<time-modification>` of its members (9:4 inside 3:2 is 3:2)
pub fn nested_tuplet_ratio(combined: (u32, u32), enclosing: (u32, u32)) -> (u32, u32) {
    if enclosing == (1, 1) || combined == (1, 1) {
        return combined;
    }
    if [combined.0, combined.1, enclosing.0, enclosing.1].contains(&0) {
        return combined;
    }
    let actual = combined.0 as u64 * enclosing.1 as u64;
    let normal = combined.1 as u64 * enclosing.0 as u64;
    let reduced = Ratio::<u64>::new(actual, normal);
    match (u32::try_from(*reduced.numer()), u32::try_from(*reduced.denom())) {
        (Ok(actual), Ok(normal)) => (actual, normal),
        _ => combined,
    }
}

/// Sounding duration implied by type, dots and time modification
pub fn implied_sounding_whole_notes(note_type: NoteType, dots: u8, time_modification: Option<(u32, u32)>) -> Rational {
    let display = display_whole_notes(note_type, dots);
    match time_modification {
        Some((actual, normal)) => display * tuplet_factor(actual, normal),
        None => display,
    }
}

/// Inverse of `display_whole_notes`, trying up to three dots
pub fn whole_notes_to_type(value: Rational) -> Option<(NoteType, u8)> {
    (0..=3u8).find_map(|dots| {
        let base = value / dot_multiplier(dots);
        NoteType::from_whole_notes(base).map(|t| (t, dots))
    })
}

/// Closest defined alteration for an arbitrary `<alter>` value: rounded to
/// the nearest quarter tone and clamped to double flat / double sharp
pub fn closest_alteration(semitones: f32) -> Alteration {
    let quarter_tones = if semitones.is_finite() {
        (semitones * 2.0).round().clamp(-4.0, 4.0) as i32
    } else {
        0
    };
    Alteration::from_quarter_tones(quarter_tones).unwrap_or(Alteration::Natural)
}

/// Parse an `<alter>`-like value. `Err` carries the closest defined value.
pub fn parse_alteration(text: &str) -> Result<Alteration, Alteration> {
    match text.trim().parse::<f32>() {
        Ok(semitones) => Alteration::from_semitones(semitones).ok_or_else(|| closest_alteration(semitones)),
        Err(_) => Err(Alteration::Natural),
    }
}

/// Clamp an octave change to [-2, 2]. `Err` carries the clamped value.
pub fn clamp_octave_change(value: i32) -> Result<i8, i8> {
    if (-2..=2).contains(&value) {
        Ok(value as i8)
    } else {
        Err(value.clamp(-2, 2) as i8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divisions_to_whole_notes() {
        assert_eq!(divisions_to_whole_notes(4, 4), Some(Rational::new(1, 4)));
        assert_eq!(divisions_to_whole_notes(6, 4), Some(Rational::new(3, 8)));
        assert_eq!(divisions_to_whole_notes(1, 0), Some(Rational::new(1, 4)));
    }

    #[test]
    fn test_divisions_out_of_range() {
        assert_eq!(divisions_to_whole_notes(1, u32::MAX), None);
        assert_eq!(divisions_to_whole_notes(1, 1 << 30), None);
        assert_eq!(divisions_to_whole_notes(u32::MAX, 4), None);
        assert_eq!(tuplet_factor(u32::MAX, 2), Rational::from_integer(1));
    }

    #[test]
    fn test_nested_tuplet_ratio() {
        assert_eq!(nested_tuplet_ratio((9, 4), (3, 2)), (3, 2));
        assert_eq!(nested_tuplet_ratio((15, 8), (3, 2)), (5, 4));
        assert_eq!(nested_tuplet_ratio((3, 2), (1, 1)), (3, 2));
        assert_eq!(nested_tuplet_ratio((3, 0), (3, 2)), (3, 0));
    }

    #[test]
    fn test_dotted_values() {
        assert_eq!(display_whole_notes(NoteType::Half, 1), Rational::new(3, 4));
        assert_eq!(display_whole_notes(NoteType::Quarter, 2), Rational::new(7, 16));
    }

    #[test]
    fn test_triplet_eighth() {
        let sounding = implied_sounding_whole_notes(NoteType::Eighth, 0, Some((3, 2)));
        assert_eq!(sounding, Rational::new(1, 12));
    }

    #[test]
    fn test_whole_notes_to_type() {
        assert_eq!(whole_notes_to_type(Rational::new(3, 8)), Some((NoteType::Quarter, 1)));
        assert_eq!(whole_notes_to_type(Rational::new(1, 2)), Some((NoteType::Half, 0)));
        assert_eq!(whole_notes_to_type(Rational::new(1, 12)), None);
    }

    #[test]
    fn test_alteration_rounding() {
        assert_eq!(parse_alteration("-1"), Ok(Alteration::Flat));
        assert_eq!(parse_alteration("0.5"), Ok(Alteration::SemiSharp));
        assert_eq!(parse_alteration("0.3"), Err(Alteration::SemiSharp));
        assert_eq!(parse_alteration("3"), Err(Alteration::DoubleSharp));
        assert_eq!(parse_alteration("x"), Err(Alteration::Natural));
    }

    #[test]
    fn test_octave_change_clamp() {
        assert_eq!(clamp_octave_change(1), Ok(1));
        assert_eq!(clamp_octave_change(-5), Err(-2));
    }
}

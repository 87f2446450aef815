//! Lazy staff and voice creation
//!
//! A voice is identified by its number within the part. It lives in the
//! staff where it first appeared and is displayed by whichever staff the
//! latest note asked for; each change of displaying staff leaves a marker.

use crate::msr::score::{Part, Staff};
use crate::msr::voice::{MeasureElement, Voice};

/// Identity of a voice across the whole score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceKey {
    pub part: usize,
    pub voice: u32,
}

/// The staff numbered `number`, created with the part's key and time if absent
pub fn staff_for(part: &mut Part, number: u32) -> &mut Staff {
    let key = part.key.clone();
    let time = part.time.clone();
    part.staves.entry(number).or_insert_with(|| {
        log::debug!("creating staff {}", number);
        let mut staff = Staff::new(number);
        staff.key = key;
        staff.time = time;
        staff
    })
}

/// The voice numbered `voice`, created in staff `staff` if absent. Where the
/// voice is displayed is left untouched.
pub fn voice_at(part: &mut Part, staff: u32, voice: u32, input_line: usize) -> &mut Voice {
    staff_for(part, staff);

    let home = *part.voice_homes.entry(voice).or_insert(staff);
    let measure_number = part.measure_number.clone();
    let home_staff = staff_for(part, home);
    let (clef, key, time) = (home_staff.clef.clone(), home_staff.key.clone(), home_staff.time.clone());

    home_staff.voices.entry(voice).or_insert_with(|| {
        log::debug!("creating voice {} in staff {}", voice, home);
        let mut created = Voice::new(voice, home);
        created.clef = clef;
        created.key = key;
        created.time = time;
        if !measure_number.is_empty() {
            created.create_measure(&measure_number, input_line);
        }
        created
    })
}

/// The voice numbered `voice`, displayed by staff `staff`
pub fn voice_for(part: &mut Part, staff: u32, voice: u32, input_line: usize) -> &mut Voice {
    let voice_ref = voice_at(part, staff, voice, input_line);

    if voice_ref.displaying_staff != staff {
        log::debug!(
            "voice {} moves from staff {} to staff {}",
            voice,
            voice_ref.displaying_staff,
            staff
        );
        voice_ref.append(MeasureElement::VoiceStaffChange {
            from_staff: voice_ref.displaying_staff,
            to_staff: staff,
            input_line,
        });
        voice_ref.displaying_staff = staff;
    }
    voice_ref
}

/// A voice for an element that names a staff but no voice: the lowest voice
/// living in that staff, else the lowest one displayed there, else voice 1.
/// No voice is moved.
pub fn voice_on_staff(part: &mut Part, staff: u32, input_line: usize) -> &mut Voice {
    let living = part
        .staff(staff)
        .and_then(|s| s.voices.keys().next().copied());
    let displayed = || {
        part.voices()
            .filter(|v| v.displaying_staff == staff)
            .map(|v| v.number)
            .min()
    };
    let number = living.or_else(displayed).unwrap_or(1);
    voice_at(part, staff, number, input_line)
}

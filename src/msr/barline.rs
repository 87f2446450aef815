//! Barlines and their repeat/ending classification

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BarlineLocation {
    Left,
    Middle,
    Right,
}

impl BarlineLocation {
    pub fn from_musicxml(s: &str) -> Option<Self> {
        match s {
            "left" => Some(BarlineLocation::Left),
            "middle" => Some(BarlineLocation::Middle),
            "right" => Some(BarlineLocation::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BarlineStyle {
    Regular,
    Dotted,
    Dashed,
    Heavy,
    LightLight,
    LightHeavy,
    HeavyLight,
    HeavyHeavy,
    Tick,
    Short,
    None,
}

impl BarlineStyle {
    pub fn from_musicxml(s: &str) -> Option<Self> {
        match s.trim() {
            "regular" => Some(BarlineStyle::Regular),
            "dotted" => Some(BarlineStyle::Dotted),
            "dashed" => Some(BarlineStyle::Dashed),
            "heavy" => Some(BarlineStyle::Heavy),
            "light-light" => Some(BarlineStyle::LightLight),
            "light-heavy" => Some(BarlineStyle::LightHeavy),
            "heavy-light" => Some(BarlineStyle::HeavyLight),
            "heavy-heavy" => Some(BarlineStyle::HeavyHeavy),
            "tick" => Some(BarlineStyle::Tick),
            "short" => Some(BarlineStyle::Short),
            "none" => Some(BarlineStyle::None),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EndingType {
    Start,
    Stop,
    Discontinue,
    None,
}

impl EndingType {
    pub fn from_musicxml(s: &str) -> Option<Self> {
        match s {
            "start" => Some(EndingType::Start),
            "stop" => Some(EndingType::Stop),
            "discontinue" => Some(EndingType::Discontinue),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RepeatDirection {
    Forward,
    Backward,
    None,
}

impl RepeatDirection {
    pub fn from_musicxml(s: &str) -> Option<Self> {
        match s {
            "forward" => Some(RepeatDirection::Forward),
            "backward" => Some(RepeatDirection::Backward),
            _ => None,
        }
    }
}

/// Outcome of classifying a barline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BarlineCategory {
    HookedEndingStart,
    RepeatStart,
    HooklessEndingStart,
    HookedEndingEnd,
    RepeatEnd,
    HooklessEndingEnd,
    Standalone(BarlineStyle),
}

impl BarlineCategory {
    /// Decision table over the four barline inputs, first match wins
    pub fn classify(
        location: BarlineLocation,
        style: BarlineStyle,
        ending: EndingType,
        repeat: RepeatDirection,
    ) -> Self {
        use BarlineLocation::{Left, Right};

        match (location, ending, repeat) {
            (Left, EndingType::Start, RepeatDirection::Forward) => BarlineCategory::HookedEndingStart,
            (Left, _, RepeatDirection::Forward) => BarlineCategory::RepeatStart,
            (Left, EndingType::Start, _) => BarlineCategory::HooklessEndingStart,
            (Right, EndingType::Stop, RepeatDirection::Backward) => BarlineCategory::HookedEndingEnd,
            (Right, _, RepeatDirection::Backward) => BarlineCategory::RepeatEnd,
            (Right, EndingType::Discontinue, _) => BarlineCategory::HooklessEndingEnd,
            _ => BarlineCategory::Standalone(style),
        }
    }
}

/// Raw barline inputs as read from `<barline>` and its children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarlineSpec {
    pub location: BarlineLocation,
    pub style: BarlineStyle,
    pub ending_type: EndingType,
    pub ending_numbers: String,
    pub repeat_direction: RepeatDirection,
    pub repeat_times: Option<u32>,
    pub segno: bool,
    pub coda: bool,
    pub fermata: bool,
    pub input_line: usize,
}

impl BarlineSpec {
    pub fn new(input_line: usize) -> Self {
        Self {
            location: BarlineLocation::Right,
            style: BarlineStyle::None,
            ending_type: EndingType::None,
            ending_numbers: String::new(),
            repeat_direction: RepeatDirection::None,
            repeat_times: None,
            segno: false,
            coda: false,
            fermata: false,
            input_line,
        }
    }
}

/// A classified barline; fields are private so it cannot change afterwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Barline {
    location: BarlineLocation,
    style: BarlineStyle,
    ending_type: EndingType,
    ending_numbers: Vec<u32>,
    repeat_direction: RepeatDirection,
    repeat_times: Option<u32>,
    segno: bool,
    coda: bool,
    fermata: bool,
    category: BarlineCategory,
    input_line: usize,
}

impl Barline {
    pub fn new(spec: BarlineSpec) -> Self {
        let category = BarlineCategory::classify(
            spec.location,
            spec.style,
            spec.ending_type,
            spec.repeat_direction,
        );
        Self {
            location: spec.location,
            style: spec.style,
            ending_type: spec.ending_type,
            ending_numbers: parse_ending_numbers(&spec.ending_numbers),
            repeat_direction: spec.repeat_direction,
            repeat_times: spec.repeat_times,
            segno: spec.segno,
            coda: spec.coda,
            fermata: spec.fermata,
            category,
            input_line: spec.input_line,
        }
    }

    pub fn location(&self) -> BarlineLocation {
        self.location
    }

    pub fn style(&self) -> BarlineStyle {
        self.style
    }

    pub fn ending_type(&self) -> EndingType {
        self.ending_type
    }

    pub fn ending_numbers(&self) -> &[u32] {
        &self.ending_numbers
    }

    pub fn repeat_direction(&self) -> RepeatDirection {
        self.repeat_direction
    }

    pub fn repeat_times(&self) -> Option<u32> {
        self.repeat_times
    }

    pub fn has_segno(&self) -> bool {
        self.segno
    }

    pub fn has_coda(&self) -> bool {
        self.coda
    }

    pub fn has_fermata(&self) -> bool {
        self.fermata
    }

    pub fn category(&self) -> BarlineCategory {
        self.category
    }

    pub fn input_line(&self) -> usize {
        self.input_line
    }
}

/// "1, 2" or "1 2" to [1, 2]; anything unparsable is skipped
fn parse_ending_numbers(s: &str) -> Vec<u32> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCATIONS: [BarlineLocation; 3] = [
        BarlineLocation::Left,
        BarlineLocation::Middle,
        BarlineLocation::Right,
    ];
    const ENDINGS: [EndingType; 4] = [
        EndingType::Start,
        EndingType::Stop,
        EndingType::Discontinue,
        EndingType::None,
    ];
    const REPEATS: [RepeatDirection; 3] = [
        RepeatDirection::Forward,
        RepeatDirection::Backward,
        RepeatDirection::None,
    ];

    #[test]
    fn test_classification_is_deterministic() {
        for location in LOCATIONS {
            for ending in ENDINGS {
                for repeat in REPEATS {
                    let first = BarlineCategory::classify(location, BarlineStyle::LightHeavy, ending, repeat);
                    let second = BarlineCategory::classify(location, BarlineStyle::LightHeavy, ending, repeat);
                    assert_eq!(first, second, "{:?} {:?} {:?}", location, ending, repeat);
                }
            }
        }
    }

    #[test]
    fn test_priority_order() {
        use BarlineLocation::*;
        let style = BarlineStyle::HeavyLight;

        assert_eq!(
            BarlineCategory::classify(Left, style, EndingType::Start, RepeatDirection::Forward),
            BarlineCategory::HookedEndingStart
        );
        assert_eq!(
            BarlineCategory::classify(Left, style, EndingType::None, RepeatDirection::Forward),
            BarlineCategory::RepeatStart
        );
        assert_eq!(
            BarlineCategory::classify(Left, style, EndingType::Start, RepeatDirection::None),
            BarlineCategory::HooklessEndingStart
        );
        assert_eq!(
            BarlineCategory::classify(Right, style, EndingType::Stop, RepeatDirection::Backward),
            BarlineCategory::HookedEndingEnd
        );
        assert_eq!(
            BarlineCategory::classify(Right, style, EndingType::None, RepeatDirection::Backward),
            BarlineCategory::RepeatEnd
        );
        assert_eq!(
            BarlineCategory::classify(Right, style, EndingType::Discontinue, RepeatDirection::None),
            BarlineCategory::HooklessEndingEnd
        );
        assert_eq!(
            BarlineCategory::classify(Right, style, EndingType::Stop, RepeatDirection::None),
            BarlineCategory::Standalone(style)
        );
        assert_eq!(
            BarlineCategory::classify(Middle, BarlineStyle::Dashed, EndingType::None, RepeatDirection::Backward),
            BarlineCategory::Standalone(BarlineStyle::Dashed)
        );
    }

    #[test]
    fn test_ending_numbers() {
        let mut spec = BarlineSpec::new(3);
        spec.location = BarlineLocation::Left;
        spec.ending_type = EndingType::Start;
        spec.ending_numbers = "1, 2".to_string();
        let barline = Barline::new(spec);
        assert_eq!(barline.ending_numbers(), &[1, 2]);
        assert_eq!(barline.category(), BarlineCategory::HooklessEndingStart);
    }
}

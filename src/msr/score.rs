//! Score, part groups, parts and staves

use super::attributes::{Clef, Key, Time, Transpose};
use super::types::{PitchNaming, Rational};
use super::voice::Voice;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Index of a part in the score's part arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PartIndex(pub usize);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Identification {
    pub work_number: Option<String>,
    pub work_title: Option<String>,
    pub movement_number: Option<String>,
    pub movement_title: Option<String>,
    /// (type, name), e.g. ("composer", "J. S. Bach")
    pub creators: Vec<(String, String)>,
    pub rights: Vec<String>,
    pub software: Vec<String>,
    pub encoding_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageGeometry {
    pub millimeters: Option<f32>,
    pub tenths: Option<f32>,
    pub page_height: Option<f32>,
    pub page_width: Option<f32>,
    pub left_margin: Option<f32>,
    pub right_margin: Option<f32>,
    pub top_margin: Option<f32>,
    pub bottom_margin: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreditWords {
    pub text: String,
    pub default_x: Option<f32>,
    pub default_y: Option<f32>,
    pub font_size: Option<String>,
    pub justify: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Credit {
    pub page: u32,
    pub words: Vec<CreditWords>,
    pub input_line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PartGroupSymbol {
    None,
    Brace,
    Bracket,
    Line,
    Square,
}

impl PartGroupSymbol {
    pub fn from_musicxml(s: &str) -> Option<Self> {
        match s.trim() {
            "none" => Some(PartGroupSymbol::None),
            "brace" => Some(PartGroupSymbol::Brace),
            "bracket" => Some(PartGroupSymbol::Bracket),
            "line" => Some(PartGroupSymbol::Line),
            "square" => Some(PartGroupSymbol::Square),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PartGroupMember {
    Part(PartIndex),
    Group(PartGroup),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartGroup {
    pub number: u32,
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub symbol: PartGroupSymbol,
    pub barline: bool,
    pub display_x: Option<f32>,
    /// Number of the enclosing group, none at top level
    pub parent: Option<u32>,
    pub implicit: bool,
    pub members: Vec<PartGroupMember>,
    pub input_line: usize,
}

impl PartGroup {
    /// Number reserved for the synthetic top-level group
    pub const IMPLICIT_NUMBER: u32 = u32::MAX;

    pub fn implicit(input_line: usize) -> Self {
        Self {
            number: Self::IMPLICIT_NUMBER,
            name: Some("Implicit".to_string()),
            abbreviation: None,
            symbol: PartGroupSymbol::None,
            barline: false,
            display_x: None,
            parent: None,
            implicit: true,
            members: Vec::new(),
            input_line,
        }
    }

    pub fn sub_groups(&self) -> impl Iterator<Item = &PartGroup> {
        self.members.iter().filter_map(|m| match m {
            PartGroupMember::Group(group) => Some(group),
            _ => None,
        })
    }

    pub fn part_indices(&self) -> impl Iterator<Item = PartIndex> + '_ {
        self.members.iter().filter_map(|m| match m {
            PartGroupMember::Part(index) => Some(*index),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Staff {
    pub number: u32,
    pub voices: BTreeMap<u32, Voice>,
    pub clef: Option<Clef>,
    pub key: Option<Key>,
    pub time: Option<Time>,
}

impl Staff {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            voices: BTreeMap::new(),
            clef: None,
            key: None,
            time: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Part {
    pub id: String,
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub staves: BTreeMap<u32, Staff>,
    /// Voice number to the staff that owns the voice
    pub voice_homes: HashMap<u32, u32>,
    pub divisions: u32,
    pub key: Option<Key>,
    pub time: Option<Time>,
    pub transpose: Option<Transpose>,
    pub measure_number: String,
    /// Position in the current measure, moved by notes, backup and forward
    pub position: Rational,
    /// `<measure>` elements started so far
    #[serde(skip)]
    pub measures_started: usize,
    pub input_line: usize,
}

impl Part {
    pub fn new(id: &str, input_line: usize) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            abbreviation: None,
            staves: BTreeMap::new(),
            voice_homes: HashMap::new(),
            divisions: 1,
            key: None,
            time: None,
            transpose: None,
            measure_number: String::new(),
            position: Rational::from_integer(0),
            measures_started: 0,
            input_line,
        }
    }

    pub fn staff(&self, number: u32) -> Option<&Staff> {
        self.staves.get(&number)
    }

    /// Look a voice up by its number, wherever it is homed
    pub fn voice(&self, number: u32) -> Option<&Voice> {
        let home = self.voice_homes.get(&number)?;
        self.staves.get(home)?.voices.get(&number)
    }

    pub fn voice_mut(&mut self, number: u32) -> Option<&mut Voice> {
        let home = *self.voice_homes.get(&number)?;
        self.staves.get_mut(&home)?.voices.get_mut(&number)
    }

    pub fn voices(&self) -> impl Iterator<Item = &Voice> {
        self.staves.values().flat_map(|staff| staff.voices.values())
    }

    pub fn voices_mut(&mut self) -> impl Iterator<Item = &mut Voice> {
        self.staves.values_mut().flat_map(|staff| staff.voices.values_mut())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Score {
    pub identification: Identification,
    pub page_geometry: Option<PageGeometry>,
    pub credits: Vec<Credit>,
    pub pitch_naming: PitchNaming,
    pub part_groups: Vec<PartGroup>,
    pub parts: Vec<Part>,
}

impl Score {
    pub fn new(pitch_naming: PitchNaming) -> Self {
        Self {
            pitch_naming,
            ..Default::default()
        }
    }

    pub fn part(&self, index: PartIndex) -> &Part {
        &self.parts[index.0]
    }

    pub fn part_by_id(&self, id: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.id == id)
    }

    /// Part indices in group order, depth first
    pub fn part_order(&self) -> Vec<PartIndex> {
        fn walk(group: &PartGroup, out: &mut Vec<PartIndex>) {
            for member in &group.members {
                match member {
                    PartGroupMember::Part(index) => out.push(*index),
                    PartGroupMember::Group(sub) => walk(sub, out),
                }
            }
        }

        let mut out = Vec::new();
        for group in &self.part_groups {
            walk(group, &mut out);
        }
        out
    }
}

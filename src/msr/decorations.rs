//! Note decorations
//!
//! Everything a note can carry besides its pitch and duration. A chord
//! receives copies of its members' decorations when it is built.

use super::types::{Placement, StartStop};
use serde::Serialize;

/// Articulation kinds (`<articulations>` children, plus fermata and arpeggiate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ArticulationKind {
    Accent,
    BreathMark,
    Caesura,
    Spiccato,
    Staccato,
    Staccatissimo,
    Stress,
    Unstress,
    DetachedLegato,
    StrongAccent,
    Tenuto,
    Fermata,
    Arpeggiato,
    Doit,
    Falloff,
    Plop,
    Scoop,
}

impl ArticulationKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "accent" => Some(ArticulationKind::Accent),
            "breath-mark" => Some(ArticulationKind::BreathMark),
            "caesura" => Some(ArticulationKind::Caesura),
            "spiccato" => Some(ArticulationKind::Spiccato),
            "staccato" => Some(ArticulationKind::Staccato),
            "staccatissimo" => Some(ArticulationKind::Staccatissimo),
            "stress" => Some(ArticulationKind::Stress),
            "unstress" => Some(ArticulationKind::Unstress),
            "detached-legato" => Some(ArticulationKind::DetachedLegato),
            "strong-accent" => Some(ArticulationKind::StrongAccent),
            "tenuto" => Some(ArticulationKind::Tenuto),
            "fermata" => Some(ArticulationKind::Fermata),
            "arpeggiate" => Some(ArticulationKind::Arpeggiato),
            "doit" => Some(ArticulationKind::Doit),
            "falloff" => Some(ArticulationKind::Falloff),
            "plop" => Some(ArticulationKind::Plop),
            "scoop" => Some(ArticulationKind::Scoop),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Articulation {
    pub kind: ArticulationKind,
    pub placement: Option<Placement>,
    pub input_line: usize,
}

/// Technical indications (`<technical>` children)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TechnicalKind {
    UpBow,
    DownBow,
    Harmonic,
    OpenString,
    ThumbPosition,
    Fingering,
    Pluck,
    DoubleTongue,
    TripleTongue,
    Stopped,
    SnapPizzicato,
    Fret,
    String,
    HammerOn,
    PullOff,
    Bend,
    Tap,
    Heel,
    Toe,
    Fingernails,
    Hole,
    Arrow,
    Handbell,
    OtherTechnical,
}

impl TechnicalKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "up-bow" => Some(TechnicalKind::UpBow),
            "down-bow" => Some(TechnicalKind::DownBow),
            "harmonic" => Some(TechnicalKind::Harmonic),
            "open-string" => Some(TechnicalKind::OpenString),
            "thumb-position" => Some(TechnicalKind::ThumbPosition),
            "fingering" => Some(TechnicalKind::Fingering),
            "pluck" => Some(TechnicalKind::Pluck),
            "double-tongue" => Some(TechnicalKind::DoubleTongue),
            "triple-tongue" => Some(TechnicalKind::TripleTongue),
            "stopped" => Some(TechnicalKind::Stopped),
            "snap-pizzicato" => Some(TechnicalKind::SnapPizzicato),
            "fret" => Some(TechnicalKind::Fret),
            "string" => Some(TechnicalKind::String),
            "hammer-on" => Some(TechnicalKind::HammerOn),
            "pull-off" => Some(TechnicalKind::PullOff),
            "bend" => Some(TechnicalKind::Bend),
            "tap" => Some(TechnicalKind::Tap),
            "heel" => Some(TechnicalKind::Heel),
            "toe" => Some(TechnicalKind::Toe),
            "fingernails" => Some(TechnicalKind::Fingernails),
            "hole" => Some(TechnicalKind::Hole),
            "arrow" => Some(TechnicalKind::Arrow),
            "handbell" => Some(TechnicalKind::Handbell),
            "other-technical" => Some(TechnicalKind::OtherTechnical),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Technical {
    pub kind: TechnicalKind,
    /// Text value for fingering, fret, string and the like
    pub value: Option<String>,
    pub placement: Option<Placement>,
    pub input_line: usize,
}

/// Ornaments (`<ornaments>` children, tremolo excepted)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OrnamentKind {
    TrillMark,
    Turn,
    InvertedTurn,
    DelayedTurn,
    DelayedInvertedTurn,
    VerticalTurn,
    Shake,
    WavyLine,
    Mordent,
    InvertedMordent,
    Schleifer,
    Haydn,
    AccidentalMark,
    OtherOrnament,
}

impl OrnamentKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "trill-mark" => Some(OrnamentKind::TrillMark),
            "turn" => Some(OrnamentKind::Turn),
            "inverted-turn" => Some(OrnamentKind::InvertedTurn),
            "delayed-turn" => Some(OrnamentKind::DelayedTurn),
            "delayed-inverted-turn" => Some(OrnamentKind::DelayedInvertedTurn),
            "vertical-turn" => Some(OrnamentKind::VerticalTurn),
            "shake" => Some(OrnamentKind::Shake),
            "wavy-line" => Some(OrnamentKind::WavyLine),
            "mordent" => Some(OrnamentKind::Mordent),
            "inverted-mordent" => Some(OrnamentKind::InvertedMordent),
            "schleifer" => Some(OrnamentKind::Schleifer),
            "haydn" => Some(OrnamentKind::Haydn),
            "accidental-mark" => Some(OrnamentKind::AccidentalMark),
            "other-ornament" => Some(OrnamentKind::OtherOrnament),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ornament {
    pub kind: OrnamentKind,
    pub placement: Option<Placement>,
    pub input_line: usize,
}

/// Single-note tremolo, `<tremolo type="single">`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SingleTremolo {
    pub marks: u8,
    pub placement: Option<Placement>,
}

/// Dynamic markings carried by `<dynamics>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DynamicsKind {
    F,
    FF,
    FFF,
    FFFF,
    FFFFF,
    FFFFFF,
    P,
    PP,
    PPP,
    PPPP,
    PPPPP,
    PPPPPP,
    MF,
    MP,
    FP,
    FZ,
    RF,
    SF,
    RFZ,
    SFZ,
    SFP,
    SFPP,
    SFFZ,
}

impl DynamicsKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "f" => Some(DynamicsKind::F),
            "ff" => Some(DynamicsKind::FF),
            "fff" => Some(DynamicsKind::FFF),
            "ffff" => Some(DynamicsKind::FFFF),
            "fffff" => Some(DynamicsKind::FFFFF),
            "ffffff" => Some(DynamicsKind::FFFFFF),
            "p" => Some(DynamicsKind::P),
            "pp" => Some(DynamicsKind::PP),
            "ppp" => Some(DynamicsKind::PPP),
            "pppp" => Some(DynamicsKind::PPPP),
            "ppppp" => Some(DynamicsKind::PPPPP),
            "pppppp" => Some(DynamicsKind::PPPPPP),
            "mf" => Some(DynamicsKind::MF),
            "mp" => Some(DynamicsKind::MP),
            "fp" => Some(DynamicsKind::FP),
            "fz" => Some(DynamicsKind::FZ),
            "rf" => Some(DynamicsKind::RF),
            "sf" => Some(DynamicsKind::SF),
            "rfz" => Some(DynamicsKind::RFZ),
            "sfz" => Some(DynamicsKind::SFZ),
            "sfp" => Some(DynamicsKind::SFP),
            "sfpp" => Some(DynamicsKind::SFPP),
            "sffz" => Some(DynamicsKind::SFFZ),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dynamics {
    pub kind: DynamicsKind,
    pub placement: Option<Placement>,
    pub input_line: usize,
}

/// `<other-dynamics>` free text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtherDynamics {
    pub text: String,
    pub placement: Option<Placement>,
    pub input_line: usize,
}

/// `<words>` direction text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Words {
    pub text: String,
    pub placement: Option<Placement>,
    pub font_style: Option<String>,
    pub font_size: Option<String>,
    pub font_weight: Option<String>,
    pub xml_lang: Option<String>,
    pub input_line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BeamKind {
    Begin,
    Continue,
    End,
    ForwardHook,
    BackwardHook,
}

impl BeamKind {
    pub fn from_musicxml(s: &str) -> Option<Self> {
        match s.trim() {
            "begin" => Some(BeamKind::Begin),
            "continue" => Some(BeamKind::Continue),
            "end" => Some(BeamKind::End),
            "forward hook" => Some(BeamKind::ForwardHook),
            "backward hook" => Some(BeamKind::BackwardHook),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Beam {
    pub number: u32,
    pub kind: BeamKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slur {
    pub number: u32,
    pub kind: StartStop,
    pub placement: Option<Placement>,
    pub line_type: Option<String>,
    pub input_line: usize,
}

/// Ligature, from a `<bracket>` direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ligature {
    pub number: u32,
    pub kind: StartStop,
    pub line_end: Option<String>,
    pub placement: Option<Placement>,
    pub input_line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WedgeKind {
    Crescendo,
    Diminuendo,
    Continue,
    Stop,
}

impl WedgeKind {
    pub fn from_musicxml(s: &str) -> Option<Self> {
        match s {
            "crescendo" => Some(WedgeKind::Crescendo),
            "diminuendo" => Some(WedgeKind::Diminuendo),
            "continue" => Some(WedgeKind::Continue),
            "stop" => Some(WedgeKind::Stop),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wedge {
    pub kind: WedgeKind,
    pub number: u32,
    pub placement: Option<Placement>,
    pub input_line: usize,
}

/// All decorations owned by a note or a chord
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Decorations {
    pub articulations: Vec<Articulation>,
    pub technicals: Vec<Technical>,
    pub ornaments: Vec<Ornament>,
    pub single_tremolo: Option<SingleTremolo>,
    pub dynamics: Vec<Dynamics>,
    pub other_dynamics: Vec<OtherDynamics>,
    pub words: Vec<Words>,
    pub beams: Vec<Beam>,
    pub slurs: Vec<Slur>,
    pub ligatures: Vec<Ligature>,
    pub wedges: Vec<Wedge>,
}

impl Decorations {
    pub fn is_empty(&self) -> bool {
        self.articulations.is_empty()
            && self.technicals.is_empty()
            && self.ornaments.is_empty()
            && self.single_tremolo.is_none()
            && self.dynamics.is_empty()
            && self.other_dynamics.is_empty()
            && self.words.is_empty()
            && self.beams.is_empty()
            && self.slurs.is_empty()
            && self.ligatures.is_empty()
            && self.wedges.is_empty()
    }

    /// Copy another set of decorations onto this one, keeping order
    pub fn absorb(&mut self, other: &Decorations) {
        self.articulations.extend(other.articulations.iter().cloned());
        self.technicals.extend(other.technicals.iter().cloned());
        self.ornaments.extend(other.ornaments.iter().cloned());
        if other.single_tremolo.is_some() {
            self.single_tremolo = other.single_tremolo;
        }
        self.dynamics.extend(other.dynamics.iter().cloned());
        self.other_dynamics.extend(other.other_dynamics.iter().cloned());
        self.words.extend(other.words.iter().cloned());
        // beams are shared by all chord members: keep the first note's
        if self.beams.is_empty() {
            self.beams.extend(other.beams.iter().copied());
        }
        self.slurs.extend(other.slurs.iter().cloned());
        self.ligatures.extend(other.ligatures.iter().cloned());
        self.wedges.extend(other.wedges.iter().cloned());
    }
}

//! Typed MusicXML elements as delivered to the translator
//!
//! The set of handled tags is closed: each maps to one `ElementKind`
//! variant, everything else is `Other` and is ignored.

use crate::msr::decorations::{ArticulationKind, DynamicsKind, OrnamentKind, TechnicalKind};
use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    // score header
    ScorePartwise,
    Work,
    WorkNumber,
    WorkTitle,
    MovementNumber,
    MovementTitle,
    Identification,
    Creator,
    Rights,
    Encoding,
    Software,
    EncodingDate,
    Defaults,
    Scaling,
    Millimeters,
    Tenths,
    PageLayout,
    PageHeight,
    PageWidth,
    PageMargins,
    LeftMargin,
    RightMargin,
    TopMargin,
    BottomMargin,
    Credit,
    CreditWords,

    // part list
    PartList,
    PartGroup,
    GroupName,
    GroupAbbreviation,
    GroupSymbol,
    GroupBarline,
    ScorePart,
    PartName,
    PartAbbreviation,

    // parts and measures
    Part,
    Measure,
    Print,
    Backup,
    Forward,
    Duration,
    Voice,
    Staff,

    // attributes
    Attributes,
    Divisions,
    Key,
    Cancel,
    Fifths,
    Mode,
    KeyStep,
    KeyAlter,
    Time,
    Beats,
    BeatType,
    SenzaMisura,
    Staves,
    Clef,
    Sign,
    Line,
    ClefOctaveChange,
    Transpose,
    Diatonic,
    Chromatic,
    OctaveChange,
    Double,

    // barlines
    Barline,
    BarStyle,
    Repeat,
    Ending,
    Segno,
    Coda,
    Fermata,

    // directions
    Direction,
    DirectionType,
    Words,
    Dynamics,
    Dynamic(DynamicsKind),
    OtherDynamics,
    Wedge,
    Bracket,
    Metronome,
    BeatUnit,
    BeatUnitDot,
    PerMinute,
    Sound,

    // notes
    Note,
    Grace,
    Cue,
    Chord,
    Pitch,
    Step,
    Alter,
    Octave,
    Unpitched,
    DisplayStep,
    DisplayOctave,
    Rest,
    Tie,
    Type,
    Dot,
    Accidental,
    TimeModification,
    ActualNotes,
    NormalNotes,
    NormalType,
    Stem,
    Notehead,
    Beam,
    Notations,
    Tied,
    Slur,
    Tuplet,
    TupletActual,
    TupletNormal,
    TupletNumber,
    Articulations,
    Articulation(ArticulationKind),
    Technical,
    TechnicalMark(TechnicalKind),
    Ornaments,
    Ornament(OrnamentKind),
    Tremolo,

    // lyrics
    Lyric,
    Syllabic,
    Text,
    Elision,
    Extend,
    Humming,
    Laughing,

    // harmony and figured bass
    Harmony,
    Root,
    RootStep,
    RootAlter,
    Kind,
    Inversion,
    Bass,
    BassStep,
    BassAlter,
    Degree,
    DegreeValue,
    DegreeAlter,
    DegreeType,
    FiguredBass,
    Figure,
    Prefix,
    FigureNumber,
    Suffix,

    Other,
}

static TAGS: Lazy<HashMap<&'static str, ElementKind>> = Lazy::new(|| {
    use ElementKind::*;
    HashMap::from([
        ("score-partwise", ScorePartwise),
        ("work", Work),
        ("work-number", WorkNumber),
        ("work-title", WorkTitle),
        ("movement-number", MovementNumber),
        ("movement-title", MovementTitle),
        ("identification", Identification),
        ("creator", Creator),
        ("rights", Rights),
        ("encoding", Encoding),
        ("software", Software),
        ("encoding-date", EncodingDate),
        ("defaults", Defaults),
        ("scaling", Scaling),
        ("millimeters", Millimeters),
        ("tenths", Tenths),
        ("page-layout", PageLayout),
        ("page-height", PageHeight),
        ("page-width", PageWidth),
        ("page-margins", PageMargins),
        ("left-margin", LeftMargin),
        ("right-margin", RightMargin),
        ("top-margin", TopMargin),
        ("bottom-margin", BottomMargin),
        ("credit", Credit),
        ("credit-words", CreditWords),
        ("part-list", PartList),
        ("part-group", PartGroup),
        ("group-name", GroupName),
        ("group-abbreviation", GroupAbbreviation),
        ("group-symbol", GroupSymbol),
        ("group-barline", GroupBarline),
        ("score-part", ScorePart),
        ("part-name", PartName),
        ("part-abbreviation", PartAbbreviation),
        ("part", Part),
        ("measure", Measure),
        ("print", Print),
        ("backup", Backup),
        ("forward", Forward),
        ("duration", Duration),
        ("voice", Voice),
        ("staff", Staff),
        ("attributes", Attributes),
        ("divisions", Divisions),
        ("key", Key),
        ("cancel", Cancel),
        ("fifths", Fifths),
        ("mode", Mode),
        ("key-step", KeyStep),
        ("key-alter", KeyAlter),
        ("time", Time),
        ("beats", Beats),
        ("beat-type", BeatType),
        ("senza-misura", SenzaMisura),
        ("staves", Staves),
        ("clef", Clef),
        ("sign", Sign),
        ("line", Line),
        ("clef-octave-change", ClefOctaveChange),
        ("transpose", Transpose),
        ("diatonic", Diatonic),
        ("chromatic", Chromatic),
        ("octave-change", OctaveChange),
        ("double", Double),
        ("barline", Barline),
        ("bar-style", BarStyle),
        ("repeat", Repeat),
        ("ending", Ending),
        ("segno", Segno),
        ("coda", Coda),
        ("fermata", Fermata),
        ("direction", Direction),
        ("direction-type", DirectionType),
        ("words", Words),
        ("dynamics", Dynamics),
        ("other-dynamics", OtherDynamics),
        ("wedge", Wedge),
        ("bracket", Bracket),
        ("metronome", Metronome),
        ("beat-unit", BeatUnit),
        ("beat-unit-dot", BeatUnitDot),
        ("per-minute", PerMinute),
        ("sound", Sound),
        ("note", Note),
        ("grace", Grace),
        ("cue", Cue),
        ("chord", Chord),
        ("pitch", Pitch),
        ("step", Step),
        ("alter", Alter),
        ("octave", Octave),
        ("unpitched", Unpitched),
        ("display-step", DisplayStep),
        ("display-octave", DisplayOctave),
        ("rest", Rest),
        ("tie", Tie),
        ("type", Type),
        ("dot", Dot),
        ("accidental", Accidental),
        ("time-modification", TimeModification),
        ("actual-notes", ActualNotes),
        ("normal-notes", NormalNotes),
        ("normal-type", NormalType),
        ("stem", Stem),
        ("notehead", Notehead),
        ("beam", Beam),
        ("notations", Notations),
        ("tied", Tied),
        ("slur", Slur),
        ("tuplet", Tuplet),
        ("tuplet-actual", TupletActual),
        ("tuplet-normal", TupletNormal),
        ("tuplet-number", TupletNumber),
        ("articulations", Articulations),
        ("technical", Technical),
        ("ornaments", Ornaments),
        ("tremolo", Tremolo),
        ("lyric", Lyric),
        ("syllabic", Syllabic),
        ("text", Text),
        ("elision", Elision),
        ("extend", Extend),
        ("humming", Humming),
        ("laughing", Laughing),
        ("harmony", Harmony),
        ("root", Root),
        ("root-step", RootStep),
        ("root-alter", RootAlter),
        ("kind", Kind),
        ("inversion", Inversion),
        ("bass", Bass),
        ("bass-step", BassStep),
        ("bass-alter", BassAlter),
        ("degree", Degree),
        ("degree-value", DegreeValue),
        ("degree-alter", DegreeAlter),
        ("degree-type", DegreeType),
        ("figured-bass", FiguredBass),
        ("figure", Figure),
        ("prefix", Prefix),
        ("figure-number", FigureNumber),
        ("suffix", Suffix),
    ])
});

impl ElementKind {
    /// Kind for a tag name; families of marks are resolved after the table
    pub fn from_tag(tag: &str) -> Self {
        if let Some(kind) = TAGS.get(tag) {
            return *kind;
        }
        if let Some(kind) = ArticulationKind::from_tag(tag) {
            return ElementKind::Articulation(kind);
        }
        if let Some(kind) = TechnicalKind::from_tag(tag) {
            return ElementKind::TechnicalMark(kind);
        }
        if let Some(kind) = OrnamentKind::from_tag(tag) {
            return ElementKind::Ornament(kind);
        }
        if let Some(kind) = DynamicsKind::from_tag(tag) {
            return ElementKind::Dynamic(kind);
        }
        ElementKind::Other
    }
}

/// One element occurrence: kind, tag, attributes, leaf text and source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub kind: ElementKind,
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub text: Option<String>,
    pub line: usize,
}

impl XmlElement {
    pub fn new(tag: &str, line: usize) -> Self {
        Self {
            kind: ElementKind::from_tag(tag),
            tag: tag.to_string(),
            attributes: HashMap::new(),
            text: None,
            line,
        }
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Trimmed leaf text, empty when absent
    pub fn text(&self) -> &str {
        self.text.as_deref().map(str::trim).unwrap_or("")
    }
}

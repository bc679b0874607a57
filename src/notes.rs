//! Note/chord lookup - classifier labels to pitch sets
//!
//! Both lesson modes resolve a recognised gesture label into the ordered pitch
//! names that should sound. Unknown labels resolve to an empty set; they are
//! never an error.

/// MIDI note used when a pitch name cannot be parsed
pub const FALLBACK_MIDI_NOTE: u8 = 60;

/// Every label the lookup table knows, in display order
pub const KNOWN_LABELS: [&str; 10] = [
    "C_CHORD",
    "G_CHORD",
    "NOTE_C4",
    "NOTE_D4",
    "NOTE_E4",
    "CHORD_D_MAJOR",
    "CHORD_E_MINOR",
    "CHORD_FSHARP_MINOR",
    "CHORD_G_MAJOR",
    "CHORD_A_MAJOR",
];

/// Look up the pitch names for a classifier label
///
/// # Returns
/// The ordered pitch set, or an empty slice for unknown labels
pub fn notes_for(label: &str) -> &'static [&'static str] {
    match label {
        "C_CHORD" => &["C4", "E4", "G4"],
        "G_CHORD" => &["G4", "B4", "D5"],
        "NOTE_C4" => &["C4"],
        "NOTE_D4" => &["D4"],
        "NOTE_E4" => &["E4"],

        // D major family used by the finger-count detector
        "CHORD_D_MAJOR" => &["D4", "F#4", "A4"],
        "CHORD_E_MINOR" => &["E4", "G4", "B4"],
        "CHORD_FSHARP_MINOR" => &["F#4", "A4", "C#5"],
        "CHORD_G_MAJOR" => &["G4", "B4", "D5"],
        "CHORD_A_MAJOR" => &["A4", "C#5", "E5"],
        _ => &[],
    }
}

/// Parse a scientific pitch name ("C4", "F#4", "Bb3") into a MIDI note number
///
/// Returns `None` for anything that is not a letter, optional accidental and
/// octave digit(s), or that falls outside the MIDI range.
pub fn midi_number(pitch: &str) -> Option<u8> {
    let mut chars = pitch.chars();
    let base: i32 = match chars.next()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let rest = chars.as_str();
    let (accidental, octave_str) = match rest.chars().next() {
        Some('#') => (1, &rest[1..]),
        Some('b') => (-1, &rest[1..]),
        _ => (0, rest),
    };

    let octave: i32 = octave_str.parse().ok()?;
    let midi = (octave + 1) * 12 + base + accidental;
    u8::try_from(midi).ok().filter(|n| *n <= 127)
}

/// MIDI number for a pitch, falling back to middle C when unparseable
pub fn midi_or_fallback(pitch: &str) -> u8 {
    midi_number(pitch).unwrap_or(FALLBACK_MIDI_NOTE)
}

/// Equal-tempered frequency (A4 = 440 Hz) for a MIDI note
pub fn midi_to_hz(note: u8) -> f32 {
    440.0 * 2f32.powf((note as f32 - 69.0) / 12.0)
}

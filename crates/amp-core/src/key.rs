//! MIDI key numbers, note names and diatonic scales.
//!
//! Keys follow the MIDI convention: key 60 is C4 and key 69 is A4 at 440 Hz.

/// Frequency of `key` in equal temperament, A4 (69) at 440 Hz.
///
/// ```rust
/// use amp_core::key::key_freq;
///
/// assert_eq!(key_freq(69), 440.0);
/// assert!((key_freq(81) - 880.0).abs() < 1e-3);
/// ```
#[inline]
pub fn key_freq(key: u16) -> f32 {
    440.0 * libm::exp2f((f32::from(key) - 69.0) / 12.0)
}

/// Parses a note name such as `"C4"`, `"f#3"` or `"Bb-1"` into a key number.
///
/// The letter is case-insensitive and may be followed by one or two `b` or
/// `#` accidentals, then a signed octave. Returns `None` for malformed names
/// and for notes outside `0..=127`.
///
/// ```rust
/// use amp_core::key::parse_key;
///
/// assert_eq!(parse_key("C4"), Some(60));
/// assert_eq!(parse_key("a4"), Some(69));
/// assert_eq!(parse_key("Bb2"), Some(46));
/// assert_eq!(parse_key("H2"), None);
/// ```
pub fn parse_key(name: &str) -> Option<u16> {
    let mut chars = name.chars();
    let letter = match chars.next()?.to_ascii_uppercase() {
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
    let (shift, octave) = if let Some(r) = rest.strip_prefix("##") {
        (2, r)
    } else if let Some(r) = rest.strip_prefix("bb") {
        (-2, r)
    } else if let Some(r) = rest.strip_prefix('#') {
        (1, r)
    } else if let Some(r) = rest.strip_prefix('b') {
        (-1, r)
    } else {
        (0, rest)
    };
    let octave: i32 = octave.parse().ok()?;
    let key = 12 * (octave + 1) + letter + shift;
    u16::try_from(key).ok().filter(|&k| k < 128)
}

/// Name of `key`, using sharps, e.g. `"C#4"`.
pub fn key_name(key: u16) -> String {
    const NAMES: [&str; 12] = [
        "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
    ];
    let octave = i32::from(key / 12) - 1;
    format!("{}{}", NAMES[usize::from(key % 12)], octave)
}

const MAJOR: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];
const MINOR: [i32; 7] = [0, 2, 3, 5, 7, 8, 10];

fn interval(table: &[i32; 7], degree: i32) -> i32 {
    12 * degree.div_euclid(7) + table[degree.rem_euclid(7) as usize]
}

/// Semitones spanned by scale `degree` of a major scale; negative degrees
/// count downward.
///
/// ```rust
/// use amp_core::key::ival_maj;
///
/// assert_eq!(ival_maj(2), 4);
/// assert_eq!(ival_maj(7), 12);
/// assert_eq!(ival_maj(-1), -1);
/// ```
pub fn ival_maj(degree: i32) -> i32 {
    interval(&MAJOR, degree)
}

/// Semitones spanned by scale `degree` of a natural minor scale.
pub fn ival_min(degree: i32) -> i32 {
    interval(&MINOR, degree)
}

/// Key of scale `degree` in the major scale rooted at `root`.
///
/// Returns `None` when the result falls outside `0..=127`.
pub fn scale_maj(root: u16, degree: i32) -> Option<u16> {
    offset(root, ival_maj(degree))
}

/// Key of scale `degree` in the natural minor scale rooted at `root`.
pub fn scale_min(root: u16, degree: i32) -> Option<u16> {
    offset(root, ival_min(degree))
}

fn offset(root: u16, semis: i32) -> Option<u16> {
    u16::try_from(i32::from(root) + semis)
        .ok()
        .filter(|&k| k < 128)
}

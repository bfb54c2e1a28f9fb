//! Input masks for the numeric form fields.
//!
//! Masks are purely syntactic. They drop every character that is not an ASCII
//! digit, cap the digit count at the field's capacity, and lay the surviving
//! digits over a fixed punctuation template as they accumulate. Nothing here
//! rejects input; validation happens on submit in [`crate::domain::validation`].

/// Digit capacity of a document number (CPF).
pub const DOCUMENT_NUMBER_DIGITS: usize = 11;
/// Digit capacity of a postal code (CEP).
pub const POSTAL_CODE_DIGITS: usize = 8;

/// Punctuation template laid over a run of digits.
struct Mask {
    groups: &'static [usize],
    separators: &'static [char],
}

/// `ddd.ddd.ddd-dd`
const DOCUMENT_NUMBER_MASK: Mask = Mask {
    groups: &[3, 3, 3, 2],
    separators: &['.', '.', '-'],
};

/// `ddddd-ddd`
const POSTAL_CODE_MASK: Mask = Mask {
    groups: &[5, 3],
    separators: &['-'],
};

impl Mask {
    fn capacity(&self) -> usize {
        self.groups.iter().sum()
    }

    fn apply(&self, raw: &str) -> String {
        let digits: Vec<char> = raw
            .chars()
            .filter(char::is_ascii_digit)
            .take(self.capacity())
            .collect();

        let mut masked = String::with_capacity(digits.len() + self.separators.len());
        let mut remaining = digits.as_slice();
        for (index, group) in self.groups.iter().enumerate() {
            if remaining.is_empty() {
                break;
            }
            if let Some(separator) = index.checked_sub(1).and_then(|i| self.separators.get(i)) {
                masked.push(*separator);
            }
            let (head, tail) = remaining.split_at((*group).min(remaining.len()));
            masked.extend(head);
            remaining = tail;
        }
        masked
    }
}

/// Strip every non-digit character from `raw`.
///
/// # Examples
/// ```
/// use intake::domain::formatter::to_digits_only;
///
/// assert_eq!(to_digits_only("013.10-000 "), "01310000");
/// ```
pub fn to_digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Digits of `raw` truncated to `capacity`, the canonical form of a masked
/// field.
pub fn canonical_digits(raw: &str, capacity: usize) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(capacity)
        .collect()
}

/// Mask a document number progressively as `ddd.ddd.ddd-dd`.
///
/// # Examples
/// ```
/// use intake::domain::formatter::format_document_number;
///
/// assert_eq!(format_document_number("1114447"), "111.444.7");
/// assert_eq!(format_document_number("111444777350000"), "111.444.777-35");
/// ```
pub fn format_document_number(raw: &str) -> String {
    DOCUMENT_NUMBER_MASK.apply(raw)
}

/// Mask a postal code progressively as `ddddd-ddd`.
pub fn format_postal_code(raw: &str) -> String {
    POSTAL_CODE_MASK.apply(raw)
}

//! Month value type.

use std::fmt::{Display, Formatter};

/// Calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

impl Month {
    /// Returns the month for `1..=12`.
    pub fn from_number(number: u32) -> Option<Self> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        MONTHS.get(index).copied()
    }

    /// One-based month number.
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn full_name(self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
        }
    }

    /// Three-letter lowercase abbreviation (`jan`, `feb`, ...).
    pub fn short_name(self) -> &'static str {
        &self.full_name_lower()[..3]
    }

    /// Canonical field form: the bibtex month macro wrapped in `#`.
    pub fn jabref_format(self) -> String {
        format!("#{}#", self.short_name())
    }

    /// Parses free text: `#mar#`, `mar`, `March`, `3` or `03`.
    ///
    /// Returns `None` for anything else, including out-of-range numbers.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        let unwrapped = trimmed
            .strip_prefix('#')
            .and_then(|rest| rest.strip_suffix('#'))
            .unwrap_or(trimmed)
            .trim();
        if unwrapped.is_empty() {
            return None;
        }

        if let Ok(number) = unwrapped.parse::<u32>() {
            return Self::from_number(number);
        }

        let lower = unwrapped.to_lowercase();
        MONTHS
            .iter()
            .copied()
            .find(|month| month.short_name() == lower || month.full_name_lower() == lower)
    }

    fn full_name_lower(self) -> &'static str {
        match self {
            Self::January => "january",
            Self::February => "february",
            Self::March => "march",
            Self::April => "april",
            Self::May => "may",
            Self::June => "june",
            Self::July => "july",
            Self::August => "august",
            Self::September => "september",
            Self::October => "october",
            Self::November => "november",
            Self::December => "december",
        }
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.full_name())
    }
}

#[cfg(test)]
mod tests {
    use super::Month;

    #[test]
    fn parses_supported_spellings() {
        assert_eq!(Month::parse("#mar#"), Some(Month::March));
        assert_eq!(Month::parse("mar"), Some(Month::March));
        assert_eq!(Month::parse("MARCH"), Some(Month::March));
        assert_eq!(Month::parse("3"), Some(Month::March));
        assert_eq!(Month::parse(" 03 "), Some(Month::March));
    }

    #[test]
    fn rejects_out_of_range_and_garbage() {
        assert_eq!(Month::parse("0"), None);
        assert_eq!(Month::parse("13"), None);
        assert_eq!(Month::parse("marzipan"), None);
        assert_eq!(Month::parse("##"), None);
    }

    #[test]
    fn canonical_format_wraps_short_name() {
        assert_eq!(Month::December.jabref_format(), "#dec#");
        assert_eq!(Month::May.short_name(), "may");
    }
}

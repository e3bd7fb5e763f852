use std::sync::OnceLock;

use regex::Regex;

/// `<digits>_<slug>` at the start of a name.
fn numbered_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([0-9]+)_([A-Za-z0-9\-]+)").expect("numbered name pattern is valid")
    })
}

/// Turns a raw segment name into a display title.
///
/// `02_intro-to-topic` becomes `2. Intro To Topic`. Anything after the slug
/// (an extension, a dot, a space) is dropped. Names that do not start with
/// `<digits>_<slug>` are only title-cased, with hyphens read as spaces.
pub fn normalize(name: &str) -> String {
    if let Some(caps) = numbered_pattern().captures(name) {
        let number = strip_leading_zeros(&caps[1]);
        let title = title_case(&caps[2].replace('-', " "));
        return format!("{number}. {title}");
    }

    title_case(&name.replace('-', " "))
}

/// Base-10 value of an ASCII digit run, without going through an integer
/// type so arbitrarily long runs never overflow.
fn strip_leading_zeros(digits: &str) -> &str {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() { "0" } else { trimmed }
}

/// Upper-cases every letter that does not follow another letter and
/// lower-cases the rest.
///
/// A capital that expands to several letters keeps only its first one in
/// upper case (`ß` -> `Ss`), so the result is stable under a second pass.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());

    for c in s.chars() {
        let prev_cased = out.chars().next_back().is_some_and(is_cased);
        if prev_cased {
            out.extend(c.to_lowercase());
        } else {
            let mut upper = c.to_uppercase();
            if let Some(first) = upper.next() {
                out.push(first);
                out.extend(upper.flat_map(char::to_lowercase));
            }
        }
    }

    out
}

fn is_cased(c: char) -> bool {
    c.is_lowercase() || c.is_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_names() {
        assert_eq!(normalize("02_intro-to-topic"), "2. Intro To Topic");
        assert_eq!(normalize("10_data"), "10. Data");
        assert_eq!(normalize("000_zero"), "0. Zero");
        assert_eq!(normalize("01_UPPER-case"), "1. Upper Case");
    }

    #[test]
    fn plain_names_fall_back_to_title_case() {
        assert_eq!(normalize("notes"), "Notes");
        assert_eq!(normalize("extra-reading"), "Extra Reading");
        assert_eq!(normalize("Course 1. Course A"), "Course 1. Course A");
    }

    #[test]
    fn empty_slug_uses_whole_name() {
        assert_eq!(normalize("07"), "07");
        assert_eq!(normalize("07_"), "07_");
        assert_eq!(normalize("07_!"), "07_!");
    }

    #[test]
    fn trailing_text_after_slug_is_dropped() {
        assert_eq!(normalize("01_document.en.txt"), "1. Document");
        assert_eq!(normalize("03_part-one extra"), "3. Part One");
    }

    #[test]
    fn very_long_numbers_do_not_overflow() {
        assert_eq!(
            normalize("000123456789012345678901234567890_x"),
            "123456789012345678901234567890. X"
        );
    }

    #[test]
    fn title_case_restarts_after_non_letters() {
        assert_eq!(title_case("3d models"), "3D Models");
        assert_eq!(title_case("it's o'clock"), "It'S O'Clock");
        assert_eq!(title_case("hELLO wORLD"), "Hello World");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn multi_letter_capitals_keep_one_upper() {
        assert_eq!(normalize("ßeta"), "Sseta");
        assert_eq!(normalize("ﬁle"), "File");
        assert_eq!(normalize("straße-plan"), "Straße Plan");
    }

    #[test]
    fn normalize_is_stable_on_its_own_output() {
        for name in ["ßeta", "ﬁle", "xİy", "01_ab-cd", "notes", "it's", "ǆemal"] {
            let once = normalize(name);
            assert_eq!(normalize(&once), once, "{name}");
        }
    }

    #[test]
    fn only_ascii_digits_count_as_a_number() {
        assert_eq!(normalize("٠٢_intro"), "٠٢_Intro");
    }
}

//! Field-name normalization.
//!
//! Labels in the export are free text (`Date of Birth`, `Part A Effective
//! Date`, `MYMEDICARE.GOV PERSONAL HEALTH INFORMATION`). Schema match paths
//! and output keys use the same "headless camel" form of those labels, so
//! every comparison goes through [`headless_camel`].

/// Punctuation kept inside words; the assigner inspects and strips these.
const KEPT_PUNCTUATION: [char; 2] = ['/', '-'];

fn is_separator(c: char) -> bool {
    c.is_whitespace()
        || c == '_'
        || (c.is_ascii_punctuation() && !KEPT_PUNCTUATION.contains(&c))
}

fn has_lowercase(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_lowercase())
}

/// Append `word` title-cased. All-caps words are folded to lower case after
/// their first letter; mixed-case words keep their inner capitals.
fn push_title_word(out: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.push(first.to_ascii_uppercase());
    }
    let rest = chars.as_str();
    if has_lowercase(word) {
        out.push_str(rest);
    } else {
        out.push_str(&rest.to_ascii_lowercase());
    }
}

/// Convert a label into a camel-case token with a lower-case first letter.
///
/// Whitespace, underscores and ASCII punctuation other than `/` and `-`
/// separate words and are dropped. A single word is returned as-is apart
/// from its first letter (or fully lower-cased when it is all capitals), so
/// the conversion is idempotent.
///
/// ```
/// use cmsblue_core::headless_camel;
///
/// assert_eq!(headless_camel("Date of Birth"), "dateOfBirth");
/// assert_eq!(headless_camel("Part A Effective Date"), "partAEffectiveDate");
/// assert_eq!(headless_camel("DOB"), "dob");
/// assert_eq!(headless_camel("dateOfBirth"), "dateOfBirth");
/// ```
pub fn headless_camel(text: &str) -> String {
    let words: Vec<&str> = text.split(is_separator).filter(|w| !w.is_empty()).collect();
    let mut out = String::with_capacity(text.len());
    match words.as_slice() {
        [] => {}
        [word] if has_lowercase(word) => out.push_str(word),
        [word] => out.push_str(&word.to_ascii_lowercase()),
        _ => {
            for word in &words {
                push_title_word(&mut out, word);
            }
        }
    }
    if let Some(first) = out.get_mut(0..1) {
        first.make_ascii_lowercase();
    }
    if !has_lowercase(&out) {
        out.make_ascii_lowercase();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn section_titles() {
        assert_eq!(headless_camel("Demographic"), "demographic");
        assert_eq!(headless_camel("Emergency Contact"), "emergencyContact");
        assert_eq!(headless_camel("claim Header"), "claimHeader");
        assert_eq!(
            headless_camel("Claim Lines for Claim Number"),
            "claimLinesForClaimNumber"
        );
        assert_eq!(headless_camel("Part D Claims"), "partDClaims");
        assert_eq!(
            headless_camel("MYMEDICARE.GOV PERSONAL HEALTH INFORMATION"),
            "mymedicareGovPersonalHealthInformation"
        );
    }

    #[test]
    fn field_labels() {
        assert_eq!(headless_camel("Address Line 1"), "addressLine1");
        assert_eq!(headless_camel("Days' Supply"), "daysSupply");
        assert_eq!(headless_camel("Rendering Provider NPI"), "renderingProviderNpi");
        assert_eq!(headless_camel("Test/Lab Type"), "test/LabType");
        assert_eq!(headless_camel("Line number"), "lineNumber");
        assert_eq!(headless_camel("Zip"), "zip");
    }

    #[test]
    fn date_labels_keep_slashes() {
        assert_eq!(headless_camel("06/01/2015 01"), "06/01/201501");
    }

    #[test]
    fn degenerate_input() {
        assert_eq!(headless_camel(""), "");
        assert_eq!(headless_camel("********"), "");
        assert_eq!(headless_camel("1 B"), "1b");
    }

    proptest! {
        #[test]
        fn idempotent(text in ".*") {
            let once = headless_camel(&text);
            prop_assert_eq!(headless_camel(&once), once);
        }

        #[test]
        fn idempotent_on_label_like_text(text in "[A-Za-z0-9 /'().-]{0,40}") {
            let once = headless_camel(&text);
            prop_assert_eq!(headless_camel(&once), once);
        }
    }
}

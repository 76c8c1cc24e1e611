//! Line classification.
//!
//! Turns raw export text into [`LineRecord`]s. A section looks like:
//!
//! ```text
//! --------------------------------
//! Emergency Contact
//! --------------------------------
//! Source: Self-Entered
//! Contact Name: JANE DOE
//! ```
//!
//! The title between the dividers becomes a HEADER record at level 0 and the
//! lines after the closing divider become BODY records one level deeper.
//! Claim line-item sections (`Claim Lines for Claim Number: 123`) and the
//! untitled divider pair that separates claims sit at level 1.

use cmsblue_model::{LineRecord, LineType};

/// Shortest run of dashes recognised as a section divider.
pub const DIVIDER: &str = "----------";

/// Title given to an empty divider pair; it introduces the next claim.
pub const DEFAULT_CLAIM_TITLE: &str = "claim Header";

/// Title a headerless Part D claim block is renamed to.
pub const PART_D_TITLE: &str = "Part D Claims";

const CLAIM_LINES_TITLE: &str = "CLAIM LINES FOR CLAIM NUMBER";
const PART_D_MARKER: &str = "CLAIM TYPE: PART D";

/// Returns true for a line made only of dashes, at least [`DIVIDER`] long.
pub fn is_divider(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= DIVIDER.len() && trimmed.bytes().all(|b| b == b'-')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Body,
    /// After an opening divider, waiting for the title.
    Title,
    /// After the title, waiting for the closing divider.
    AwaitClose,
}

#[derive(Debug)]
struct LineClassifier {
    records: Vec<LineRecord>,
    mode: Mode,
    section_level: usize,
    claim_number: String,
}

impl LineClassifier {
    fn new() -> Self {
        Self {
            records: Vec::new(),
            mode: Mode::Body,
            section_level: 0,
            claim_number: String::new(),
        }
    }

    fn push(&mut self, line_number: usize, raw: &str) {
        let line = raw.trim_end();
        if line.trim_start().is_empty() {
            return;
        }
        match self.mode {
            Mode::Body => {
                if is_divider(line) {
                    self.mode = Mode::Title;
                } else {
                    self.push_body(line_number, line);
                }
            }
            Mode::Title => {
                if is_divider(line) {
                    // Two dividers with nothing between them open the next claim.
                    self.section_level = 1;
                    self.push_record(line_number, DEFAULT_CLAIM_TITLE, LineType::Header);
                    self.mode = Mode::Body;
                } else {
                    self.push_title(line_number, line);
                    self.mode = Mode::AwaitClose;
                }
            }
            Mode::AwaitClose => {
                if is_divider(line) {
                    self.mode = Mode::Body;
                } else {
                    tracing::debug!(line = line_number, "body line before closing divider");
                    self.push_body(line_number, line);
                }
            }
        }
    }

    fn push_title(&mut self, line_number: usize, line: &str) {
        let (title, value) = match line.split_once(':') {
            Some((title, value)) => (title.trim_end(), value.trim()),
            None => (line, ""),
        };
        self.section_level = if title.to_ascii_uppercase().contains(CLAIM_LINES_TITLE) {
            self.claim_number = value.to_string();
            1
        } else {
            // Claim numbers do not leak into the sections that follow claims.
            self.claim_number.clear();
            0
        };
        self.push_record(line_number, title, LineType::Header);
    }

    fn push_body(&mut self, line_number: usize, line: &str) {
        let upper = line.to_ascii_uppercase();
        if upper.contains("CLAIM NUMBER")
            && let Some((_, value)) = line.split_once(':')
        {
            self.claim_number = value.trim().to_string();
        }
        if upper.contains(PART_D_MARKER) {
            self.rename_part_d_block();
        }
        self.push_record(line_number, line, LineType::Body);
    }

    fn rename_part_d_block(&mut self) {
        let Some(previous) = self.records.last_mut() else {
            return;
        };
        if previous.is_header() && previous.text.eq_ignore_ascii_case(CLAIM_LINES_TITLE) {
            tracing::debug!(line = previous.line_number, "renaming claim lines to Part D claims");
            previous.text = PART_D_TITLE.to_string();
        }
    }

    fn push_record(&mut self, line_number: usize, text: &str, line_type: LineType) {
        let level = match line_type {
            LineType::Header => self.section_level,
            LineType::Body => self.section_level + 1,
        };
        self.records.push(LineRecord {
            sequence_key: self.records.len(),
            line_number,
            text: text.to_string(),
            line_type,
            level,
            claim_number: self.claim_number.clone(),
        });
    }

    fn finish(mut self) -> Vec<LineRecord> {
        promote_unheaded_claims(&mut self.records);
        self.records
    }
}

/// A `Claim Number:` line normally follows a claim header or the section's
/// `Source:` line. When it follows anything else, the divider pair that
/// should have introduced it is missing and the line itself opens the claim.
fn promote_unheaded_claims(records: &mut [LineRecord]) {
    for index in 1..records.len() {
        let (before, rest) = records.split_at_mut(index);
        let current = &mut rest[0];
        let previous = &before[index - 1];
        if current.is_header() || !current.text.to_ascii_lowercase().contains("claim number:") {
            continue;
        }
        if previous.is_header() || previous.text.to_ascii_uppercase().contains("SOURCE:") {
            continue;
        }
        tracing::debug!(line = current.line_number, "claim number without claim header");
        current.line_type = LineType::Header;
    }
}

/// Classify every non-blank line of `text`.
///
/// Blank lines and dividers produce no records. Each call is independent.
pub fn read_lines(text: &str) -> Vec<LineRecord> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut classifier = LineClassifier::new();
    for (index, raw) in text.lines().enumerate() {
        classifier.push(index + 1, raw);
    }
    classifier.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(records: &[LineRecord]) -> Vec<(&str, LineType, usize)> {
        records
            .iter()
            .map(|r| (r.text.as_str(), r.line_type, r.level))
            .collect()
    }

    #[test]
    fn divider_detection() {
        assert!(is_divider("----------"));
        assert!(is_divider("--------------------------------  "));
        assert!(!is_divider("-----"));
        assert!(!is_divider("---------- x"));
        assert!(!is_divider(""));
    }

    #[test]
    fn title_and_body_levels() {
        let records = read_lines("----------\nDemographic\n----------\nName: JOHN DOE\n");
        assert_eq!(
            texts(&records),
            vec![
                ("Demographic", LineType::Header, 0),
                ("Name: JOHN DOE", LineType::Body, 1),
            ]
        );
        assert_eq!(records[1].sequence_key, 1);
        assert_eq!(records[1].line_number, 4);
    }

    #[test]
    fn blank_lines_are_dropped() {
        let records = read_lines("\n\n----------\n\nDrugs\n   \n----------\n\n\nDrug Name: ASPIRIN\r\n\n");
        assert_eq!(
            texts(&records),
            vec![
                ("Drugs", LineType::Header, 0),
                ("Drug Name: ASPIRIN", LineType::Body, 1),
            ]
        );
    }

    #[test]
    fn claim_lines_title_carries_claim_number() {
        let text = "----------\nClaim Lines for Claim Number: 1234A\n----------\nLine number: 1\n";
        let records = read_lines(text);
        assert_eq!(records[0].text, "Claim Lines for Claim Number");
        assert_eq!(records[0].level, 1);
        assert_eq!(records[0].claim_number, "1234A");
        assert_eq!(records[1].level, 2);
        assert_eq!(records[1].claim_number, "1234A");
    }

    #[test]
    fn empty_divider_pair_is_claim_header() {
        let text = "----------\n----------\nClaim Number: 77\nProvider: CLINIC\n";
        let records = read_lines(text);
        assert_eq!(
            texts(&records),
            vec![
                (DEFAULT_CLAIM_TITLE, LineType::Header, 1),
                ("Claim Number: 77", LineType::Body, 2),
                ("Provider: CLINIC", LineType::Body, 2),
            ]
        );
        assert_eq!(records[2].claim_number, "77");
    }

    #[test]
    fn body_claim_number_carries_forward() {
        let text = "Source: MyMedicare.gov\nClaim Number: 1\nProvider: A\n";
        let records = read_lines(text);
        assert_eq!(records[0].claim_number, "");
        assert_eq!(records[1].claim_number, "1");
        assert_eq!(records[2].claim_number, "1");
    }

    #[test]
    fn top_level_title_resets_claim_number() {
        let text = "Claim Number: 9\n----------\nDrugs\n----------\nDrug Name: ASPIRIN\n";
        let records = read_lines(text);
        assert_eq!(records[0].claim_number, "9");
        assert_eq!(records[1].claim_number, "");
        assert_eq!(records[2].claim_number, "");
    }

    #[test]
    fn part_d_marker_renames_claim_lines_title() {
        let text = "----------\nClaim Lines for Claim Number: 55\n----------\nClaim Type: PART D\n";
        let records = read_lines(text);
        assert_eq!(records[0].text, PART_D_TITLE);
        assert!(records[0].is_header());
        assert_eq!(records[0].claim_number, "55");
    }

    #[test]
    fn part_d_marker_leaves_other_titles() {
        let text = "----------\nClaim Summary\n----------\nClaim Type: PART D\n";
        let records = read_lines(text);
        assert_eq!(records[0].text, "Claim Summary");
    }

    #[test]
    fn claim_number_after_body_line_is_promoted() {
        let text = "----------\n----------\nClaim Number: 1\nProvider: A\nClaim Number: 2\nProvider: B\n";
        let records = read_lines(text);
        assert!(records[1].is_body());
        assert!(records[3].is_header());
        assert_eq!(records[3].text, "Claim Number: 2");
        assert_eq!(records[3].level, 2);
    }

    #[test]
    fn claim_number_after_source_is_not_promoted() {
        let text = "----------\nClaim Summary\n----------\nSource: MyMedicare.gov\nClaim Number: 1\n";
        let records = read_lines(text);
        assert!(records[2].is_body());
    }

    #[test]
    fn stray_line_in_title_block_is_kept_as_body() {
        let text = "----------\nAllergies\nSource: Self-Entered\n----------\nAllergy Name: DUST\n";
        let records = read_lines(text);
        assert_eq!(
            texts(&records),
            vec![
                ("Allergies", LineType::Header, 0),
                ("Source: Self-Entered", LineType::Body, 1),
                ("Allergy Name: DUST", LineType::Body, 1),
            ]
        );
    }

    #[test]
    fn leading_bom_is_ignored() {
        let records = read_lines("\u{feff}MYMEDICARE.GOV PERSONAL HEALTH INFORMATION\n");
        assert_eq!(records[0].text, "MYMEDICARE.GOV PERSONAL HEALTH INFORMATION");
        assert!(records[0].is_body());
        assert_eq!(records[0].level, 1);
    }
}

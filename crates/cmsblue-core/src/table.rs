//! The MyMedicare.gov export vocabulary.
//!
//! Section rows are keyed by the normalized section title. Field rows are
//! keyed by `<segment name>.<normalized label>` (one more level for lines
//! under a sub-header) and only exist where a value needs grouping, renaming
//! or list collection; any other label is written under its normalized form.

use cmsblue_model::{SchemaEntry, SectionHandler};

const HEADER_PRE: &[(&str, &str)] = &[
    ("title", "MyMedicare.gov Personal Health Information"),
    ("languageCode", "code=\"en-US\""),
    ("originator", "MyMedicare.gov"),
];

const PATIENT_PRE: &[(&str, &str)] = &[("category", "Patient")];
const MEDICARE_PRE: &[(&str, &str)] = &[("category", "Medicare")];
const EMPLOYER_SUBSIDY_PRE: &[(&str, &str)] = &[("category", "Employer Subsidy")];
const PRIMARY_INSURANCE_PRE: &[(&str, &str)] = &[("category", "Primary Insurance")];
const OTHER_INSURANCE_PRE: &[(&str, &str)] = &[("category", "Other Insurance")];
const CLAIM_PRE: &[(&str, &str)] = &[("category", "Claim")];
const CLAIM_LINE_PRE: &[(&str, &str)] = &[("category", "Claim Line")];
const PART_D_PRE: &[(&str, &str)] = &[("category", "Part D Claim")];

/// Rules in lookup precedence order.
pub static SCHEMA_TABLE: &[SchemaEntry] = &[
    // Sections
    SchemaEntry::section("mymedicareGovPersonalHealthInformation", "header").with_pre(HEADER_PRE),
    SchemaEntry::section("demographic", "patient").with_pre(PATIENT_PRE),
    SchemaEntry::list_section("emergencyContact", "emergencyContact"),
    SchemaEntry::list_section("selfReportedMedicalConditions", "medicalConditions"),
    SchemaEntry::list_section("selfReportedAllergies", "allergies"),
    SchemaEntry::list_section("selfReportedImplantableDevice", "implantableDevices"),
    SchemaEntry::list_section("selfReportedImmunizations", "immunizations"),
    SchemaEntry::list_section("selfReportedLabsAndTests", "labs"),
    SchemaEntry::list_section("selfReportedVitalStatistics", "vitals"),
    SchemaEntry::list_section("familyMedicalHistory", "familyHistory")
        .with_handler(SectionHandler::FamilyHistory),
    SchemaEntry::list_section("drugs", "medications"),
    SchemaEntry::list_section("preventiveServices", "preventiveServices"),
    SchemaEntry::list_section("providers", "providers"),
    SchemaEntry::list_section("pharmacies", "pharmacies"),
    SchemaEntry::list_section("plans", "insurance").with_pre(MEDICARE_PRE),
    SchemaEntry::list_section("employerSubsidy", "employerSubsidy")
        .at_level(1)
        .with_pre(EMPLOYER_SUBSIDY_PRE),
    SchemaEntry::list_section("primaryInsurance", "primaryInsurance")
        .at_level(1)
        .with_pre(PRIMARY_INSURANCE_PRE),
    SchemaEntry::list_section("otherInsurance", "otherInsurance")
        .at_level(1)
        .with_pre(OTHER_INSURANCE_PRE),
    SchemaEntry::list_section("claimSummary", "claims")
        .with_handler(SectionHandler::ClaimSummary)
        .with_pre(CLAIM_PRE),
    SchemaEntry::list_section("claimHeader", "claimHeader")
        .at_level(1)
        .with_pre(CLAIM_PRE),
    SchemaEntry::list_section("claimLinesForClaimNumber", "details")
        .at_level(1)
        .with_pre(CLAIM_LINE_PRE),
    SchemaEntry::list_section("partDClaims", "partDClaims")
        .at_level(1)
        .with_pre(PART_D_PRE),
    // Demographic
    SchemaEntry::grouped("patient.homePhone", "phone", "home"),
    SchemaEntry::grouped("patient.workPhone", "phone", "work"),
    SchemaEntry::grouped("patient.mobilePhone", "phone", "mobile"),
    SchemaEntry::field("patient.emailAddress", "email"),
    // Emergency contacts
    SchemaEntry::field("emergencyContact.contactName", "name"),
    SchemaEntry::grouped("emergencyContact.homePhone", "phone", "home"),
    SchemaEntry::grouped("emergencyContact.workPhone", "phone", "work"),
    SchemaEntry::grouped("emergencyContact.mobilePhone", "phone", "mobile"),
    SchemaEntry::field("emergencyContact.emailAddress", "email"),
    // Immunizations
    SchemaEntry::field("immunizations.wereYouVaccinatedInTheUs", "vaccinatedInUs"),
    // Medications
    SchemaEntry::grouped("medications.pharmacyName", "pharmacy", "name"),
    SchemaEntry::grouped("medications.pharmacyPhone", "pharmacy", "phone"),
    // Providers and pharmacies
    SchemaEntry::field("providers.providerName", "name"),
    SchemaEntry::field("pharmacies.pharmacyName", "name"),
    // Claims
    SchemaEntry::appended("claims.diagnosisCode1", "diagnosisCodes"),
    SchemaEntry::appended("claims.diagnosisCode2", "diagnosisCodes"),
    SchemaEntry::appended("claims.diagnosisCode3", "diagnosisCodes"),
    SchemaEntry::appended("claims.diagnosisCode4", "diagnosisCodes"),
    SchemaEntry::appended("claims.claimHeader.diagnosisCode1", "diagnosisCodes"),
    SchemaEntry::appended("claims.claimHeader.diagnosisCode2", "diagnosisCodes"),
    SchemaEntry::appended("claims.claimHeader.diagnosisCode3", "diagnosisCodes"),
    SchemaEntry::appended("claims.claimHeader.diagnosisCode4", "diagnosisCodes"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::headless_camel;

    #[test]
    fn section_matches_are_normalized_titles() {
        for title in [
            "MYMEDICARE.GOV PERSONAL HEALTH INFORMATION",
            "Demographic",
            "Emergency Contact",
            "Self Reported Medical Conditions",
            "Family Medical History",
            "Drugs",
            "Plans",
            "Claim Summary",
            "claim Header",
            "Claim Lines for Claim Number",
            "Part D Claims",
        ] {
            let path = headless_camel(title);
            assert!(
                SCHEMA_TABLE.iter().any(|e| e.match_path == path),
                "no section rule for {title} ({path})"
            );
        }
    }

    #[test]
    fn sub_headers_sit_below_their_segment() {
        for entry in SCHEMA_TABLE.iter().filter(|e| e.is_section()) {
            let nested = matches!(
                entry.name,
                "employerSubsidy"
                    | "primaryInsurance"
                    | "otherInsurance"
                    | "claimHeader"
                    | "details"
                    | "partDClaims"
            );
            assert_eq!(entry.level, usize::from(nested), "{}", entry.name);
        }
    }
}

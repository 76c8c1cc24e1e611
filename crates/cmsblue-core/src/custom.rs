//! Sections the generic builder cannot read on its own.

use cmsblue_model::SchemaEntry;
use serde_json::Value;

use crate::assign::{KeyValueState, assign};
use crate::builder::{
    EntrySink, ParseContext, Placement, SegmentOutcome, WorkingEntry, build_segment,
};
use crate::error::Result;

const CONDITION_KEY: &str = "condition";
const FAMILY_MEMBER_KEY: &str = "familyMember";
const TYPE_KEY: &str = "type";

/// Claims with their line items nested under each claim.
pub fn build_claim_summary(
    ctx: &mut ParseContext<'_>,
    start: usize,
    entry: &SchemaEntry,
) -> Result<SegmentOutcome> {
    build_segment(ctx, start, entry, true)
}

/// Family members, each with a `condition` list.
///
/// A member's first `Type` line is its relationship. The second starts the
/// member's conditions, which run until the next `Family Member` line or the
/// end of the section.
pub fn build_family_history(
    ctx: &mut ParseContext<'_>,
    start: usize,
    entry: &SchemaEntry,
) -> Result<SegmentOutcome> {
    let records = ctx.records;
    let head = &records[start];
    let segment_level = ParseContext::header_level(head, Some(entry));
    ctx.breadcrumb.update(segment_level, entry.name);

    let mut kvs = KeyValueState::new();
    kvs.category = head.label().trim().to_string();
    let mut sink = EntrySink::new(false);
    let mut working = WorkingEntry::prefilled(entry);
    let mut type_count = 0;

    let mut index = start + 1;
    while index < records.len() {
        let record = &records[index];
        if record.is_header() {
            break;
        }
        let field = ctx.resolve_field(record);
        assign(record, field, &mut kvs, ctx.options)?;

        if kvs.key == FAMILY_MEMBER_KEY {
            type_count = 0;
        }
        if kvs.key == TYPE_KEY {
            type_count += 1;
            if type_count == 2 {
                let (conditions, last) = collect_conditions(ctx, index, &kvs)?;
                working.place(
                    Placement::Top(CONDITION_KEY.to_string()),
                    Value::Array(conditions),
                );
                type_count = 0;
                index = last + 1;
                continue;
            }
        }

        let placement = Placement::for_field(&kvs.key, field);
        if working.holds(&placement) {
            sink.flush(std::mem::take(&mut working), &mut kvs);
            working = WorkingEntry::prefilled(entry);
        }
        working.place(placement, std::mem::take(&mut kvs.value));
        index += 1;
    }

    sink.flush(working, &mut kvs);
    Ok(SegmentOutcome {
        name: entry.name,
        value: sink.into_value(),
        end: index - 1,
    })
}

/// Read condition entries from `start` (the second `Type` line). Returns the
/// entries and the index of the last line consumed.
fn collect_conditions(
    ctx: &mut ParseContext<'_>,
    start: usize,
    member: &KeyValueState,
) -> Result<(Vec<Value>, usize)> {
    let records = ctx.records;
    let mut kvs = KeyValueState {
        source: member.source.clone(),
        ..KeyValueState::default()
    };
    let mut sink = EntrySink::new(false);
    let mut working = WorkingEntry::default();
    let mut last = start;

    for (index, record) in records.iter().enumerate().skip(start) {
        if !record.is_body() {
            break;
        }
        let field = ctx.resolve_field(record);
        assign(record, field, &mut kvs, ctx.options)?;
        if index > start && kvs.key == FAMILY_MEMBER_KEY {
            break;
        }
        let placement = Placement::for_field(&kvs.key, field);
        if working.holds(&placement) {
            sink.flush(std::mem::take(&mut working), &mut kvs);
        }
        working.place(placement, std::mem::take(&mut kvs.value));
        last = index;
    }
    sink.flush(working, &mut kvs);

    let conditions = match sink.into_value() {
        Value::Array(items) => items,
        _ => Vec::new(),
    };
    Ok((conditions, last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::default_schema;
    use cmsblue_ingest::read_lines;
    use cmsblue_model::ParseOptions;
    use serde_json::json;

    const FAMILY: &str = "----------
Family Medical History
----------
Source: Self-Entered
Family Member: Father
Type: Natural
Type: Diabetes
Age at Diagnosis: 50
Type: Heart Disease
Family Member: Mother
Type: Natural
Type: Asthma
";

    #[test]
    fn members_carry_conditions() {
        let records = read_lines(FAMILY);
        let options = ParseOptions::default();
        let mut ctx = ParseContext::new(&records, default_schema(), &options);
        let entry = ctx.section_for(&records[0].text).expect("family history rule");
        let outcome = build_family_history(&mut ctx, 0, entry).expect("build");

        assert_eq!(outcome.name, "familyHistory");
        assert_eq!(outcome.end, records.len() - 1);
        assert_eq!(
            outcome.value,
            json!([
                {
                    "source": "patient",
                    "familyMember": "Father",
                    "type": "Natural",
                    "condition": [
                        { "type": "Diabetes", "ageAtDiagnosis": "50", "source": "patient" },
                        { "type": "Heart Disease", "source": "patient" }
                    ],
                    "category": "Family Medical History"
                },
                {
                    "familyMember": "Mother",
                    "type": "Natural",
                    "condition": [
                        { "type": "Asthma", "source": "patient" }
                    ],
                    "category": "Family Medical History",
                    "source": "patient"
                }
            ])
        );
    }

    #[test]
    fn conditions_stop_at_next_member() {
        let records = read_lines(FAMILY);
        let options = ParseOptions::default();
        let mut ctx = ParseContext::new(&records, default_schema(), &options);
        let member = KeyValueState::new();
        let (conditions, last) = collect_conditions(&mut ctx, 4, &member).expect("collect");
        assert_eq!(conditions.len(), 2);
        assert_eq!(records[last].text, "Type: Heart Disease");
    }
}

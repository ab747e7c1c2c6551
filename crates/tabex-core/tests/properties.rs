//! Property tests for row width, literal columns and CSV quoting.

use csv::ReaderBuilder;
use proptest::prelude::*;
use serde_json::{Map, Value};
use tabex_core::csv_output::table_to_string;
use tabex_core::{
    CellValue, Columns, ExportConfig, ExportRequest, ExportTable, Exporter, ModelName, Record,
    Resolver, SchemaRegistry, Scope,
};

fn parse_csv(text: &str) -> Vec<Vec<String>> {
    ReaderBuilder::new()
        .has_headers(false)
        .from_reader(text.as_bytes())
        .records()
        .map(|record| {
            record
                .expect("valid csv record")
                .iter()
                .map(ToString::to_string)
                .collect()
        })
        .collect()
}

fn text_table(header: Vec<String>, rows: Vec<Vec<String>>) -> ExportTable {
    let mut table = ExportTable::new(header);
    for row in rows {
        table
            .push_row(row.into_iter().map(CellValue::from).collect())
            .expect("row fits");
    }
    table
}

#[test]
fn delimiter_in_value_survives_round_trip() {
    let table = text_table(
        vec!["A".to_string(), "B".to_string()],
        vec![vec!["x,1".to_string(), "y".to_string()]],
    );
    let text = table_to_string(&table).expect("render csv");
    assert_eq!(text, "A,B\n\"x,1\",y\n");
    assert_eq!(
        parse_csv(&text),
        vec![vec!["A", "B"], vec!["x,1", "y"]]
    );
}

fn cell_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,\"\n\r;]{0,8}"
}

fn member_name() -> impl Strategy<Value = String> {
    "[a-d]"
}

proptest! {
    #[test]
    fn csv_round_trip_preserves_cells(
        (header, rows) in (1usize..5).prop_flat_map(|width| (
            prop::collection::vec(cell_text(), width),
            prop::collection::vec(prop::collection::vec(cell_text(), width), 0..6),
        ))
    ) {
        let table = text_table(header.clone(), rows.clone());
        let text = table_to_string(&table).expect("render csv");
        let mut expected = vec![header];
        expected.extend(rows);
        prop_assert_eq!(parse_csv(&text), expected);
    }

    #[test]
    fn rows_match_header_and_literals_are_constant(
        literals in prop::collection::vec(0i64..1000, 1..5),
        members in prop::collection::vec(member_name(), 0..4),
        records in prop::collection::vec(
            prop::collection::btree_map(member_name(), "[a-z]{0,4}", 0..4),
            0..8,
        ),
    ) {
        let mut columns = Columns::new();
        for (index, literal) in literals.iter().enumerate() {
            columns.insert(format!("L{index}"), Resolver::literal(*literal));
        }
        for (index, member) in members.iter().enumerate() {
            columns.insert(format!("M{index}"), Resolver::member(member.as_str()));
        }
        let snapshot = records.clone();
        let scope = Scope::new(move |_| {
            Ok(snapshot
                .iter()
                .map(|fields| {
                    let map: Map<String, Value> = fields
                        .iter()
                        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                        .collect();
                    Box::new(map) as Box<dyn Record>
                })
                .collect())
        });
        let mut registry = SchemaRegistry::new();
        registry
            .register_as(ModelName::new("Sample"), |config: &mut ExportConfig| {
                config.set_scope(scope);
                Ok(())
            })
            .expect("register sample");
        let exporter = Exporter::new(
            &registry,
            ExportRequest::new("Sample").with_fields(columns),
        )
        .expect("exporter");

        let table = exporter.table().expect("export succeeds");

        prop_assert_eq!(table.len(), records.len());
        for (row, record) in table.rows.iter().zip(&records) {
            prop_assert_eq!(row.len(), table.width());
            for (index, literal) in literals.iter().enumerate() {
                prop_assert_eq!(&row[index], &CellValue::Integer(*literal));
            }
            for (offset, member) in members.iter().enumerate() {
                let expected = record
                    .get(member)
                    .map_or_else(|| CellValue::from(member.as_str()), CellValue::from);
                prop_assert_eq!(&row[literals.len() + offset], &expected);
            }
        }
    }
}

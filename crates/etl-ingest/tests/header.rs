use etl_ingest::{parse_headers, resolve_header, resolve_indices};
use etl_model::{ColumnType, EtlError, ParseOptions, Schema};
use proptest::prelude::*;

fn automobile_schema() -> Schema {
    Schema::from_pairs([
        ("engine-location", ColumnType::Integer),
        ("num-of-cylinders", ColumnType::Integer),
        ("price", ColumnType::Float),
        ("make", ColumnType::Text),
    ])
    .expect("schema")
}

#[test]
fn resolves_unordered_header() {
    let header = "symboling;make; fuel-type ;price;num-of-cylinders;;engine-location";
    let indices = resolve_header(header, &automobile_schema(), &ParseOptions::default())
        .expect("resolve");
    assert_eq!(indices, vec![6, 4, 3, 1]);
}

#[test]
fn resolves_with_custom_delimiter() {
    let options = ParseOptions::default().with_delimiter('|');
    let schema = Schema::from_pairs([("b", ColumnType::Text)]).expect("schema");
    assert_eq!(resolve_header("a|b", &schema, &options).expect("resolve"), vec![1]);
}

#[test]
fn header_lookup_is_case_sensitive() {
    let err = resolve_header(
        "Engine-Location;num-of-cylinders;price;make",
        &automobile_schema(),
        &ParseOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, EtlError::SchemaMismatch { column } if column == "engine-location"));
}

proptest! {
    #[test]
    fn resolution_is_deterministic_and_complete(
        names in prop::collection::hash_set("[a-z]{1,8}", 1..12),
        pick in prop::collection::vec(any::<prop::sample::Index>(), 1..6),
    ) {
        let header: Vec<String> = names.into_iter().collect();
        let mut chosen: Vec<&String> = pick.iter().map(|i| i.get(&header)).collect();
        let mut seen = std::collections::HashSet::new();
        chosen.retain(|name| seen.insert(name.as_str()));
        let schema = Schema::from_pairs(
            chosen.iter().map(|name| (name.as_str(), ColumnType::Text)),
        ).unwrap();

        let line = header.join(";");
        let fields = parse_headers(&line, ';');
        let first = resolve_indices(&fields, &schema).unwrap();
        let second = resolve_indices(&fields, &schema).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), schema.len());
        for (column, index) in schema.iter().zip(&first) {
            prop_assert_eq!(&header[*index], &column.name);
        }
    }
}

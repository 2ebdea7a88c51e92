use test_support::fixtures_dir;
use workforce_metrics::ingest::{decode_time_entries, read_table};
use workforce_metrics::options;

#[test]
fn fixture_filter_options_snapshot() {
  let doc = read_table(&fixtures_dir().join("time_entries.json")).unwrap();
  let (records, _) = decode_time_entries(&doc).unwrap();
  let found = options::discover(&records);

  insta::assert_json_snapshot!(found, @r###"
  {
    "employees": [
      "Ana",
      "Ben",
      "Cara"
    ],
    "teams": [
      "Build",
      "Design"
    ],
    "years": [
      2024,
      2023
    ],
    "months": [
      1,
      2,
      3,
      4,
      12
    ],
    "weeks": [
      "2024-W15",
      "2024-W14",
      "2024-W12",
      "2024-W11",
      "2024-W07",
      "2024-W02",
      "2023-W52"
    ]
  }
  "###);
}

#![cfg(feature = "serde")]

use diffkit::diff::{UnifiedDiff, UnifiedDiffOptions};
use diffkit::side_by_side::{self, SideBySideDiff};

#[test]
fn unified_diff_json() {
    let diff = UnifiedDiff::from_texts("a\nb", "a\nc", &UnifiedDiffOptions::new("old", "new"));
    insta::assert_json_snapshot!(diff, @r#"
    {
      "old_file": "old",
      "new_file": "new",
      "old_timestamp": null,
      "new_timestamp": null,
      "hunks": [
        {
          "lines": [
            {
              "op": "Equal",
              "line_number": {
                "old": 1,
                "new": 1
              },
              "content": "a"
            },
            {
              "op": "Delete",
              "line_number": {
                "old": 2,
                "new": null
              },
              "content": "b"
            },
            {
              "op": "Insert",
              "line_number": {
                "old": null,
                "new": 2
              },
              "content": "c"
            }
          ]
        }
      ]
    }
    "#);
}

#[test]
fn side_by_side_survives_json() {
    let columns = side_by_side::format("one\ntwo", "one\n2\nthree");
    let json = serde_json::to_string(&columns).unwrap();
    let back: SideBySideDiff = serde_json::from_str(&json).unwrap();
    assert_eq!(back, columns);
}

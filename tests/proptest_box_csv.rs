use leafcoco::ir::io_box_csv::from_box_csv_str;
use proptest::prelude::*;

mod proptest_helpers;
use proptest_helpers::{arb_rows, render_csv, HEADER_SPELLINGS};

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn header_aliases_parse_identically(rows in arb_rows(12)) {
        let reference = from_box_csv_str(&render_csv(&HEADER_SPELLINGS[0], &rows))
            .expect("parse reference spelling");

        for header in &HEADER_SPELLINGS[1..] {
            let parsed = from_box_csv_str(&render_csv(header, &rows)).expect("parse alias spelling");
            prop_assert_eq!(&parsed, &reference);
        }
    }

    #[test]
    fn only_positive_extents_survive(rows in arb_rows(12)) {
        let parsed = from_box_csv_str(&render_csv(&HEADER_SPELLINGS[1], &rows)).expect("parse");

        let expected: Vec<_> = rows.iter().filter(|row| row.is_valid()).collect();
        prop_assert_eq!(parsed.boxes.len(), expected.len());
        prop_assert_eq!(parsed.degenerate_rows, rows.len() - expected.len());
        prop_assert_eq!(parsed.unparsable_rows, 0);

        for (parsed_box, row) in parsed.boxes.iter().zip(expected) {
            prop_assert_eq!(parsed_box.bbox.to_array(), [row.x, row.y, row.width, row.height]);
            prop_assert_eq!(parsed_box.bbox.area(), row.width * row.height);
            prop_assert_eq!(parsed_box.category_id.as_i64(), row.label);
        }
    }

    #[test]
    fn arbitrary_text_never_panics(text in "[a-z0-9,.\\-\n ]{0,200}") {
        let _ = from_box_csv_str(&text);
    }
}

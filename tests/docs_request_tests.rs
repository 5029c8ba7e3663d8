//! Archive entry request-building tests
//!
//! Walks the generated Docs batchUpdate requests and checks block order
//! and every index offset, including UTF-16 accounting for Japanese text
//! (each kana/kanji below is one UTF-16 code unit).

use evishare::models::Submission;
use evishare::services::archive_writer::{build_cell_requests, build_entry_requests, EntryImage};
use serde_json::Value;

fn japanese_submission() -> Submission {
    Submission {
        timestamp: "2024/05/01 12:00:00".to_string(),
        submitter: "田中".to_string(),
        title: "再エネ補助金".to_string(),
        supporting_tags: vec!["平等".to_string()],
        opposing_tags: vec!["経済".to_string()],
        source_url: "https://example.com/article".to_string(),
        update_date: "2024/04/30".to_string(),
        source_label: "Example Times".to_string(),
        quote: "引用本文".to_string(),
        attachments: Vec::new(),
        remark: "要確認".to_string(),
    }
}

fn ascii_submission() -> Submission {
    Submission {
        timestamp: "2024/05/01 12:00:00".to_string(),
        submitter: "tanaka".to_string(),
        title: "Renewable subsidies".to_string(),
        supporting_tags: Vec::new(),
        opposing_tags: Vec::new(),
        source_url: "https://example.com/article".to_string(),
        update_date: "2024/04/30".to_string(),
        source_label: "Example Times".to_string(),
        quote: "quote".to_string(),
        attachments: Vec::new(),
        remark: String::new(),
    }
}

fn insert_index(request: &Value, kind: &str) -> u64 {
    request[kind]["location"]["index"]
        .as_u64()
        .unwrap_or_else(|| panic!("no {} index in {}", kind, request))
}

fn style_range(request: &Value, kind: &str) -> (u64, u64) {
    let range = &request[kind]["range"];
    (
        range["startIndex"].as_u64().expect("startIndex"),
        range["endIndex"].as_u64().expect("endIndex"),
    )
}

#[test]
fn test_full_entry_block_order_and_offsets() {
    let images = [
        EntryImage {
            uri: "https://drive.google.com/uc?export=view&id=a".to_string(),
            size_pt: Some((375.0, 150.0)),
        },
        EntryImage {
            uri: "https://drive.google.com/uc?export=view&id=b".to_string(),
            size_pt: None,
        },
    ];
    let requests = build_entry_requests(10, 7, &japanese_submission(), &images);

    assert_eq!(requests.len(), 13);

    // page break at the insertion point, occupying two index units
    assert_eq!(insert_index(&requests[0], "insertPageBreak"), 10);

    // heading "7. 再エネ補助金 (田中)\n" is 15 UTF-16 units
    assert_eq!(insert_index(&requests[1], "insertText"), 12);
    assert_eq!(
        requests[1]["insertText"]["text"],
        "7. 再エネ補助金 (田中)\n"
    );

    // tag line "#田中 [AFF] #平等 [NEG] #経済\n" is 24 units
    assert_eq!(insert_index(&requests[2], "insertText"), 27);
    assert_eq!(
        requests[2]["insertText"]["text"],
        "#田中 [AFF] #平等 [NEG] #経済\n"
    );

    // remark "要確認\n" is 4 units
    assert_eq!(insert_index(&requests[3], "insertText"), 51);
    assert_eq!(requests[3]["insertText"]["text"], "要確認\n");

    // each image advances one unit, its newline another
    assert_eq!(insert_index(&requests[4], "insertInlineImage"), 55);
    assert_eq!(insert_index(&requests[5], "insertText"), 56);
    assert_eq!(requests[5]["insertText"]["text"], "\n");
    assert_eq!(insert_index(&requests[6], "insertInlineImage"), 57);
    assert_eq!(insert_index(&requests[7], "insertText"), 58);

    // table shell comes last among the inserts
    assert_eq!(insert_index(&requests[8], "insertTable"), 59);
    assert_eq!(requests[8]["insertTable"]["rows"], 1);
    assert_eq!(requests[8]["insertTable"]["columns"], 1);

    // styles follow all inserts: heading, tag colors, remark
    assert_eq!(style_range(&requests[9], "updateParagraphStyle"), (12, 26));
    assert_eq!(
        requests[9]["updateParagraphStyle"]["paragraphStyle"]["namedStyleType"],
        "HEADING_2"
    );

    assert_eq!(style_range(&requests[10], "updateTextStyle"), (31, 40));
    assert_eq!(
        requests[10]["updateTextStyle"]["textStyle"]["foregroundColor"]["color"]["rgbColor"]
            ["red"],
        0.8
    );

    assert_eq!(style_range(&requests[11], "updateTextStyle"), (41, 50));
    assert_eq!(
        requests[11]["updateTextStyle"]["textStyle"]["foregroundColor"]["color"]["rgbColor"]
            ["blue"],
        0.8
    );

    assert_eq!(style_range(&requests[12], "updateTextStyle"), (51, 54));
    assert_eq!(
        requests[12]["updateTextStyle"]["textStyle"]["fontSize"]["magnitude"],
        9.0
    );
}

#[test]
fn test_image_object_size_only_when_known() {
    let images = [
        EntryImage {
            uri: "https://drive.google.com/uc?export=view&id=a".to_string(),
            size_pt: Some((375.0, 150.0)),
        },
        EntryImage {
            uri: "https://drive.google.com/uc?export=view&id=b".to_string(),
            size_pt: None,
        },
    ];
    let requests = build_entry_requests(10, 7, &japanese_submission(), &images);

    let sized = &requests[4]["insertInlineImage"];
    assert_eq!(sized["objectSize"]["width"]["magnitude"], 375.0);
    assert_eq!(sized["objectSize"]["width"]["unit"], "PT");
    assert_eq!(sized["objectSize"]["height"]["magnitude"], 150.0);

    let natural = &requests[6]["insertInlineImage"];
    assert!(natural.get("objectSize").is_none());
    assert_eq!(
        natural["uri"],
        "https://drive.google.com/uc?export=view&id=b"
    );
}

#[test]
fn test_minimal_entry_omits_optional_blocks() {
    let requests = build_entry_requests(1, 7, &ascii_submission(), &[]);

    // page break, heading, tag line, table, heading style
    assert_eq!(requests.len(), 5);

    assert_eq!(insert_index(&requests[0], "insertPageBreak"), 1);
    assert_eq!(insert_index(&requests[1], "insertText"), 3);
    assert_eq!(
        requests[1]["insertText"]["text"],
        "7. Renewable subsidies (tanaka)\n"
    );
    assert_eq!(insert_index(&requests[2], "insertText"), 35);
    assert_eq!(requests[2]["insertText"]["text"], "#tanaka\n");
    assert_eq!(insert_index(&requests[3], "insertTable"), 43);
    assert_eq!(style_range(&requests[4], "updateParagraphStyle"), (3, 34));

    // no color or remark styling for an entry without tags or remark
    let text_styles = requests
        .iter()
        .filter(|r| r.get("updateTextStyle").is_some())
        .count();
    assert_eq!(text_styles, 0);
}

#[test]
fn test_cell_requests_single_insert_at_cell_start() {
    let requests = build_cell_requests(120, "cell body");

    assert_eq!(requests.len(), 1);
    assert_eq!(insert_index(&requests[0], "insertText"), 120);
    assert_eq!(requests[0]["insertText"]["text"], "cell body");
}

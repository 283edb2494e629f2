use super::compare;

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn diff_text(a: &[&str], b: &[&str]) -> (bool, String) {
    let mut out = Vec::new();
    let matched =
        compare(&lines(a), &lines(b), "base", "cand", &mut out).unwrap();
    (matched, String::from_utf8(out).unwrap())
}

#[test]
fn identical_streams_match() {
    let (matched, text) =
        diff_text(&["INT", "PLUS", "INT"], &["INT", "PLUS", "INT"]);
    assert!(matched);
    assert_eq!(text, "");
}

#[test]
fn empty_streams_match() {
    let (matched, text) = diff_text(&[], &[]);
    assert!(matched);
    assert_eq!(text, "");
}

#[test]
fn changed_line_marked_on_both_sides() {
    let (matched, text) =
        diff_text(&["INT", "PLUS", "INT"], &["INT", "MINUS", "INT"]);
    assert!(!matched);
    let expected = "\
*** base
--- cand
***************
*** 1,3 ****
  INT
! PLUS
  INT
--- 1,3 ----
  INT
! MINUS
  INT
";
    assert_eq!(text, expected);
}

#[test]
fn deleted_line_omits_candidate_body() {
    let (matched, text) = diff_text(&["A", "B", "C"], &["A", "C"]);
    assert!(!matched);
    let expected = "\
*** base
--- cand
***************
*** 1,3 ****
  A
- B
  C
--- 1,2 ----
";
    assert_eq!(text, expected);
}

#[test]
fn inserted_line_omits_baseline_body() {
    let (matched, text) = diff_text(&["A", "C"], &["A", "B", "C"]);
    assert!(!matched);
    let expected = "\
*** base
--- cand
***************
*** 1,2 ****
--- 1,3 ----
  A
+ B
  C
";
    assert_eq!(text, expected);
}

#[test]
fn empty_candidate_is_pure_deletion() {
    let (matched, text) = diff_text(&["A", "B"], &[]);
    assert!(!matched);
    let expected = "\
*** base
--- cand
***************
*** 1,2 ****
- A
- B
--- 0 ----
";
    assert_eq!(text, expected);
}

#[test]
fn long_equal_prefix_trimmed_to_context() {
    let base = ["L0", "L1", "L2", "L3", "L4", "L5", "L6", "L7", "L8", "L9", "X"];
    let cand = ["L0", "L1", "L2", "L3", "L4", "L5", "L6", "L7", "L8", "L9", "Y"];
    let (matched, text) = diff_text(&base, &cand);
    assert!(!matched);
    let expected = "\
*** base
--- cand
***************
*** 8,11 ****
  L7
  L8
  L9
! X
--- 8,11 ----
  L7
  L8
  L9
! Y
";
    assert_eq!(text, expected);
}

#[test]
fn distant_changes_split_into_hunks() {
    let base = ["X", "L0", "L1", "L2", "L3", "L4", "L5", "L6", "L7", "L8",
        "L9", "Z"];
    let cand = ["x", "L0", "L1", "L2", "L3", "L4", "L5", "L6", "L7", "L8",
        "L9", "z"];
    let (matched, text) = diff_text(&base, &cand);
    assert!(!matched);
    assert_eq!(text.matches("***************\n").count(), 2);
    assert!(text.contains("*** 1,4 ****"));
    assert!(text.contains("*** 9,12 ****"));
    assert!(text.contains("! X"));
    assert!(text.contains("! z"));
    assert!(!text.contains("  L4"));
}

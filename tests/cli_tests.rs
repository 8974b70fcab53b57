mod common;

use assert_fs::TempDir;
use common::{run_prosediff, workspace_dir, write_json};
use predicates::prelude::predicate;
use rstest::rstest;
use serde_json::json;

fn single_paragraph(text: &str) -> serde_json::Value {
    json!({
        "type": "doc",
        "content": [{
            "type": "paragraph",
            "content": [{ "type": "text", "text": text }]
        }]
    })
}

#[rstest]
fn diff_prints_merged_document_as_json(
    workspace_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let old = write_json(workspace_dir.path(), "old.json", &single_paragraph("JSON5"));
    let new = write_json(workspace_dir.path(), "new.json", &single_paragraph("JSON6"));

    let output = run_prosediff(&["diff", old.to_str().unwrap(), new.to_str().unwrap()])
        .assert()
        .success();
    let stdout = String::from_utf8(output.get_output().stdout.clone())?;
    let merged: serde_json::Value = serde_json::from_str(&stdout)?;

    pretty_assertions::assert_eq!(
        merged["content"][0]["content"],
        json!([
            { "type": "text", "text": "JSON" },
            {
                "type": "text",
                "text": "5",
                "marks": [{
                    "type": "diffMark",
                    "attrs": { "granularity": "char", "kind": "deleted" }
                }]
            },
            {
                "type": "text",
                "text": "6",
                "marks": [{
                    "type": "diffMark",
                    "attrs": { "granularity": "char", "kind": "inserted" }
                }]
            }
        ])
    );

    Ok(())
}

#[rstest]
fn diff_renders_html(workspace_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let old = write_json(workspace_dir.path(), "old.json", &single_paragraph("hello"));
    let new = write_json(
        workspace_dir.path(),
        "new.json",
        &single_paragraph("hello world"),
    );

    run_prosediff(&[
        "diff",
        old.to_str().unwrap(),
        new.to_str().unwrap(),
        "--granularity",
        "word",
        "--format",
        "html",
    ])
    .assert()
    .success()
    .stdout(predicate::str::starts_with("<p>hello<span"))
    .stdout(predicate::str::contains(r#"data-diff-type="inserted""#))
    .stdout(predicate::str::contains(r#"data-diff-level="word""#));

    Ok(())
}

#[rstest]
fn diff_renders_plain_text(workspace_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let old = write_json(workspace_dir.path(), "old.json", &single_paragraph("one"));
    let new = write_json(workspace_dir.path(), "new.json", &single_paragraph("one two"));

    run_prosediff(&[
        "diff",
        old.to_str().unwrap(),
        new.to_str().unwrap(),
        "--format",
        "text",
        "--no-color",
    ])
    .assert()
    .success()
    .stdout("one two\n");

    Ok(())
}

#[rstest]
fn diff_reads_options_file_and_flags_override_it(
    workspace_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let old = write_json(workspace_dir.path(), "old.json", &single_paragraph("deep"));
    let new = write_json(workspace_dir.path(), "new.json", &single_paragraph("deeper"));
    let options = write_json(
        workspace_dir.path(),
        "options.json",
        &json!({ "max_depth": 2 }),
    );

    run_prosediff(&[
        "diff",
        old.to_str().unwrap(),
        new.to_str().unwrap(),
        "--options",
        options.to_str().unwrap(),
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("maximum depth of 2"));

    run_prosediff(&[
        "diff",
        old.to_str().unwrap(),
        new.to_str().unwrap(),
        "--options",
        options.to_str().unwrap(),
        "--max-depth",
        "3",
    ])
    .assert()
    .success();

    Ok(())
}

#[rstest]
fn diff_fails_on_root_type_mismatch(
    workspace_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let old = write_json(workspace_dir.path(), "old.json", &single_paragraph("x"));
    let new = write_json(
        workspace_dir.path(),
        "new.json",
        &json!({ "type": "blockquote", "content": [] }),
    );

    run_prosediff(&["diff", old.to_str().unwrap(), new.to_str().unwrap()])
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("node type mismatch: doc !== blockquote"));

    Ok(())
}

#[rstest]
fn diff_rejects_unknown_node_types(
    workspace_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let old = write_json(workspace_dir.path(), "old.json", &single_paragraph("x"));
    let new = write_json(
        workspace_dir.path(),
        "new.json",
        &json!({ "type": "marquee" }),
    );

    run_prosediff(&["diff", old.to_str().unwrap(), new.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid document"));

    Ok(())
}

#[test]
fn words_prints_segments() -> Result<(), Box<dyn std::error::Error>> {
    run_prosediff(&["words", "hello", "hello world"])
        .assert()
        .success()
        .stdout(" word\t\"hello\"\n+word\t\" world\"\n");

    Ok(())
}

#[test]
fn words_applies_diff_filter() -> Result<(), Box<dyn std::error::Error>> {
    run_prosediff(&["words", "JSONB", "JOHN", "--diff-filter", "I"])
        .assert()
        .success()
        .stdout("+char\t\"H\"\n");

    Ok(())
}

#[test]
fn words_rejects_bad_diff_filter() -> Result<(), Box<dyn std::error::Error>> {
    run_prosediff(&["words", "a", "b", "--diff-filter", "X"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid diff filter"));

    Ok(())
}

#[test]
fn tokenize_prints_ranges_and_classes() -> Result<(), Box<dyn std::error::Error>> {
    run_prosediff(&["tokenize", "foo@bar"])
        .assert()
        .success()
        .stdout("0..3\tword\t\"foo\"\n3..4\tpunct\t\"@\"\n4..7\tword\t\"bar\"\n");

    Ok(())
}

#[test]
fn unknown_granularity_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    run_prosediff(&["words", "a", "b", "--granularity", "line"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid granularity"));

    Ok(())
}

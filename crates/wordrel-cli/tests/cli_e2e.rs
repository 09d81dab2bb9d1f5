use std::path::PathBuf;
use std::process::{Command, Output};

fn wordrel_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_wordrel"))
}

fn demos_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos")
}

fn run(args: &[&str]) -> Output {
    let out = Command::new(wordrel_bin())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run wordrel");
    assert!(
        out.status.success(),
        "wordrel {args:?} failed:\n{}",
        String::from_utf8_lossy(&out.stderr)
    );
    out
}

fn demo(name: &str) -> String {
    demos_dir().join(name).display().to_string()
}

#[test]
fn ask_prints_answer_lemma() {
    let out = run(&[
        "ask",
        "--corpus",
        &demo("corpus.scm"),
        "--question",
        &demo("what_did_bob_eat.scm"),
    ]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.lines().any(|l| l.contains("cake")), "stdout: {stdout}");
}

#[test]
fn ask_yes_no_as_json() {
    let out = run(&[
        "ask",
        "--corpus",
        &demo("corpus.scm"),
        "--question",
        &demo("did_alice_throw_the_ball.scm"),
        "--config",
        &demo("query.json"),
        "--json",
    ]);
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json report");
    let answers = report["answers"].as_array().expect("answers array");
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0]["name"], "yes");
    assert_eq!(answers[0]["atom_type"], "WordNode");
}

#[test]
fn snapshot_then_ask_from_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let snap = dir.path().join("corpus.wrdb");
    let snap_arg = snap.display().to_string();

    run(&["snapshot", "--input", &demo("corpus.scm"), "--out", &snap_arg]);
    assert!(std::fs::read(&snap).unwrap().starts_with(b"WRAS"));

    let out = run(&[
        "ask",
        "--corpus",
        &snap_arg,
        "--question",
        &demo("what_did_bob_eat.scm"),
        "--first",
    ]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("cake"), "stdout: {stdout}");

    let out = run(&["show", "--input", &snap_arg, "--stats"]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("EvaluationLink"), "stdout: {stdout}");
}

#[test]
fn vars_lists_interrogative() {
    let out = run(&["vars", "--question", &demo("what_did_bob_eat.scm"), "--json"]);
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json");
    assert_eq!(v["clauses"].as_array().unwrap().len(), 2);
    assert_eq!(v["vars"][0], "(WordInstanceNode \"what@q1\")");
}

#[test]
fn unanswerable_question_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let question = dir.path().join("q.scm");
    std::fs::write(
        &question,
        r#"
        (LemmaLink (WordInstanceNode "eat@q") (WordNode "eat"))
        (LemmaLink (WordInstanceNode "Carol@q") (WordNode "Carol"))
        (InheritanceLink (WordInstanceNode "what@q") (DefinedLinguisticConceptNode "what"))
        (EvaluationLink
           (DefinedLinguisticRelationshipNode "_subj")
           (ListLink (WordInstanceNode "eat@q") (WordInstanceNode "Carol@q")))
        (EvaluationLink
           (DefinedLinguisticRelationshipNode "_obj")
           (ListLink (WordInstanceNode "eat@q") (WordInstanceNode "what@q")))
        "#,
    )
    .unwrap();

    let out = run(&[
        "ask",
        "--corpus",
        &demo("corpus.scm"),
        "--question",
        &question.display().to_string(),
    ]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("no answer found"), "stdout: {stdout}");
}

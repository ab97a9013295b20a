mod common;
use common::*;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_chat_full_conversation() {
    let dir = tempdir().unwrap();
    evtype_cmd(dir.path())
        .env("EVTYPE_DATA", sample_data())
        .args(["chat", "--quiet"])
        .write_stdin("hi\nTesla Model 3\nabout 270 miles\nno\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("You: Tesla Model 3"))
        .stdout(predicate::str::contains(
            "Bot: Great! Can you tell me the approximate electric range (in miles) for the Tesla Model 3?",
        ))
        .stdout(predicate::str::contains("runs solely on electricity"))
        .stdout(predicate::str::contains("Bot: Goodbye! Have a great day!"));
}

#[test]
fn test_chat_reprompts() {
    let dir = tempdir().unwrap();
    evtype_cmd(dir.path())
        .env("EVTYPE_DATA", sample_data())
        .args(["chat", "--quiet"])
        .write_stdin("hello\nRivian R1T\nToyota Prius Prime\nno idea\n25\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("couldn't find that make and model"))
        .stdout(predicate::str::contains("valid numeric range"))
        .stdout(predicate::str::contains("combines electric and gasoline power"));
}

#[test]
fn test_chat_banner_and_history() {
    let dir = tempdir().unwrap();
    evtype_cmd(dir.path())
        .env("EVTYPE_DATA", sample_data())
        .arg("chat")
        .write_stdin("hi\n/history\n/quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("(10 records)"))
        .stdout(predicate::str::is_match(r"\[\d{2}:\d{2}:\d{2}\] You: hi").unwrap());
}

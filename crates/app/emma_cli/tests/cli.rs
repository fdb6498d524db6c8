use assert_cmd::Command;
use emma_core::auth::password::hash_password;
use predicates::prelude::*;

fn cli() -> Command {
    Command::cargo_bin("emma_cli").expect("emma_cli binary")
}

#[test]
fn hash_password_prints_raw_and_escaped_hash() {
    cli()
        .args(["hash-password", "AdminPassword123!"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("$argon2id$"))
        .stdout(predicate::str::contains("ADMIN_PASSWORD_HASH=\\$argon2id\\$"));
}

#[test]
fn verify_password_matches_hash() {
    let hash = hash_password("AdminPassword123!").unwrap();
    cli()
        .args(["verify-password", "--hash", &hash, "AdminPassword123!"])
        .assert()
        .success()
        .stdout("ok\n");
}

#[test]
fn verify_password_mismatch_fails() {
    let hash = hash_password("AdminPassword123!").unwrap();
    cli()
        .args(["verify-password", "--hash", &hash, "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("password does not match"));
}

#[test]
fn generate_secret_respects_length() {
    let output = cli()
        .args(["generate-secret", "--length", "48"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let secret = String::from_utf8(output.stdout).unwrap();
    let secret = secret.trim();
    assert_eq!(secret.len(), 48);
    assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn generate_secret_rejects_short_length() {
    cli()
        .args(["generate-secret", "--length", "8"])
        .assert()
        .failure();
}

#[test]
fn version_prints_package() {
    cli()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("emma_cli "));
}

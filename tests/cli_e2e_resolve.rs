//! End-to-end tests for the `resolve`, `fields` and `templates`
//! subcommands.

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn shotpath() -> Command {
    let mut cmd = Command::cargo_bin("shotpath").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

const CONFIG: &str = r#"
roots:
  primary: { linux: /mnt/projects, mac: /mnt/projects, windows: /mnt/projects }
keys:
  Shot: { type: str }
  name: { type: str }
  version: { type: int, format_spec: "03" }
paths:
  maya_shot_work: "shots/{Shot}/work/{name}.v{version}.ma"
strings:
  publish_name: "{name}, v{version}"
"#;

fn write_config(temp: &assert_fs::TempDir) -> assert_fs::fixture::ChildPath {
    let config = temp.child("shotpath.yaml");
    config.write_str(CONFIG).unwrap();
    config
}

#[test]
fn resolve_renders_a_path_with_padding() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = write_config(&temp);

    shotpath()
        .args([
            "-c",
            config.path().to_str().unwrap(),
            "resolve",
            "maya_shot_work",
            "-f",
            "Shot=shot_010",
            "-f",
            "name=anim",
            "-f",
            "version=4",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("shots/shot_010/work/anim.v004.ma"));
}

#[test]
fn resolve_renders_a_string_template() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = write_config(&temp);

    shotpath()
        .args([
            "-c",
            config.path().to_str().unwrap(),
            "resolve",
            "publish_name",
            "-f",
            "name=anim",
            "-f",
            "version=4",
        ])
        .assert()
        .success()
        .stdout(predicate::str::diff("anim, v004\n"));
}

#[test]
fn resolve_reports_all_missing_keys() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = write_config(&temp);

    shotpath()
        .args([
            "-c",
            config.path().to_str().unwrap(),
            "resolve",
            "maya_shot_work",
            "-f",
            "Shot=shot_010",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required keys"))
        .stderr(predicate::str::contains("name"))
        .stderr(predicate::str::contains("version"));
}

#[test]
fn resolve_suggests_similar_template_names() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = write_config(&temp);

    shotpath()
        .args([
            "-c",
            config.path().to_str().unwrap(),
            "resolve",
            "maya_shot_wrk",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Did you mean 'maya_shot_work'?"));
}

#[test]
fn resolve_rejects_unknown_field_names() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = write_config(&temp);

    shotpath()
        .args([
            "-c",
            config.path().to_str().unwrap(),
            "resolve",
            "maya_shot_work",
            "-f",
            "Shoot=shot_010",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no key named 'Shoot'"))
        .stderr(predicate::str::contains("Did you mean 'Shot'?"));
}

#[test]
fn fields_recovers_values_from_a_path() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = write_config(&temp);

    shotpath()
        .args([
            "-c",
            config.path().to_str().unwrap(),
            "fields",
            "/mnt/projects/shots/shot_010/work/anim.v004.ma",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("maya_shot_work"))
        .stdout(predicate::str::contains("Shot = shot_010"))
        .stdout(predicate::str::contains("version = 4"));
}

#[test]
fn fields_fails_for_unmanaged_paths() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = write_config(&temp);

    shotpath()
        .args([
            "-c",
            config.path().to_str().unwrap(),
            "fields",
            "/srv/elsewhere/file.txt",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not managed by any template"));
}

#[test]
fn fields_emits_json_with_numeric_values() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = write_config(&temp);

    shotpath()
        .args([
            "-c",
            config.path().to_str().unwrap(),
            "fields",
            "--json",
            "/mnt/projects/shots/shot_010/work/anim.v004.ma",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"template\": \"maya_shot_work\""))
        .stdout(predicate::str::contains("\"version\": 4"));
}

#[test]
fn templates_lists_the_registry() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = write_config(&temp);

    shotpath()
        .args(["-c", config.path().to_str().unwrap(), "templates", "--keys"])
        .assert()
        .success()
        .stdout(predicate::str::contains("maya_shot_work"))
        .stdout(predicate::str::contains("publish_name"))
        .stdout(predicate::str::contains("version (int)"));
}

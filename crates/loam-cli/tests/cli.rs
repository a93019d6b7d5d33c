use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use loam_test_utils::{write_jar, ClassFileBuilder};
use predicates::prelude::*;
use pretty_assertions::assert_eq;

fn loam() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("loam"));
    cmd.env_remove("LOAM_CONFIG_PATH");
    cmd
}

fn json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("stdout is JSON")
}

fn widget_workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    let widget = ClassFileBuilder::class("com/acme/Widget")
        .field(0x0001, "label", "Ljava/lang/String;", None)
        .method(0x0001, "size", "()I", None)
        .build();
    temp.child("libs").create_dir_all().unwrap();
    write_jar(
        temp.child("libs/widget.jar").path(),
        &[("com/acme/Widget.class", widget.as_slice())],
    )
    .unwrap();
    temp.child("loam.toml")
        .write_str("[classpath]\narchives = [\"libs/widget.jar\"]\n")
        .unwrap();
    temp
}

#[test]
fn help_mentions_commands() {
    loam().arg("--help").assert().success().stdout(
        predicate::str::contains("resolve").and(predicate::str::contains("chain")),
    );
}

#[test]
fn resolves_platform_types_without_a_config() {
    let temp = TempDir::new().unwrap();
    let output = loam()
        .args(["resolve", "java.lang.String", "--json", "--path"])
        .arg(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report = json(&output.stdout);
    assert_eq!(report["name"], "java.lang.String");
    assert_eq!(report["kind"], "class");
    assert_eq!(report["origin"], "compiled");
    let methods = report["methods"].as_array().expect("methods");
    assert!(methods
        .iter()
        .any(|method| method.as_str().is_some_and(|m| m.starts_with("length("))));
}

#[test]
fn resolves_types_from_configured_archives() {
    let temp = widget_workspace();
    let output = loam()
        .args(["resolve", "com.acme.Widget", "--json", "--path"])
        .arg(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report = json(&output.stdout);
    assert_eq!(report["name"], "com.acme.Widget");
    assert_eq!(report["fields"][0], "label: java.lang.String");
    assert!(report["ancestors"]
        .as_array()
        .expect("ancestors")
        .iter()
        .any(|ancestor| ancestor == "java.lang.Object"));
}

#[test]
fn human_output_lists_members() {
    let temp = widget_workspace();
    loam()
        .args(["resolve", "com.acme.Widget", "--path"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("class com.acme.Widget (compiled)")
                .and(predicate::str::contains("method size()")),
        );
}

#[test]
fn unresolved_type_exits_with_one() {
    let temp = TempDir::new().unwrap();
    loam()
        .args(["resolve", "com.acme.Missing", "--path"])
        .arg(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unresolved type: com.acme.Missing"));
}

#[test]
fn chain_lists_archives_before_the_platform() {
    let temp = widget_workspace();
    let output = loam()
        .args(["chain", "--json", "--path"])
        .arg(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report = json(&output.stdout);
    assert!(report["config"].as_str().is_some());
    assert_eq!(report["static_compilation"], false);
    let solvers: Vec<&str> = report["solvers"]
        .as_array()
        .expect("solvers")
        .iter()
        .filter_map(|solver| solver.as_str())
        .collect();
    assert_eq!(solvers.len(), 2);
    assert!(solvers[0].starts_with("jar(") && solvers[0].ends_with("widget.jar)"));
    assert_eq!(solvers[1], "platform");
}

#[test]
fn broken_config_exits_with_two() {
    let temp = TempDir::new().unwrap();
    temp.child("loam.toml").write_str("[classpath\n").unwrap();
    loam()
        .args(["chain", "--path"])
        .arg(temp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to load config"));
}

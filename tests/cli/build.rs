use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::{CliTest, stderr_of, stdout_of};

/// Root renders two children; ChildB renders ChildA and itself.
fn write_scenario(test: &CliTest) -> Result<()> {
    test.write_component(
        ".",
        "root",
        "Root",
        "app-root",
        "<app-child-a></app-child-a>\n<app-child-b></app-child-b>\n",
    )?;
    test.write_component("child-a", "child-a", "ChildA", "app-child-a", "<p>leaf</p>\n")?;
    test.write_component(
        "child-b",
        "child-b",
        "ChildB",
        "app-child-b",
        "<app-child-a></app-child-a>\n<app-child-b *ngIf=\"more\"></app-child-b>\n",
    )
}

fn scenario_document() -> Value {
    let child_b_children = json!([
        { "name": "ChildA" },
        { "name": "ChildB (recursive)" }
    ]);
    json!({
        "name": "root",
        "children": [
            { "name": "ChildA" },
            { "name": "ChildB", "children": child_b_children },
            {
                "name": "Root",
                "children": [
                    { "name": "ChildA" },
                    { "name": "ChildB", "children": child_b_children }
                ]
            }
        ]
    })
}

#[test]
fn test_build_writes_document() -> Result<()> {
    let test = CliTest::new()?;
    write_scenario(&test)?;

    let output = test.build_command().output()?;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
    let stdout = stdout_of(&output);
    assert!(stdout.contains(
        "✓ Extracted 3 components from 3 declaration files, 3 markup files - no issues found"
    ));
    assert!(stdout.contains("Wrote "));

    let content = test.read_file("public/data/app-data.json")?;
    assert!(content.starts_with("{\n    \"name\": \"root\",\n    \"children\": ["));
    let parsed: Value = serde_json::from_str(&content)?;
    assert_eq!(parsed, scenario_document());

    Ok(())
}

#[test]
fn test_build_stdout_keeps_report_on_stderr() -> Result<()> {
    let test = CliTest::new()?;
    write_scenario(&test)?;

    let output = test.build_command().arg("--stdout").output()?;

    assert_eq!(output.status.code(), Some(0));
    let parsed: Value = serde_json::from_str(&stdout_of(&output))?;
    assert_eq!(parsed, scenario_document());
    assert!(stderr_of(&output).contains("no issues found"));
    assert!(!test.root().join("public").exists());

    Ok(())
}

#[test]
fn test_build_prune_leaves() -> Result<()> {
    let test = CliTest::new()?;
    write_scenario(&test)?;

    let output = test.build_command().args(["--stdout", "--prune-leaves"]).output()?;

    let parsed: Value = serde_json::from_str(&stdout_of(&output))?;
    let names: Vec<&str> = parsed["children"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["ChildB", "Root"]);

    Ok(())
}

#[test]
fn test_build_reports_incomplete_metadata_and_still_writes() -> Result<()> {
    let test = CliTest::new()?;
    write_scenario(&test)?;
    test.write_file(
        "src/app/inline/inline.component.ts",
        "@Component({\n  selector: 'app-inline',\n  template: '<p></p>'\n})\nexport class Inline {}\n",
    )?;

    let output = test.build_command().output()?;

    assert_eq!(output.status.code(), Some(1));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("error: "));
    assert!(stdout.contains("metadata-extraction"));
    assert!(stdout.contains("inline.component.ts"));
    assert!(stdout.contains("1 problems (1 error, 0 warnings)"));

    let parsed: Value = serde_json::from_str(&test.read_file("public/data/app-data.json")?)?;
    assert_eq!(parsed, scenario_document());

    Ok(())
}

#[test]
fn test_build_uses_config_file() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".comptreerc.json",
        r#"{ "sourceRoot": "./web/src/app", "app": "portal", "outputDir": "./out" }"#,
    )?;
    test.write_file(
        "web/src/app/home/home.component.ts",
        "@Component({\n  selector: 'app-home',\n  templateUrl: './home.component.html'\n})\nexport class HomeComponent {}\n",
    )?;
    test.write_file("web/src/app/home/home.component.html", "<h1>home</h1>\n")?;

    let output = test.build_command().output()?;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
    let parsed: Value = serde_json::from_str(&test.read_file("out/portal-data.json")?)?;
    assert_eq!(
        parsed,
        json!({ "name": "root", "children": [{ "name": "HomeComponent" }] })
    );

    Ok(())
}

#[test]
fn test_build_cli_overrides_config() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".comptreerc.json", r#"{ "app": "portal" }"#)?;
    write_scenario(&test)?;

    let output = test
        .build_command()
        .args(["--app", "admin", "--output-dir", "dist"])
        .output()?;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
    assert!(test.root().join("dist/admin-data.json").exists());
    assert!(!test.root().join("public/data/portal-data.json").exists());

    Ok(())
}

#[test]
fn test_build_reports_cycle() -> Result<()> {
    let test = CliTest::new()?;
    test.write_component("ping", "ping", "Ping", "app-ping", "<app-pong></app-pong>\n")?;
    test.write_component("pong", "pong", "Pong", "app-pong", "<app-ping></app-ping>\n")?;

    let output = test.build_command().arg("--stdout").output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("Ping -> Pong -> Ping"));
    let parsed: Value = serde_json::from_str(&stdout_of(&output))?;
    assert_eq!(
        parsed,
        json!({ "name": "root", "children": [{ "name": "Ping" }, { "name": "Pong" }] })
    );

    Ok(())
}

#[test]
fn test_build_missing_source_root() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.build_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr_of(&output).contains("Error: Source root is not a directory"));

    Ok(())
}

#[test]
fn test_build_invalid_config() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".comptreerc.json", r#"{ "app": "a/b" }"#)?;

    let output = test.build_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr_of(&output).starts_with("Error: "));

    Ok(())
}

#[test]
fn test_build_empty_project_keeps_root_children() -> Result<()> {
    let test = CliTest::new()?;
    std::fs::create_dir_all(test.root().join("src/app"))?;

    let output = test.build_command().arg("--stdout").output()?;

    assert_eq!(output.status.code(), Some(0));
    let parsed: Value = serde_json::from_str(&stdout_of(&output))?;
    assert_eq!(parsed, json!({ "name": "root", "children": [] }));

    Ok(())
}

#[test]
fn test_build_tolerates_latin1_markup() -> Result<()> {
    let test = CliTest::new()?;
    write_scenario(&test)?;
    std::fs::write(
        test.root().join("src/app/root.component.html"),
        b"<footer>\xa9 2019</footer>\n<app-child-a></app-child-a>\n<app-child-b></app-child-b>\n",
    )?;

    let output = test.build_command().output()?;

    assert_eq!(output.status.code(), Some(0), "stdout: {}", stdout_of(&output));
    let parsed: Value = serde_json::from_str(&test.read_file("public/data/app-data.json")?)?;
    assert_eq!(parsed, scenario_document());

    Ok(())
}

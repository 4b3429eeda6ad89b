use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, stdout_of};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["sourceRoot"], "./src/app");
    assert_eq!(parsed["anchor"], "src/app");
    assert_eq!(parsed["app"], "app");
    assert_eq!(parsed["outputDir"], "./public/data");
    assert_eq!(parsed["pruneLeaves"], false);

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout_of(&output).contains("Created .comptreerc.json"));
    let content = test.read_file(".comptreerc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".comptreerc.json", "{}")?;

    let output = test.command().arg("init").output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_of(&output).contains(".comptreerc.json already exists"));
    assert_eq!(test.read_file(".comptreerc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;
    test.write_component("home", "home", "HomeComponent", "app-home", "<p></p>\n")?;

    let output = test.build_command().output()?;

    assert!(
        output.status.success(),
        "Build should work with initialized config. stdout: {}",
        stdout_of(&output)
    );
    assert!(test.root().join("public/data/app-data.json").exists());

    Ok(())
}

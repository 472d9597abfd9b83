use imposter::package;
use imposter::{ProjectConfig, Transformer};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(
        &root.join("composer.json"),
        r#"{
            "require": {"php": "^8.1", "acme/http": "^2.0", "acme/own": "*"},
            "config": {"vendor-dir": "lib/vendor"},
            "extra": {
                "imposter": {
                    "namespace": "MyPlugin\\Vendor",
                    "excludes": ["acme/own"],
                    "useExcludes": ["Psr\\\\Log"],
                    "extendsNamespace": ["\\\\Acme"]
                }
            }
        }"#,
    );

    let vendor = root.join("lib/vendor");
    write(
        &vendor.join("acme/http/composer.json"),
        r#"{
            "require": {"acme/support": "*"},
            "autoload": {"psr-4": {"Acme\\Http\\": "src/"}, "files": ["functions.php"]}
        }"#,
    );
    write(
        &vendor.join("acme/http/src/Client.php"),
        "<?php\nnamespace Acme\\Http;\n\nuse Acme\\Support\\Str;\nuse Psr\\Log\\LoggerInterface;\nuse Composer\\Autoload\\ClassLoader;\n\nclass Client extends \\Acme\\Support\\Base\n{\n}\n",
    );
    write(
        &vendor.join("acme/http/functions.php"),
        "<?php\nnamespace Acme\\Http;\n\nuse function Acme\\Support\\tap;\nuse const Acme\\Support\\VERSION;\n",
    );
    write(&vendor.join("acme/http/README.md"), "namespace Docs;");

    write(
        &vendor.join("acme/support/composer.json"),
        r#"{"autoload": {"classmap": ["classes/"]}}"#,
    );
    write(
        &vendor.join("acme/support/classes/Str.php"),
        "<?php\nnamespace Acme\\Support;\n\nclass Str {}\n",
    );

    write(
        &vendor.join("acme/own/composer.json"),
        r#"{"autoload": {"psr-4": {"Own\\": "src/"}}}"#,
    );
    write(&vendor.join("acme/own/src/Own.php"), "<?php\nnamespace Own;\n");

    dir
}

fn read(dir: &TempDir, rel: &str) -> String {
    fs::read_to_string(dir.path().join(rel)).unwrap()
}

fn run(dir: &TempDir) -> imposter::TransformReport {
    let project = ProjectConfig::load(dir.path()).unwrap();
    let discovery = package::autoload_targets(&project).unwrap();
    Transformer::new(&project.transform)
        .unwrap()
        .transform_all(&discovery.targets)
}

#[test]
fn prefixes_every_autoloaded_dependency() {
    let dir = project();
    let report = run(&dir);

    assert!(!report.has_failures());
    assert_eq!(report.namespace, "MyPlugin\\Vendor");
    assert_eq!(report.summary.total, 3);
    assert_eq!(report.summary.changed, 3);

    assert_eq!(
        read(&dir, "lib/vendor/acme/http/src/Client.php"),
        "<?php\nnamespace MyPlugin\\Vendor\\Acme\\Http;\n\nuse MyPlugin\\Vendor\\Acme\\Support\\Str;\nuse Psr\\Log\\LoggerInterface;\nuse Composer\\Autoload\\ClassLoader;\n\nclass Client extends \\MyPlugin\\Vendor\\Acme\\Support\\Base\n{\n}\n"
    );
    assert_eq!(
        read(&dir, "lib/vendor/acme/http/functions.php"),
        "<?php\nnamespace MyPlugin\\Vendor\\Acme\\Http;\n\nuse function MyPlugin\\Vendor\\Acme\\Support\\tap;\nuse const MyPlugin\\Vendor\\Acme\\Support\\VERSION;\n"
    );
    assert_eq!(
        read(&dir, "lib/vendor/acme/support/classes/Str.php"),
        "<?php\nnamespace MyPlugin\\Vendor\\Acme\\Support;\n\nclass Str {}\n"
    );
}

#[test]
fn leaves_excluded_packages_and_non_php_files_alone() {
    let dir = project();
    run(&dir);

    assert_eq!(read(&dir, "lib/vendor/acme/own/src/Own.php"), "<?php\nnamespace Own;\n");
    assert_eq!(read(&dir, "lib/vendor/acme/http/README.md"), "namespace Docs;");
}

#[test]
fn second_run_is_a_no_op() {
    let dir = project();
    run(&dir);
    let before = read(&dir, "lib/vendor/acme/http/src/Client.php");

    let report = run(&dir);

    assert_eq!(report.summary.changed, 0);
    assert_eq!(report.summary.replacements, 0);
    assert!(report.files.iter().all(|f| !f.written));
    assert_eq!(read(&dir, "lib/vendor/acme/http/src/Client.php"), before);
}

#[test]
fn bad_pattern_fails_before_touching_files() {
    let dir = project();
    let mut project = ProjectConfig::load(dir.path()).unwrap();
    project.transform.exclusions.use_excludes.push("(unclosed".to_string());

    let err = Transformer::new(&project.transform).err().unwrap();

    assert_eq!(err.code.as_str(), "config.invalid_pattern");
    assert_eq!(err.details["pattern"], "(unclosed");
    assert_eq!(
        read(&dir, "lib/vendor/acme/support/classes/Str.php"),
        "<?php\nnamespace Acme\\Support;\n\nclass Str {}\n"
    );
}

//! End-to-end tests for `--list-hostnames`, hosts file provisioning and
//! `--remove-hosts`.

mod common;
use common::prelude::*;

use std::fs;

const EXPECTED_HOSTNAMES: &str = "stand-alone-app-development.local
stand-alone-app-production.local
stand-alone-app-test.local
shared-development.local
sub-uri-app-bar-production.local
sub-uri-app-bar-test.local
sub-uri-app-foo-production.local
sub-uri-app-foo-test.local
";

#[test]
fn test_list_hostnames() {
    let fixture = TestFixture::new().with_standard_apps();

    fixture
        .command()
        .arg("--list-hostnames")
        .assert()
        .success()
        .stdout(EXPECTED_HOSTNAMES);

    assert!(!fixture.config_root().exists());
    fixture
        .project("stand_alone_app/.webconfig.yml")
        .assert(predicate::path::missing());
}

#[test]
fn test_list_hostnames_filtered() {
    let fixture = TestFixture::new().with_standard_apps();

    fixture
        .command()
        .args(["--list-hostnames", "-e", "development"])
        .assert()
        .success()
        .stdout("stand-alone-app-development.local\nshared-development.local\n");
}

#[test]
fn test_add_and_remove_hosts() {
    let fixture = TestFixture::new().with_standard_apps();
    fs::write(
        fixture.hosts_file(),
        "127.0.0.1 localhost\n10.1.1.1 stand-alone-app-test.local\n",
    )
    .unwrap();

    fixture
        .bare_command()
        .args(["--add-hosts", "--no-restart-nginx", "--create-config-root", "-l"])
        .arg(fixture.config_root())
        .arg(fixture.projects_dir())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "The following hostnames were added for 127.0.0.1:",
        ))
        .stdout(predicate::str::contains("  shared-development.local\n"))
        .stdout(predicate::str::contains("stand-alone-app-test.local -> 10.1.1.1"));

    let hosts = fs::read_to_string(fixture.hosts_file()).unwrap();
    assert!(hosts.starts_with("127.0.0.1 localhost\n10.1.1.1 stand-alone-app-test.local\n"));
    assert!(hosts.contains("127.0.0.1 shared-development.local # webconfig\n"));
    assert_eq!(hosts.matches("# webconfig").count(), 7);
    let global = fs::read_to_string(fixture.generated("global_config.yml")).unwrap();
    assert!(global.contains("- shared-development.local"));

    fixture
        .bare_command()
        .args(["--remove-hosts", "-l"])
        .arg(fixture.config_root())
        .assert()
        .success()
        .stdout(predicate::str::contains("removed 7 entries"));

    assert_eq!(
        fs::read_to_string(fixture.hosts_file()).unwrap(),
        "127.0.0.1 localhost\n10.1.1.1 stand-alone-app-test.local\n"
    );
    let global = fs::read_to_string(fixture.generated("global_config.yml")).unwrap();
    assert!(!global.contains("shared-development.local"));
}

#[test]
fn test_hosts_already_present_are_counted() {
    let fixture = TestFixture::new().with_app("stand_alone_app", None);
    fs::write(
        fixture.hosts_file(),
        "127.0.0.1 stand-alone-app-development.local stand-alone-app-test.local\n",
    )
    .unwrap();

    fixture
        .bare_command()
        .args(["--no-restart-nginx", "--create-config-root", "-l"])
        .arg(fixture.config_root())
        .arg(fixture.projects_dir())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 hosts were already setup correctly"));

    let hosts = fs::read_to_string(fixture.hosts_file()).unwrap();
    assert!(hosts.ends_with("127.0.0.1 stand-alone-app-production.local # webconfig\n"));
}

#[test]
fn test_test_mode_only_reports_hostnames() {
    let fixture = TestFixture::new().with_app("stand_alone_app", None);
    fs::write(fixture.hosts_file(), "127.0.0.1 localhost\n").unwrap();

    fixture
        .bare_command()
        .args(["--test-mode", "--add-hosts", "--no-restart-nginx", "--create-config-root", "-l"])
        .arg(fixture.config_root())
        .arg(fixture.projects_dir())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "would have added stand-alone-app-test.local -> 127.0.0.1",
        ))
        .stdout(predicate::str::contains("were added").not());

    assert_eq!(
        fs::read_to_string(fixture.hosts_file()).unwrap(),
        "127.0.0.1 localhost\n"
    );
    assert!(!fixture.config_root().exists());
}

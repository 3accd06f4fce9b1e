//! Integration tests for argocd-helm-ext-plugin

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use serial_test::serial;

    fn plugin() -> Command {
        cargo_bin_cmd!("argocd-helm-ext-plugin")
    }

    #[test]
    #[serial]
    fn help_displays() {
        plugin()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--include-crds"))
            .stdout(predicate::str::contains("--debug"));
    }

    #[test]
    #[serial]
    fn version_displays() {
        plugin()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("argocd-helm-ext-plugin"));
    }

    #[test]
    #[serial]
    fn unknown_flag_prints_usage() {
        plugin()
            .arg("--bogus")
            .assert()
            .failure()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("Usage"));
    }

    #[test]
    #[serial]
    fn missing_variables_reported_one_at_a_time() {
        let temp = tempfile::TempDir::new().unwrap();
        let steps = [
            ("ARGOCD_APP_NAME", "test"),
            ("HELM_REPO_URL", "https://test.local"),
            ("HELM_CHART", "test_chart"),
            ("HELM_CHART_VERSION", "1.0.0"),
        ];
        let mut set: Vec<(&str, &str)> = Vec::new();

        for (name, value) in steps {
            plugin()
                .env_clear()
                .env("TMPDIR", temp.path())
                .envs(set.iter().copied())
                .arg("--debug")
                .assert()
                .failure()
                .stdout(predicate::str::is_empty())
                .stderr(predicate::str::contains(format!("{} is empty", name)));
            set.push((name, value));
        }
    }
}

#[cfg(unix)]
mod render_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use serial_test::serial;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const FAKE_HELM: &str = "#!/bin/sh\necho \"# args: $*\"\necho \"kind: ConfigMap\"\n";
    const FAILING_HELM: &str = "#!/bin/sh\necho \"Error: chart not found\" >&2\nexit 1\n";

    struct Fixture {
        temp: TempDir,
        helm: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_helm(FAKE_HELM)
        }

        fn with_helm(script: &str) -> Self {
            let temp = TempDir::new().unwrap();
            let helm = temp.path().join("helm");
            std::fs::write(&helm, script).unwrap();
            std::fs::set_permissions(&helm, std::fs::Permissions::from_mode(0o755)).unwrap();
            Self { temp, helm }
        }

        fn dir(&self) -> &Path {
            self.temp.path()
        }

        /// Plugin command with the required variables and the file cache
        fn plugin(&self, revision: &str) -> Command {
            let mut cmd = cargo_bin_cmd!("argocd-helm-ext-plugin");
            cmd.env_clear()
                .env("TMPDIR", self.dir())
                .env("HELM_BINARY", &self.helm)
                .env("HELM_VALUES_CACHE", "file")
                .env("ARGOCD_APP_NAMESPACE", "apps")
                .env("ARGOCD_APP_NAME", "web")
                .env("ARGOCD_APP_REVISION", revision)
                .env("HELM_REPO_URL", "https://charts.example.com")
                .env("HELM_CHART", "mychart")
                .env("HELM_CHART_VERSION", "1.0.0");
            cmd
        }
    }

    const BASE_ARGS: &str =
        "template web mychart --repo https://charts.example.com --version 1.0.0";

    #[test]
    #[serial]
    fn stdout_is_exactly_the_manifest() {
        let fx = Fixture::new();
        let expected = format!("# args: {}\nkind: ConfigMap\n", BASE_ARGS);

        fx.plugin("r1")
            .assert()
            .success()
            .stdout(expected.clone());

        let manifest = std::fs::read_to_string(fx.dir().join("manifest-apps-web.yaml")).unwrap();
        assert_eq!(manifest, expected);
    }

    #[test]
    #[serial]
    fn inline_values_are_passed_and_saved() {
        let fx = Fixture::new();

        fx.plugin("r1")
            .env("ARGOCD_ENV_HELM_VALUES", "image.tag=0123; replicaCount = 2;broken")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "--set-string image.tag=0123 --set replicaCount=2",
            ));

        let saved = std::fs::read_to_string(fx.dir().join("helm-values-r1")).unwrap();
        assert_eq!(saved, "image.tag=0123;replicaCount=2");
    }

    #[test]
    #[serial]
    fn saved_values_are_reused() {
        let fx = Fixture::new();

        fx.plugin("r1")
            .env("HELM_VALUES", "image.tag=v2")
            .assert()
            .success();

        fx.plugin("r1")
            .assert()
            .success()
            .stdout(predicate::str::contains("--set-string image.tag=v2"));
    }

    #[test]
    #[serial]
    fn inline_values_replace_saved_values() {
        let fx = Fixture::new();

        fx.plugin("r1")
            .env("HELM_VALUES", "image.tag=v1;replicaCount=4")
            .assert()
            .success();

        fx.plugin("r1")
            .env("HELM_VALUES", "image.tag=v2")
            .assert()
            .success()
            .stdout(predicate::str::contains("replicaCount").not());

        fx.plugin("r1")
            .assert()
            .success()
            .stdout(predicate::str::contains("--set-string image.tag=v2"))
            .stdout(predicate::str::contains("replicaCount").not());
    }

    #[test]
    #[serial]
    fn no_values_means_no_set_flags() {
        let fx = Fixture::new();

        fx.plugin("fresh")
            .assert()
            .success()
            .stdout(predicate::str::contains("--set").not());
    }

    #[test]
    #[serial]
    fn missing_value_files_are_skipped() {
        let fx = Fixture::new();
        let present = fx.dir().join("values.yaml");
        std::fs::write(&present, "replicaCount: 1\n").unwrap();
        let missing = fx.dir().join("values-missing.yaml");

        fx.plugin("r1")
            .env(
                "HELM_VALUE_FILES",
                format!("{} {}", missing.display(), present.display()),
            )
            .assert()
            .success()
            .stdout(predicate::str::contains(format!("-f {}", present.display())))
            .stdout(predicate::str::contains("values-missing").not());
    }

    #[test]
    #[serial]
    fn include_crds_from_flag_or_env() {
        let fx = Fixture::new();

        fx.plugin("r1")
            .arg("-c")
            .assert()
            .success()
            .stdout(predicate::str::contains("--include-crds"));

        fx.plugin("r1")
            .env("ARGOCD_ENV_HELM_INCLUDE_CRDS", "true")
            .assert()
            .success()
            .stdout(predicate::str::contains("--include-crds"));
    }

    #[test]
    #[serial]
    fn helm_failure_names_chart_and_version() {
        let fx = Fixture::with_helm(FAILING_HELM);

        fx.plugin("r1")
            .assert()
            .failure()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("Generate mychart v1.0.0 template fail"));

        assert!(!fx.dir().join("manifest-apps-web.yaml").exists());
    }

    #[test]
    #[serial]
    fn redis_backend_without_service_variables_fails() {
        let fx = Fixture::new();

        fx.plugin("r1")
            .env("HELM_VALUES_CACHE", "redis")
            .assert()
            .failure()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("redis host or port"));
    }

    #[test]
    #[serial]
    fn logs_go_to_application_log_file() {
        let fx = Fixture::new();

        fx.plugin("r1")
            .env("HELM_VALUES", "image.tag=v9")
            .assert()
            .success();

        let log = std::fs::read_to_string(fx.dir().join("plugin-apps-web.log")).unwrap();
        assert!(log.contains("load helm values from env.: image.tag=v9"));
        assert!(log.contains("Execute(r1)"));
    }

    #[test]
    #[serial]
    fn env_flag_writes_environment_dump() {
        let fx = Fixture::new();

        fx.plugin("r1").arg("--env").assert().success();

        let dump = std::fs::read_to_string(fx.dir().join("env-apps-web.log")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&dump).unwrap();
        assert_eq!(parsed["HELM_CHART"], "mychart");
    }
}

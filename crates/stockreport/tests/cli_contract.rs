use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::Connection;
use serde_json::{Value, json};
use stockreport::sqlite::apply_reference_schema;

const EXIT_SUCCESS: i32 = 0;
const EXIT_RUNTIME_FAILURE: i32 = 1;
const EXIT_USAGE_ERROR: i32 = 64;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("{prefix}-{nanos}"))
}

/// A working directory with `data/veritabani.db` holding a small store.
fn seeded_cwd(prefix: &str) -> PathBuf {
    let cwd = unique_temp_dir(prefix);
    let data_dir = cwd.join("data");
    std::fs::create_dir_all(&data_dir).expect("data dir should be creatable");
    let connection =
        Connection::open(data_dir.join("veritabani.db")).expect("fixture db should open");
    apply_reference_schema(&connection).expect("reference schema should apply");
    connection
        .execute_batch(
            r#"
            INSERT INTO stok (barkod, ad, miktar, alisFiyati) VALUES ('1', 'Tea', 4, 2.5);
            INSERT INTO musteriler (id, ad, bakiye) VALUES ('c-1', 'Ayse', 3.5);
            "#,
        )
        .expect("fixture rows should insert");
    cwd
}

fn run(binary: &str, cwd: &Path, args: &[&str]) -> Output {
    Command::new(binary)
        .arg("--cwd")
        .arg(cwd)
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("command should execute")
}

fn single_json_line(output: &Output) -> Value {
    let stdout = String::from_utf8(output.stdout.clone()).expect("stdout should be utf-8");
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 1, "stdout should be one line: {stdout:?}");
    serde_json::from_str(lines[0]).expect("stdout should be json")
}

#[test]
fn every_command_prints_one_success_envelope() {
    let cwd = seeded_cwd("stockreport-cli-success");
    let cases = [
        (env!("CARGO_BIN_EXE_stockreport"), vec!["analyze"], "data analysis completed"),
        (env!("CARGO_BIN_EXE_stockreport"), vec!["report", "inventory"], "inventory report generated"),
        (env!("CARGO_BIN_EXE_stockreport"), vec!["status"], "database status collected"),
        (env!("CARGO_BIN_EXE_analyze-data"), vec![], "data analysis completed"),
        (env!("CARGO_BIN_EXE_generate-report"), vec!["customers"], "customers report generated"),
    ];

    for (binary, args, message) in cases {
        let output = run(binary, &cwd, &args);
        assert_eq!(output.status.code(), Some(EXIT_SUCCESS), "{binary} {args:?}");
        let envelope = single_json_line(&output);
        assert_eq!(envelope["success"], json!(true), "{binary} {args:?}");
        assert_eq!(envelope["message"], json!(message));
    }
}

#[test]
fn analysis_output_reflects_the_database() {
    let cwd = seeded_cwd("stockreport-cli-analysis");

    let envelope = single_json_line(&run(env!("CARGO_BIN_EXE_analyze-data"), &cwd, &[]));

    assert_eq!(envelope["analysis"]["total_stock"], json!(1));
    assert_eq!(envelope["analysis"]["total_stock_value"], json!(10.0));
    assert_eq!(envelope["analysis"]["total_customers"], json!(1));
    assert_eq!(envelope["analysis"]["low_stock"][0]["name"], json!("Tea"));
    assert!(envelope["timestamp"].is_string());
}

#[test]
fn missing_database_prints_failure_and_exits_zero() {
    let cwd = unique_temp_dir("stockreport-cli-missing");
    std::fs::create_dir_all(&cwd).expect("cwd should be creatable");
    let cases = [
        (env!("CARGO_BIN_EXE_stockreport"), vec!["analyze"], "data analysis failed"),
        (env!("CARGO_BIN_EXE_stockreport"), vec!["backup"], "database backup failed"),
        (env!("CARGO_BIN_EXE_stockreport"), vec!["report"], "report generation failed"),
        (env!("CARGO_BIN_EXE_stockreport"), vec!["status"], "database status check failed"),
        (env!("CARGO_BIN_EXE_analyze-data"), vec![], "data analysis failed"),
        (env!("CARGO_BIN_EXE_backup-db"), vec![], "database backup failed"),
        (env!("CARGO_BIN_EXE_generate-report"), vec!["monthly"], "report generation failed"),
    ];

    for (binary, args, message) in cases {
        let output = run(binary, &cwd, &args);
        assert_eq!(output.status.code(), Some(EXIT_SUCCESS), "{binary} {args:?}");
        let envelope = single_json_line(&output);
        assert_eq!(envelope["success"], json!(false));
        assert_eq!(envelope["message"], json!(message));
        assert!(
            envelope["error"].as_str().is_some_and(|error| !error.is_empty()),
            "error should be a non-empty string: {envelope}"
        );
    }
    assert!(
        !cwd.join("data").join("veritabani.db").exists(),
        "no command may create the database"
    );
}

#[test]
fn report_mode_defaults_to_monthly() {
    let cwd = seeded_cwd("stockreport-cli-default-mode");

    for (binary, args) in [
        (env!("CARGO_BIN_EXE_generate-report"), vec![]),
        (env!("CARGO_BIN_EXE_stockreport"), vec!["report"]),
    ] {
        let envelope = single_json_line(&run(binary, &cwd, &args));
        assert_eq!(envelope["message"], json!("monthly report generated"));
        assert_eq!(envelope["report"]["report_type"], json!("monthly"));
        assert_eq!(
            envelope["report"]["data"]["monthly_sales"]["total_sales"],
            json!(0)
        );
    }
}

#[test]
fn unknown_report_mode_succeeds_with_empty_data() {
    let cwd = seeded_cwd("stockreport-cli-unknown-mode");

    let output = run(env!("CARGO_BIN_EXE_generate-report"), &cwd, &["bogus"]);

    assert_eq!(output.status.code(), Some(EXIT_SUCCESS));
    let envelope = single_json_line(&output);
    assert_eq!(envelope["success"], json!(true));
    assert_eq!(envelope["message"], json!("bogus report generated"));
    assert_eq!(envelope["report"]["report_type"], json!("bogus"));
    assert_eq!(envelope["report"]["data"], json!({}));
}

#[test]
fn backup_binary_writes_into_the_backups_directory() {
    let cwd = seeded_cwd("stockreport-cli-backup");

    let output = run(env!("CARGO_BIN_EXE_backup-db"), &cwd, &[]);

    assert_eq!(output.status.code(), Some(EXIT_SUCCESS));
    let envelope = single_json_line(&output);
    assert_eq!(envelope["success"], json!(true));
    let backup_path = PathBuf::from(
        envelope["backup_path"]
            .as_str()
            .expect("backup_path should be a string"),
    );
    assert_eq!(backup_path.parent(), Some(cwd.join("data").join("backups").as_path()));
    let file_name = backup_path
        .file_name()
        .and_then(|name| name.to_str())
        .expect("backup file name should be utf-8");
    assert!(file_name.starts_with("backup_") && file_name.ends_with(".db"));
    assert!(backup_path.is_file());
    assert_eq!(envelope["table_counts"]["stok"], json!(1));
    assert_eq!(envelope["table_counts"]["musteriler"], json!(1));
}

#[test]
fn data_dir_flag_points_at_another_directory() {
    let seeded = seeded_cwd("stockreport-cli-data-dir");
    let elsewhere = unique_temp_dir("stockreport-cli-data-dir-cwd");
    std::fs::create_dir_all(&elsewhere).expect("cwd should be creatable");
    let data_dir = seeded.join("data");

    let output = run(
        env!("CARGO_BIN_EXE_stockreport"),
        &elsewhere,
        &["--data-dir", data_dir.to_str().expect("utf-8 temp path"), "status"],
    );

    let envelope = single_json_line(&output);
    assert_eq!(envelope["success"], json!(true));
    assert_eq!(
        envelope["status"]["database_path"],
        json!(data_dir.join("veritabani.db").display().to_string())
    );
}

#[test]
fn relative_cwd_is_reported_in_the_envelope() {
    let output = Command::new(env!("CARGO_BIN_EXE_stockreport"))
        .args(["--cwd", "relative/dir", "analyze"])
        .env("RUST_LOG", "off")
        .output()
        .expect("command should execute");

    assert_eq!(output.status.code(), Some(EXIT_SUCCESS));
    let envelope = single_json_line(&output);
    assert_eq!(envelope["success"], json!(false));
    assert!(
        envelope["error"]
            .as_str()
            .is_some_and(|error| error.contains("cwd must be absolute")),
        "{envelope}"
    );
}

#[test]
fn schema_command_covers_every_envelope() {
    let cwd = unique_temp_dir("stockreport-cli-schema");
    std::fs::create_dir_all(&cwd).expect("cwd should be creatable");

    let envelope = single_json_line(&run(env!("CARGO_BIN_EXE_stockreport"), &cwd, &["schema"]));

    assert_eq!(envelope["success"], json!(true));
    let schemas = envelope["schemas"]
        .as_object()
        .expect("schemas should be an object");
    let mut names: Vec<_> = schemas.keys().map(String::as_str).collect();
    names.sort_unstable();
    assert_eq!(names, ["analyze", "backup", "report", "status"]);
}

#[test]
fn usage_errors_exit_with_usage_code() {
    let cases = [
        (env!("CARGO_BIN_EXE_stockreport"), vec!["explode"]),
        (env!("CARGO_BIN_EXE_stockreport"), vec![]),
        (env!("CARGO_BIN_EXE_backup-db"), vec!["--cwd"]),
    ];

    for (binary, args) in cases {
        let output = Command::new(binary)
            .args(&args)
            .env("RUST_LOG", "off")
            .output()
            .expect("command should execute");
        assert_eq!(output.status.code(), Some(EXIT_USAGE_ERROR), "{binary} {args:?}");
        assert!(output.stdout.is_empty(), "usage errors print nothing on stdout");
    }
}

#[test]
fn script_binaries_ignore_trailing_arguments() {
    let cwd = seeded_cwd("stockreport-cli-trailing");
    let cases = [
        (env!("CARGO_BIN_EXE_analyze-data"), vec!["extra", "--verbose"], "data analysis completed"),
        (env!("CARGO_BIN_EXE_backup-db"), vec!["now", "-f"], "database backed up successfully"),
        (env!("CARGO_BIN_EXE_generate-report"), vec!["inventory", "customers"], "inventory report generated"),
    ];

    for (binary, args, message) in cases {
        let output = run(binary, &cwd, &args);
        assert_eq!(output.status.code(), Some(EXIT_SUCCESS), "{binary} {args:?}");
        let envelope = single_json_line(&output);
        assert_eq!(envelope["success"], json!(true), "{binary} {args:?}");
        assert_eq!(envelope["message"], json!(message));
    }
}

#[test]
fn hyphenated_report_mode_is_an_unknown_mode() {
    let cwd = seeded_cwd("stockreport-cli-hyphen-mode");

    let output = run(env!("CARGO_BIN_EXE_generate-report"), &cwd, &["-x"]);

    assert_eq!(output.status.code(), Some(EXIT_SUCCESS));
    let envelope = single_json_line(&output);
    assert_eq!(envelope["success"], json!(true));
    assert_eq!(envelope["report"]["report_type"], json!("-x"));
    assert_eq!(envelope["report"]["data"], json!({}));
}

#[test]
fn default_database_sits_beside_the_install_directory() {
    let install = unique_temp_dir("stockreport-cli-install");
    let bin_dir = install.join("bin");
    std::fs::create_dir_all(&bin_dir).expect("bin dir should be creatable");
    let installed = bin_dir.join("analyze-data");
    std::fs::copy(env!("CARGO_BIN_EXE_analyze-data"), &installed)
        .expect("binary should be copyable");

    let seeded = seeded_cwd("stockreport-cli-install-data");
    std::fs::rename(seeded.join("data"), install.join("data"))
        .expect("data dir should move into the install root");

    let elsewhere = unique_temp_dir("stockreport-cli-install-elsewhere");
    std::fs::create_dir_all(&elsewhere).expect("unrelated cwd should be creatable");

    let output = Command::new(&installed)
        .current_dir(&elsewhere)
        .env("RUST_LOG", "off")
        .output()
        .expect("installed binary should execute");

    assert_eq!(output.status.code(), Some(EXIT_SUCCESS));
    let envelope = single_json_line(&output);
    assert_eq!(envelope["success"], json!(true), "{envelope}");
    assert_eq!(envelope["analysis"]["total_stock"], json!(1));
    assert!(!elsewhere.join("data").exists());
}

#[test]
fn help_exits_successfully() {
    let status = Command::new(env!("CARGO_BIN_EXE_stockreport"))
        .arg("--help")
        .status()
        .expect("command should execute");

    assert_eq!(status.code(), Some(EXIT_SUCCESS));
}

#[cfg(target_os = "linux")]
#[test]
fn unwritable_stdout_is_a_runtime_failure_reported_once() {
    let full = std::fs::OpenOptions::new()
        .write(true)
        .open("/dev/full")
        .expect("/dev/full should be writable");

    let output = Command::new(env!("CARGO_BIN_EXE_stockreport"))
        .arg("schema")
        .env_remove("RUST_LOG")
        .stdout(full)
        .stderr(std::process::Stdio::piped())
        .output()
        .expect("command should execute");

    assert_eq!(output.status.code(), Some(EXIT_RUNTIME_FAILURE));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(
        stderr.matches("failed to write envelope").count(),
        1,
        "stderr: {stderr}"
    );
}

//! Merged tree verification through the CLI binary.

use super::test_utils::{write_tree, Sandbox};

#[test]
fn test_verify_passes_with_both_entries() {
    let sandbox = Sandbox::new();
    write_tree(
        &sandbox.workspace.join("dist"),
        &[("student.html", "s"), ("admin.html", "a")],
    );

    let output = sandbox.command().arg("verify").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("student.html, admin.html"), "stdout={}", stdout);
}

#[test]
fn test_verify_names_missing_admin_entry() {
    let sandbox = Sandbox::new();
    write_tree(&sandbox.workspace.join("dist"), &[("student.html", "s")]);

    let output = sandbox.command().arg("verify").output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("admin.html"), "stderr={}", stderr);
}

#[test]
fn test_verify_uses_configured_variant_ids() {
    let sandbox = Sandbox::new();
    sandbox.write_config(
        r#"
[variants.baseline]
id = "public"
out_dir = "dist-public-temp"

[variants.overlay]
id = "staff"
out_dir = "dist-staff-temp"
"#,
    );
    write_tree(
        &sandbox.workspace.join("dist"),
        &[("public.html", "p"), ("admin.html", "a")],
    );

    let output = sandbox.command().arg("verify").output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("staff.html"));
}

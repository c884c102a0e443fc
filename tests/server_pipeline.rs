mod common;

use common::{specgen, stdout_json, task_ids, Workspace, INVALID_SPEC, VALID_SPEC};
use serde_json::Value;
use std::path::PathBuf;

const PROJECT: &str = "modules/sales/order-api/server";
const INTERNAL_SPEC: &str = "modules/sales/order-api/doc/src/main/openapi/internal/openapi.yaml";
const PAYMENTS_SPEC: &str =
    "modules/sales/order-api/doc/src/main/openapi/external/Payments/openapi.yaml";
const API_PACKAGE: &str = "io.github.javenue.shopapp.sales.orderapi.openapi.apis";

fn server_workspace() -> (Workspace, PathBuf) {
    let ws = Workspace::create();
    ws.write(INTERNAL_SPEC, VALID_SPEC);
    ws.write(PAYMENTS_SPEC, VALID_SPEC);
    let project = ws.mkdir(PROJECT);
    write_config(&ws, r#"{ "pipeline": "server" }"#);
    (ws, project)
}

fn write_config(ws: &Workspace, json: &str) {
    ws.write(&format!("{PROJECT}/openapi-generator.json"), json);
}

#[test]
fn plan_adds_server_step_and_java_clients() {
    let (_ws, project) = server_workspace();

    let plan = stdout_json(&specgen(&["plan"], &project));
    assert_eq!(
        plan["config"]["basePackage"].as_str(),
        Some("io.github.javenue.shopapp.sales.orderapi")
    );
    let ids = task_ids(&plan);
    assert_eq!(
        ids,
        vec![
            "validate_internal",
            "generate_internal_server",
            "generate_internal",
            "validate_Payments",
            "generate_Payments",
            "generateAllCode",
        ]
    );
    assert_eq!(plan["sourceSet"]["compileTask"].as_str(), Some("compileJava"));
    let source_root = plan["sourceSet"]["root"].as_str().expect("source root");
    assert!(source_root.ends_with("build/generated/openapi/src/main/java"));
}

#[test]
fn base_package_flag_wins_over_synthesized_default() {
    let (_ws, project) = server_workspace();

    let output = specgen(&["resolve", "--base-package", "com.acme.orders"], &project);
    let resolved = stdout_json(&output);
    assert_eq!(resolved["basePackage"].as_str(), Some("com.acme.orders"));

    let output = specgen(&["resolve", "--base-package", "Com.Acme-Orders"], &project);
    assert!(!output.status.success());
}

#[test]
fn run_passes_packages_to_generator() {
    let (ws, project) = server_workspace();

    let output = ws.run(&[], &project);
    assert!(
        output.status.success(),
        "run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let calls = ws.generator_calls();
    let server = calls
        .iter()
        .find(|call| call.contains("-g spring"))
        .expect("server generation call");
    assert!(server.contains(&format!("--api-package {API_PACKAGE}")));
    assert!(server.contains("OffsetDateTime=java.time.LocalDateTime"));
    let client = calls
        .iter()
        .find(|call| call.contains("-g java") && call.contains("external.payments"))
        .expect("external client call");
    assert!(client.contains("--global-property"));
    let out = project.join("build/generated/openapi");
    assert!(out.join(".generated").is_file());
}

#[test]
fn invalid_internal_spec_blocks_server_and_client_steps() {
    let (ws, project) = server_workspace();
    ws.write(INTERNAL_SPEC, INVALID_SPEC);

    let output = ws.run(&["--json"], &project);
    assert!(!output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).expect("run report");
    let status_of = |id: &str| {
        report["steps"]
            .as_array()
            .expect("steps")
            .iter()
            .find(|step| step["id"] == id)
            .and_then(|step| step["status"].as_str())
            .unwrap_or_default()
            .to_string()
    };
    assert_eq!(status_of("validate_internal"), "failed");
    assert_eq!(status_of("generate_internal_server"), "skipped");
    assert_eq!(status_of("generate_internal"), "skipped");
    assert_eq!(status_of("generate_Payments"), "succeeded");
    assert_eq!(status_of("generateAllCode"), "failed");
}

#[test]
fn external_api_clashing_with_server_step_is_rejected() {
    let (ws, project) = server_workspace();
    ws.write(
        "modules/sales/order-api/doc/src/main/openapi/external/internal_server/openapi.yaml",
        VALID_SPEC,
    );

    let output = specgen(&["plan"], &project);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("'internal_server' collides"));
}

#[test]
fn missing_internal_spec_fails_at_validate_time() {
    let ws = Workspace::create();
    let project = ws.mkdir(PROJECT);

    let plan = stdout_json(&specgen(&["plan", "--pipeline", "server"], &project));
    assert!(task_ids(&plan).contains(&"validate_internal".to_string()));

    let output = ws.run(&["validate_internal", "--pipeline", "server"], &project);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("spec not found"));
    assert!(ws.generator_calls().is_empty());
}

use serde_json::Value;

mod common;

use common::{run_hed, stderr_error_type, stdout_json};

fn function_names(response: &Value) -> Vec<String> {
    response["functions"]
        .as_array()
        .expect("functions should be an array")
        .iter()
        .map(|entry| {
            entry["name"]
                .as_str()
                .expect("function name should be a string")
                .to_string()
        })
        .collect()
}

#[test]
fn help_lists_every_subcommand() {
    let output = run_hed(&["--help"]);
    assert!(output.status.success());
    let help = String::from_utf8_lossy(&output.stdout);
    for command in ["group", "parse", "functions"] {
        assert!(help.contains(command), "help should mention {command}: {help}");
    }
}

#[test]
fn parse_prints_normalized_tree() {
    let response = stdout_json(&run_hed(&["parse", "s/^h_/ { line_width 2 }", "t/x/y/"]));
    let expressions = response["expressions"]
        .as_array()
        .expect("expressions should be an array");
    assert_eq!(expressions.len(), 2);

    let block = &expressions[0];
    assert_eq!(block["normalized"], "sg/^h_/ { g line_width 2 }");
    assert_eq!(block["flags"]["select"], true);
    assert_eq!(block["regex"], "^h_");
    assert!(block.get("substitution").is_none());
    assert_eq!(block["payload"]["kind"], "exprs");
    let child = &block["payload"]["children"][0];
    assert_eq!(child["payload"]["kind"], "histogram_function");
    assert_eq!(child["payload"]["name"], "line_width");

    assert_eq!(expressions[1]["substitution"], "y");
    assert_eq!(expressions[1]["payload"]["kind"], "none");
}

#[test]
fn canvas_functions_need_canvas_flag() {
    let response = stdout_json(&run_hed(&["parse", "-g", "margin 0.1"]));
    assert_eq!(
        response["expressions"][0]["payload"]["kind"],
        "canvas_function"
    );

    let output = run_hed(&["parse", "margin 0.1"]);
    assert_eq!(stderr_error_type(&output), "unknown_function");
}

#[test]
fn parse_failures_are_reported_as_json_on_stderr() {
    let output = run_hed(&["parse", "s/^h_"]);
    assert_eq!(stderr_error_type(&output), "parse_error");
    assert!(output.stdout.is_empty());
}

#[test]
fn functions_lists_histogram_registry_by_default() {
    let response = stdout_json(&run_hed(&["functions"]));
    assert_eq!(response["target"], "histogram");
    assert_eq!(response["delimiter"], " ");
    let names = function_names(&response);
    assert!(names.contains(&"norm".to_string()));
    assert!(names.contains(&"line_color".to_string()));
    assert!(!names.contains(&"margin".to_string()));
}

#[test]
fn functions_canvas_lists_canvas_registry() {
    let response = stdout_json(&run_hed(&["functions", "--canvas"]));
    assert_eq!(response["target"], "canvas");
    assert_eq!(response["delimiter"], ",");
    let names = function_names(&response);
    assert!(names.contains(&"margin".to_string()));
    assert!(names.contains(&"log".to_string()));
    assert!(response["functions"][0]["signature"].as_str().is_some());
}

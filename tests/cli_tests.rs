use assert_cmd::Command;
use predicates::prelude::*;
use rust_decimal::Decimal;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn furrow_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("furrow"))
}

fn run(dir: &Path, args: &[&str]) {
    furrow_cmd().args(args).current_dir(dir).assert().success();
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = furrow_cmd()
        .args(args)
        .arg("--json")
        .current_dir(dir)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).expect("command should print JSON")
}

fn decimal(value: &Value) -> Decimal {
    value
        .as_str()
        .expect("decimal serialized as string")
        .parse()
        .expect("valid decimal")
}

fn id(value: &Value) -> String {
    value["id"].as_str().expect("id").to_string()
}

/// Initialized project with one company.
fn setup() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    run(temp_dir.path(), &["init"]);
    run(temp_dir.path(), &["company", "add", "Green Acres"]);
    temp_dir
}

// =============================================================================
// Basic CLI
// =============================================================================

#[test]
fn test_help() {
    furrow_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("farm operations"));
}

#[test]
fn test_version() {
    furrow_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("furrow"));
}

#[test]
fn test_not_initialized_error() {
    let temp_dir = TempDir::new().unwrap();

    furrow_cmd()
        .args(["item", "list"])
        .current_dir(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

// =============================================================================
// Initialization
// =============================================================================

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();

    furrow_cmd()
        .arg("init")
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    assert!(temp_dir.path().join(".furrow.toml").exists());
    assert!(temp_dir.path().join(".furrow").is_dir());
}

#[test]
fn test_init_twice_fails() {
    let temp_dir = TempDir::new().unwrap();
    run(temp_dir.path(), &["init"]);

    furrow_cmd()
        .arg("init")
        .current_dir(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn test_init_with_yaml_frontmatter() {
    let temp_dir = TempDir::new().unwrap();
    run(temp_dir.path(), &["init", "--frontmatter", "yaml", "--currency", "USD"]);

    let config = std::fs::read_to_string(temp_dir.path().join(".furrow.toml")).unwrap();
    assert!(config.contains("yaml"));
    assert!(config.contains("USD"));

    run(temp_dir.path(), &["company", "add", "Hill Farm"]);
    let company_dir = temp_dir.path().join(".furrow").join("companies");
    let file = std::fs::read_dir(&company_dir).unwrap().next().unwrap().unwrap();
    let content = std::fs::read_to_string(file.path()).unwrap();
    assert!(content.starts_with("---\n"));
}

#[test]
fn test_init_rejects_bad_id_length() {
    let temp_dir = TempDir::new().unwrap();

    furrow_cmd()
        .args(["init", "--id-length", "2"])
        .current_dir(temp_dir.path())
        .assert()
        .failure();
    assert!(!temp_dir.path().join(".furrow.toml").exists());
}

// =============================================================================
// Companies
// =============================================================================

#[test]
fn test_commands_need_a_company() {
    let temp_dir = TempDir::new().unwrap();
    run(temp_dir.path(), &["init"]);

    furrow_cmd()
        .args(["item", "add", "Diesel", "--unit", "l"])
        .current_dir(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No company yet"));
}

#[test]
fn test_several_companies_need_a_choice() {
    let temp_dir = setup();
    let second = run_json(temp_dir.path(), &["company", "add", "River Estate"]);

    furrow_cmd()
        .args(["item", "add", "Diesel", "--unit", "l"])
        .current_dir(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--company"));

    run(temp_dir.path(), &["company", "use", &id(&second)]);
    let item = run_json(temp_dir.path(), &["item", "add", "Diesel", "--unit", "l"]);
    assert_eq!(item["company_id"], second["id"]);

    let config = std::fs::read_to_string(temp_dir.path().join(".furrow.toml")).unwrap();
    assert!(config.contains(&id(&second)));
}

#[test]
fn test_company_with_records_cannot_be_deleted() {
    let temp_dir = setup();
    let companies = run_json(temp_dir.path(), &["company", "list"]);
    let company_id = id(&companies[0]);
    run(temp_dir.path(), &["item", "add", "Diesel", "--unit", "l"]);

    furrow_cmd()
        .args(["company", "delete", &company_id])
        .current_dir(temp_dir.path())
        .assert()
        .failure();

    let shown = run_json(temp_dir.path(), &["company", "show", &company_id]);
    assert_eq!(shown["company"]["name"], "Green Acres");
}

// =============================================================================
// Inventory
// =============================================================================

#[test]
fn test_item_stock_movements() {
    let temp_dir = setup();
    let dir = temp_dir.path();

    let item = run_json(
        dir,
        &[
            "item",
            "add",
            "DAP fertilizer",
            "--unit",
            "kg",
            "--category",
            "fertilizer",
            "--quantity",
            "50",
            "--reorder-level",
            "20",
        ],
    );
    let item_id = id(&item);

    furrow_cmd()
        .args(["item", "use", &item_id, "80", "--purpose", "top dressing"])
        .current_dir(dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Insufficient stock"));

    let used = run_json(
        dir,
        &["item", "use", &item_id, "35", "--purpose", "top dressing", "--project", "block-a"],
    );
    assert_eq!(decimal(&used["item"]["quantity"]), Decimal::from(15));

    let low = run_json(dir, &["item", "list", "--low"]);
    assert_eq!(low.as_array().unwrap().len(), 1);

    let restocked = run_json(dir, &["item", "restock", &item_id, "100", "--unit-cost", "65"]);
    assert_eq!(decimal(&restocked["item"]["quantity"]), Decimal::from(115));
    assert_eq!(decimal(&restocked["purchase"]["total_cost"]), Decimal::from(6500));

    let low = run_json(dir, &["item", "list", "--low"]);
    assert!(low.as_array().unwrap().is_empty());

    let history = run_json(dir, &["item", "show", &item_id]);
    assert_eq!(history["purchases"].as_array().unwrap().len(), 1);
    assert_eq!(history["usages"].as_array().unwrap().len(), 1);
}

#[test]
fn test_item_use_writes_work_log() {
    let temp_dir = setup();
    let dir = temp_dir.path();
    let item = run_json(
        dir,
        &["item", "add", "Glyphosate", "--unit", "l", "-c", "chemical", "-q", "10"],
    );

    run(
        dir,
        &["item", "use", &id(&item), "2", "--purpose", "weeding", "--workers", "3"],
    );
    run(
        dir,
        &["item", "use", &id(&item), "1", "--purpose", "spot spray", "--no-log"],
    );

    let logs = run_json(dir, &["log", "list"]);
    let logs = logs.as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["work_type"], "chemical use");
    assert_eq!(logs[0]["project_id"], "general");
    assert_eq!(logs[0]["workers"], 3);
}

#[test]
fn test_needed_item_receipt_restocks_inventory() {
    let temp_dir = setup();
    let dir = temp_dir.path();
    let item = run_json(dir, &["item", "add", "Crates", "--unit", "pcs", "-c", "packaging"]);

    let need = run_json(
        dir,
        &["need", "add", "Crates", "40", "--unit", "pcs", "--item", &id(&item)],
    );
    run(dir, &["need", "order", &id(&need)]);
    run(dir, &["need", "receive", &id(&need), "--unit-cost", "150"]);

    let item = run_json(dir, &["item", "show", &id(&item)]);
    assert_eq!(decimal(&item["item"]["quantity"]), Decimal::from(40));

    let received = run_json(dir, &["need", "list", "--status", "received"]);
    assert_eq!(received.as_array().unwrap().len(), 1);
}

// =============================================================================
// Harvest and cash pools
// =============================================================================

#[test]
fn test_harvest_payroll_flow() {
    let temp_dir = setup();
    let dir = temp_dir.path();

    let collection = run_json(
        dir,
        &["harvest", "open", "--project", "block-a", "--crop", "tea", "--price", "12"],
    );
    let collection_id = id(&collection);
    let pool_id = collection["pool_id"].as_str().unwrap().to_string();

    run(dir, &["harvest", "picker", &collection_id, "Wanjiru"]);
    run(dir, &["harvest", "picker", &collection_id, "Otieno"]);
    run(dir, &["harvest", "weigh", &collection_id, "1", "10.5"]);
    run(dir, &["harvest", "weigh", &collection_id, "1", "4.5"]);
    run(dir, &["harvest", "weigh", &collection_id, "2", "20"]);

    let totals = run_json(dir, &["harvest", "pickers", &collection_id]);
    assert_eq!(decimal(&totals[0]["kg"]), Decimal::from(15));
    assert_eq!(decimal(&totals[0]["pay"]), Decimal::from(180));

    furrow_cmd()
        .args(["harvest", "pay", &collection_id])
        .current_dir(dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Insufficient funds"));

    run(dir, &["wallet", "top-up", "1000", "--pool", &pool_id]);

    let batch = run_json(dir, &["harvest", "pay", &collection_id, "1"]);
    assert_eq!(batch["letter"], "A");
    assert_eq!(decimal(&batch["amount"]), Decimal::from(180));

    furrow_cmd()
        .args(["harvest", "pay", &collection_id, "1"])
        .current_dir(dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already been paid"));

    furrow_cmd()
        .args(["harvest", "close", &collection_id])
        .current_dir(dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("still owed"));

    let batch = run_json(dir, &["harvest", "pay", &collection_id]);
    assert_eq!(batch["letter"], "B");

    let closed = run_json(dir, &["harvest", "close", &collection_id]);
    assert_eq!(closed["status"], "closed");
    assert_eq!(decimal(&closed["closing_balance"]), Decimal::from(580));

    furrow_cmd()
        .args(["harvest", "weigh", &collection_id, "2", "3"])
        .current_dir(dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("closed"));

    let next = run_json(
        dir,
        &["harvest", "open", "--project", "block-a", "--crop", "tea", "--price", "13"],
    );
    assert_eq!(next["pool_id"], pool_id.as_str());
    assert_eq!(decimal(&next["opening_balance"]), Decimal::from(580));
}

#[test]
fn test_wallet_top_up_by_project_and_crop() {
    let temp_dir = setup();
    let dir = temp_dir.path();

    let pool = run_json(
        dir,
        &["wallet", "top-up", "500", "--project", "block-b", "--crop", "coffee"],
    );
    assert_eq!(decimal(&pool["balance"]), Decimal::from(500));

    let pool = run_json(
        dir,
        &["wallet", "top-up", "250", "--project", "block-b", "--crop", "coffee"],
    );
    assert_eq!(decimal(&pool["balance"]), Decimal::from(750));

    let pools = run_json(dir, &["wallet", "list"]);
    assert_eq!(pools.as_array().unwrap().len(), 1);
}

// =============================================================================
// Work logs and cards
// =============================================================================

#[test]
fn test_work_log_summary() {
    let temp_dir = setup();
    let dir = temp_dir.path();

    run(dir, &["log", "add", "-p", "block-a", "-t", "weeding", "-w", "4", "--hours", "6"]);
    run(dir, &["log", "add", "-p", "block-a", "-t", "weeding", "-w", "2"]);
    run(dir, &["log", "add", "-p", "block-b", "-t", "pruning", "-w", "3"]);

    let summary = run_json(dir, &["log", "summary", "-p", "block-a"]);
    let rows = summary.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["work_type"], "weeding");
    assert_eq!(rows[0]["worker_days"], 6);
}

#[test]
fn test_work_card_review_flow() {
    let temp_dir = setup();
    let dir = temp_dir.path();

    let card = run_json(
        dir,
        &[
            "card",
            "plan",
            "Spray block A",
            "-p",
            "block-a",
            "-t",
            "spraying",
            "-w",
            "4",
            "--labor-cost",
            "2000",
            "-i",
            "Glyphosate:5:l",
        ],
    );
    let card_id = id(&card);
    assert_eq!(card["status"], "planned");

    furrow_cmd()
        .args(["card", "approve", &card_id])
        .current_dir(dir)
        .assert()
        .failure();

    let submitted = run_json(
        dir,
        &["card", "submit", &card_id, "-w", "5", "--labor-cost", "2500", "-i", "Glyphosate:6:l"],
    );
    assert_eq!(submitted["status"], "submitted");

    let shown = run_json(dir, &["card", "show", &card_id]);
    assert_eq!(shown["variance"]["worker_difference"], 1);

    let approved = run_json(dir, &["card", "approve", &card_id, "--by", "manager"]);
    assert_eq!(approved["card"]["status"], "approved");
    assert_eq!(approved["work_log"]["workers"], 5);

    let unpaid = run_json(dir, &["card", "list", "--unpaid"]);
    assert_eq!(unpaid.as_array().unwrap().len(), 1);

    run(dir, &["card", "paid", &card_id]);
    let unpaid = run_json(dir, &["card", "list", "--unpaid"]);
    assert!(unpaid.as_array().unwrap().is_empty());

    furrow_cmd()
        .args(["card", "delete", &card_id])
        .current_dir(dir)
        .assert()
        .failure();
}

#[test]
fn test_rejected_card_can_be_resubmitted() {
    let temp_dir = setup();
    let dir = temp_dir.path();

    let card = run_json(
        dir,
        &["card", "plan", "Prune", "-p", "block-b", "-t", "pruning", "-w", "2"],
    );
    let card_id = id(&card);
    run(dir, &["card", "submit", &card_id, "-w", "2"]);

    let rejected = run_json(dir, &["card", "reject", &card_id, "--reason", "hours missing"]);
    assert_eq!(rejected["status"], "rejected");
    assert_eq!(rejected["rejection_reason"], "hours missing");

    let resubmitted = run_json(dir, &["card", "submit", &card_id, "-w", "3"]);
    assert_eq!(resubmitted["status"], "submitted");
}

// =============================================================================
// Challenges and overview
// =============================================================================

#[test]
fn test_challenges_by_season() {
    let temp_dir = setup();
    let dir = temp_dir.path();

    let aphids = run_json(
        dir,
        &["challenge", "add", "Aphids", "-s", "2026-long-rains", "-c", "pest", "--severity", "high"],
    );
    run(dir, &["challenge", "add", "Hail", "-s", "2026-long-rains", "-c", "weather"]);
    run(dir, &["challenge", "add", "Drought", "-s", "2026-short-rains", "-c", "weather"]);

    run(dir, &["challenge", "resolve", &id(&aphids), "Sprayed twice"]);

    let open = run_json(dir, &["challenge", "list", "--open"]);
    assert_eq!(open.as_array().unwrap().len(), 2);

    let summary = run_json(dir, &["challenge", "summary", "-s", "2026-long-rains"]);
    let seasons = summary.as_array().unwrap();
    assert_eq!(seasons.len(), 1);
    assert_eq!(seasons[0]["total"], 2);
    assert_eq!(seasons[0]["open"], 1);

    run(dir, &["challenge", "reopen", &id(&aphids)]);
    let open = run_json(dir, &["challenge", "list", "--open"]);
    assert_eq!(open.as_array().unwrap().len(), 3);
}

#[test]
fn test_overview_lists_attention_items() {
    let temp_dir = setup();
    let dir = temp_dir.path();

    run(dir, &["item", "add", "Diesel", "--unit", "l", "-q", "5", "--reorder-level", "10"]);
    run(dir, &["harvest", "open", "-p", "block-a", "--crop", "tea", "--price", "12"]);
    run(dir, &["challenge", "add", "Frost", "-s", "2026"]);

    let overview = run_json(dir, &["overview"]);
    assert_eq!(overview["low_stock"].as_array().unwrap().len(), 1);
    assert_eq!(overview["open_collections"].as_array().unwrap().len(), 1);
    assert_eq!(overview["open_challenges"], 1);

    furrow_cmd()
        .arg("overview")
        .current_dir(dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Low stock"));
}

// =============================================================================
// GraphQL from the command line
// =============================================================================

#[test]
fn test_query_command() {
    let temp_dir = setup();

    furrow_cmd()
        .args(["query", "{ companies { name active } }"])
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Green Acres"));
}

#[test]
fn test_mutate_command_wraps_body() {
    let temp_dir = setup();

    furrow_cmd()
        .args(["mutate", r#"createCompany(input: { name: "Valley Growers" }) { id name }"#])
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Valley Growers"));

    let companies = run_json(temp_dir.path(), &["company", "list"]);
    assert_eq!(companies.as_array().unwrap().len(), 2);
}

#[test]
fn test_query_errors_fail_the_command() {
    let temp_dir = setup();

    furrow_cmd()
        .args(["query", "{ noSuchField }"])
        .current_dir(temp_dir.path())
        .assert()
        .failure();
}

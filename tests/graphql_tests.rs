use furrow::config::FurrowConfig;
use furrow::graphql::{FurrowSchema, build_schema};
use serde_json::Value;
use tempfile::TempDir;

fn schema() -> (FurrowSchema, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let schema = build_schema(FurrowConfig::default(), temp_dir.path().to_path_buf());
    (schema, temp_dir)
}

async fn execute(schema: &FurrowSchema, query: &str) -> Value {
    let response = schema.execute(query).await;
    assert!(response.errors.is_empty(), "errors: {:?}", response.errors);
    response.data.into_json().unwrap()
}

async fn create_company(schema: &FurrowSchema) -> String {
    let data = execute(schema, r#"mutation { createCompany(input: { name: "Green Acres" }) { id } }"#).await;
    data["createCompany"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_and_query_company() {
    let (schema, _temp_dir) = schema();
    let id = create_company(&schema).await;

    let data = execute(&schema, &format!(r#"{{ company(id: "{id}") {{ name active }} }}"#)).await;
    assert_eq!(data["company"]["name"], "Green Acres");
    assert_eq!(data["company"]["active"], true);

    let data = execute(&schema, r#"{ company(id: "co-missing") { name } }"#).await;
    assert!(data["company"].is_null());
}

#[tokio::test]
async fn test_use_item_reports_low_stock() {
    let (schema, _temp_dir) = schema();
    let company = create_company(&schema).await;

    let data = execute(
        &schema,
        &format!(
            r#"mutation {{ addItem(input: {{ companyId: "{company}", name: "Diesel", unit: "l",
                category: FUEL, quantity: "40", reorderLevel: "10" }}) {{ id lowStock }} }}"#
        ),
    )
    .await;
    let item_id = data["addItem"]["id"].as_str().unwrap().to_string();
    assert_eq!(data["addItem"]["lowStock"], false);

    let data = execute(
        &schema,
        &format!(
            r#"mutation {{ useItem(input: {{ itemId: "{item_id}", quantity: "35", purpose: "tractor" }})
                {{ item {{ quantity lowStock }} workLog {{ workType }} }} }}"#
        ),
    )
    .await;
    assert_eq!(data["useItem"]["item"]["quantity"], "5");
    assert_eq!(data["useItem"]["item"]["lowStock"], true);
    assert_eq!(data["useItem"]["workLog"]["workType"], "fuel use");

    let data = execute(&schema, "{ lowStock { name } }").await;
    assert_eq!(data["lowStock"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_over_use_is_an_error() {
    let (schema, _temp_dir) = schema();
    let company = create_company(&schema).await;
    let data = execute(
        &schema,
        &format!(
            r#"mutation {{ addItem(input: {{ companyId: "{company}", name: "Seed", unit: "kg",
                quantity: "1" }}) {{ id }} }}"#
        ),
    )
    .await;
    let item_id = data["addItem"]["id"].as_str().unwrap();

    let response = schema
        .execute(format!(
            r#"mutation {{ useItem(input: {{ itemId: "{item_id}", quantity: "2", purpose: "planting" }}) {{ item {{ id }} }} }}"#
        ))
        .await;
    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("Insufficient stock"));
}

#[tokio::test]
async fn test_harvest_payout_through_graphql() {
    let (schema, _temp_dir) = schema();
    let company = create_company(&schema).await;

    let data = execute(
        &schema,
        &format!(
            r#"mutation {{ openCollection(input: {{ companyId: "{company}", projectId: "block-a",
                crop: "tea", pricePerKg: "10" }}) {{ id poolId status }} }}"#
        ),
    )
    .await;
    let collection = data["openCollection"]["id"].as_str().unwrap().to_string();
    let pool = data["openCollection"]["poolId"].as_str().unwrap().to_string();
    assert_eq!(data["openCollection"]["status"], "OPEN");

    execute(
        &schema,
        &format!(r#"mutation {{ addPicker(input: {{ collectionId: "{collection}", name: "Akinyi" }}) {{ number }} }}"#),
    )
    .await;
    execute(
        &schema,
        &format!(r#"mutation {{ recordWeight(collectionId: "{collection}", picker: "1", kg: "25") {{ trip }} }}"#),
    )
    .await;
    execute(
        &schema,
        &format!(r#"mutation {{ topUp(input: {{ poolId: "{pool}", amount: "1000" }}) {{ balance }} }}"#),
    )
    .await;

    let data = execute(
        &schema,
        &format!(r#"mutation {{ payPickers(collectionId: "{collection}") {{ letter pickerCount amount }} }}"#),
    )
    .await;
    assert_eq!(data["payPickers"]["letter"], "A");
    assert_eq!(data["payPickers"]["pickerCount"], 1);
    assert_eq!(data["payPickers"]["amount"], "250");

    let data = execute(
        &schema,
        &format!(r#"{{ collectionSummary(id: "{collection}") {{ paidCount unpaidCount }} cashPool(id: "{pool}") {{ balance }} }}"#),
    )
    .await;
    assert_eq!(data["collectionSummary"]["paidCount"], 1);
    assert_eq!(data["collectionSummary"]["unpaidCount"], 0);
    assert_eq!(data["cashPool"]["balance"], "750");
}

#[tokio::test]
async fn test_work_card_approval_writes_log() {
    let (schema, _temp_dir) = schema();
    let company = create_company(&schema).await;

    let data = execute(
        &schema,
        &format!(
            r#"mutation {{ planWorkCard(input: {{ companyId: "{company}", projectId: "block-a",
                title: "Weed block A", workType: "weeding",
                planned: {{ date: "2026-03-02", workers: 4, laborCost: "1600" }} }}) {{ id status }} }}"#
        ),
    )
    .await;
    let card = data["planWorkCard"]["id"].as_str().unwrap().to_string();
    assert_eq!(data["planWorkCard"]["status"], "PLANNED");

    execute(
        &schema,
        &format!(
            r#"mutation {{ submitWorkCard(id: "{card}", actual: {{ date: "2026-03-02", workers: 6,
                laborCost: "2400" }}) {{ status }} }}"#
        ),
    )
    .await;

    let data = execute(&schema, &format!(r#"{{ workCardVariance(id: "{card}") {{ workerDifference }} }}"#)).await;
    assert_eq!(data["workCardVariance"]["workerDifference"], 2);

    let data = execute(
        &schema,
        &format!(r#"mutation {{ approveWorkCard(id: "{card}") {{ card {{ status }} workLog {{ workers date }} }} }}"#),
    )
    .await;
    assert_eq!(data["approveWorkCard"]["card"]["status"], "APPROVED");
    assert_eq!(data["approveWorkCard"]["workLog"]["workers"], 6);
    assert_eq!(data["approveWorkCard"]["workLog"]["date"], "2026-03-02");

    let data = execute(&schema, "{ overview { cardsAwaitingPayment { id } } }").await;
    assert_eq!(data["overview"]["cardsAwaitingPayment"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_date_is_rejected() {
    let (schema, _temp_dir) = schema();
    let company = create_company(&schema).await;

    let response = schema
        .execute(format!(
            r#"mutation {{ reportChallenge(input: {{ companyId: "{company}", season: "2026",
                title: "Frost", observedOn: "02/03/2026" }}) {{ id }} }}"#
        ))
        .await;
    assert_eq!(response.errors.len(), 1);
}

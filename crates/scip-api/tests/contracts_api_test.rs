//! Contract generation, access control, visualization, deployment and audits

mod common;

use axum::http::StatusCode;
use common::{test_app, MockChain, ScriptedLlm, TOKEN_SOURCE};
use serde_json::json;

#[tokio::test]
async fn test_create_contract_stores_clean_code() {
    let app = test_app(ScriptedLlm::default(), MockChain::default());
    let token = app.signup("alice").await;

    let (status, body) = app
        .post_json(
            "/api/contracts/create",
            json!({"description": "A simple token", "contract_type": "token", "parameters": {"symbol": "TKN"}}),
            Some(&token),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["contract_id"], "c1");
    assert_eq!(body["code"], TOKEN_SOURCE);
    assert_eq!(body["suggestions"], json!(["Add NatSpec comments"]));

    let stored = app.chain.contracts.lock().unwrap()["c1"].clone();
    assert_eq!(stored.owner_id, "user_1");

    let (status, list) = app.get("/api/contracts/list", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 1);
}

#[tokio::test]
async fn test_create_contract_with_issues_returns_draft() {
    let llm = ScriptedLlm {
        validation: json!({
            "is_valid": false,
            "issues": [{
                "type": "security",
                "severity": "high",
                "location": "withdraw()",
                "description": "Reentrancy",
                "suggestion": "Use ReentrancyGuard"
            }],
            "suggestions": []
        }),
        ..Default::default()
    };
    let app = test_app(llm, MockChain::default());
    let token = app.signup("alice").await;

    let (status, body) = app
        .post_json(
            "/api/contracts/create",
            json!({"description": "Vault", "contract_type": "escrow"}),
            Some(&token),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Generated contract has issues");
    assert_eq!(body["issues"][0]["type"], "security");
    assert_eq!(body["draft_code"], TOKEN_SOURCE);
    assert!(app.chain.contracts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_contract_generation_failure() {
    let llm = ScriptedLlm {
        code: None,
        ..Default::default()
    };
    let app = test_app(llm, MockChain::default());
    let token = app.signup("alice").await;

    let (status, body) = app
        .post_json(
            "/api/contracts/create",
            json!({"description": "Token", "contract_type": "token"}),
            Some(&token),
        )
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to create contract: "));
}

#[tokio::test]
async fn test_create_requires_auth() {
    let app = test_app(ScriptedLlm::default(), MockChain::default());
    let (status, _) = app
        .post_json(
            "/api/contracts/create",
            json!({"description": "Token", "contract_type": "token"}),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_contract_access_rules() {
    let chain = MockChain::default()
        .with_contract("mine", "user_1", false)
        .with_contract("theirs", "user_2", false)
        .with_contract("shared", "user_2", true);
    let app = test_app(ScriptedLlm::default(), chain);
    let token = app.signup("alice").await;

    let (status, contract) = app.get("/api/contracts/mine", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(contract["contract_code"], TOKEN_SOURCE);

    let (status, _) = app.get("/api/contracts/shared", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/api/contracts/theirs", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.get("/api/contracts/missing", Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Contract not found");
}

#[tokio::test]
async fn test_visualize_defaults_to_flowchart() {
    let app = test_app(ScriptedLlm::default(), MockChain::default());

    let (status, body) = app
        .post_json(
            "/api/contracts/visualize",
            json!({"contract_code": TOKEN_SOURCE}),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["contract_analysis"]["contractName"], "Token");

    let data = &body["visualization_data"];
    assert_eq!(data["type"], "flowchart");
    let ids: Vec<&str> = data["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["contract", "function_transfer", "event_Transfer"]);
    assert!(data["edges"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["id"] == "edge_transfer_to_Transfer"));
}

#[tokio::test]
async fn test_visualize_interaction_falls_back() {
    let app = test_app(ScriptedLlm::default(), MockChain::default());

    let (status, body) = app
        .post_json(
            "/api/contracts/visualize",
            json!({"contract_code": TOKEN_SOURCE, "visualization_type": "interaction"}),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["visualization_data"];
    assert_eq!(data["type"], "interaction");
    assert_eq!(data["contract_name"], "Token");
    assert_eq!(data["user_interactions"][0]["name"], "Basic Interaction");
    assert_eq!(data["functions"], json!(["transfer"]));
}

#[tokio::test]
async fn test_visualize_with_failed_analysis() {
    let llm = ScriptedLlm {
        analysis: json!("not a structure"),
        ..Default::default()
    };
    let app = test_app(llm, MockChain::default());

    let (status, body) = app
        .post_json(
            "/api/contracts/visualize",
            json!({"contract_code": "garbage", "visualization_type": "sequence"}),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contract_analysis"]["contractName"], "Unknown");
    assert_eq!(body["visualization_data"]["type"], "sequence");
    assert!(body["visualization_data"]["interactions"]
        .as_array()
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_deploy_owner_only() {
    let chain = MockChain::default()
        .with_contract("mine", "user_1", false)
        .with_contract("shared", "user_2", true);
    let app = test_app(ScriptedLlm::default(), chain);
    let token = app.signup("alice").await;

    let (status, body) = app
        .post_json("/api/contracts/deploy/mine", json!({}), Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["transaction_hash"], "0xtxmine");
    assert_eq!(body["contract_address"], "0xdef");
    assert_eq!(body["deployment_cost"], 0.01);

    // Public contracts are readable but only the owner deploys them
    let (status, _) = app
        .post_json("/api/contracts/deploy/shared", json!({}), Some(&token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post_json("/api/contracts/deploy/missing", json!({}), Some(&token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deploy_failure_reported() {
    let chain = MockChain {
        fail_deploy: true,
        ..Default::default()
    }
    .with_contract("mine", "user_1", false);
    let app = test_app(ScriptedLlm::default(), chain);
    let token = app.signup("alice").await;

    let (status, body) = app
        .post_json("/api/contracts/deploy/mine", json!({}), Some(&token))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Contract deployment failed: "));
}

#[tokio::test]
async fn test_audit_round_trip() {
    let chain = MockChain::default().with_contract("c7", "user_1", false);
    let app = test_app(ScriptedLlm::default(), chain);
    let token = app.signup("alice").await;

    let (status, audit) = app
        .post_json(
            "/api/audit/contract",
            json!({"contract_id": "c7", "audit_type": "gas"}),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(audit["id"], "audit-c7-gas");
    assert_eq!(audit["status"], "completed");
    assert_eq!(audit["security_score"], 85);

    let (status, fetched) = app.get("/api/audit/audit-c7-gas", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, audit);

    let (status, body) = app.get("/api/audit/audit-c7-security", Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Audit not found");

    let (status, body) = app.get("/api/audit/bogus", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid audit ID format");
}

#[tokio::test]
async fn test_audit_with_issues_and_access() {
    let llm = ScriptedLlm {
        validation: json!({"is_valid": false, "issues": [{"description": "Unchecked call"}]}),
        ..Default::default()
    };
    let chain = MockChain::default().with_contract("theirs", "user_2", false);
    let app = test_app(llm, chain);
    let token = app.signup("alice").await;

    let (status, _) = app
        .post_json(
            "/api/audit/contract",
            json!({"contract_id": "theirs"}),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Supplied source is audited without loading the stored copy
    let (status, audit) = app
        .post_json(
            "/api/audit/contract",
            json!({"contract_id": "draft", "contract_code": TOKEN_SOURCE}),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(audit["id"], "audit-draft-security");
    assert_eq!(audit["security_score"], 60);
    assert_eq!(audit["vulnerabilities"][0]["type"], "unknown");
    assert_eq!(audit["vulnerabilities"][0]["severity"], "low");
}

#[tokio::test]
async fn test_supplied_source_audit_not_recorded_for_other_users() {
    let chain = MockChain::default().with_contract("c7", "user_1", false);
    let app = test_app(ScriptedLlm::default(), chain);
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;

    // Bob audits his own source under Alice's contract id
    let (status, audit) = app
        .post_json(
            "/api/audit/contract",
            json!({"contract_id": "c7", "contract_code": "contract Evil {}"}),
            Some(&bob),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(audit["id"], "audit-c7-security");

    let (status, body) = app.get("/api/audit/audit-c7-security", Some(&alice)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Audit not found");

    // The owner's own supplied source is recorded
    let (status, audit) = app
        .post_json(
            "/api/audit/contract",
            json!({"contract_id": "c7", "contract_code": TOKEN_SOURCE}),
            Some(&alice),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, fetched) = app.get("/api/audit/audit-c7-security", Some(&alice)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, audit);

    // A later audit by Bob leaves Alice's record in place
    let (status, _) = app
        .post_json(
            "/api/audit/contract",
            json!({"contract_id": "c7", "contract_code": "contract Evil {}"}),
            Some(&bob),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, still) = app.get("/api/audit/audit-c7-security", Some(&alice)).await;
    assert_eq!(still, audit);

    let (status, _) = app.get("/api/audit/audit-c7-security", Some(&bob)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_audit_type_must_be_known() {
    let chain = MockChain::default().with_contract("c7", "user_1", false);
    let app = test_app(ScriptedLlm::default(), chain);
    let token = app.signup("alice").await;

    let (status, body) = app
        .post_json(
            "/api/audit/contract",
            json!({"contract_id": "c7", "audit_type": "best-practices"}),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid audit type: best-practices");

    let (status, audit) = app
        .post_json(
            "/api/audit/contract",
            json!({"contract_id": "c7", "audit_type": "best_practices"}),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(audit["id"], "audit-c7-best_practices");

    let (status, fetched) = app
        .get("/api/audit/audit-c7-best_practices", Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, audit);

    let (status, body) = app
        .get("/api/audit/audit-c7-best-practices", Some(&token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid audit ID format");
}
